use std::net::{Ipv4Addr, SocketAddr};

use api::serve;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use util::{load_env, secret};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secrets = load_env("Secrets.dev.toml")?;
    let gemini_api_key = secret(&secrets, "GEMINI_API_KEY")?;
    let config = secret(&secrets, "CONFIG")?;
    let config_name = &format!("Config{}", config);

    let router = serve(gemini_api_key, config_name)?;

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000));
    let listener = TcpListener::bind(&address).await?;
    info!(task = "listen", address = %address);

    Ok(axum::serve(listener, router).await?)
}
