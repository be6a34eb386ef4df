use shuttle_runtime::{Error, SecretStore, Secrets};

#[shuttle_runtime::main]
async fn main(
    #[Secrets] secret_store: SecretStore,
) -> shuttle_axum::ShuttleAxum {
    let level = match secret_store.get("ENV").as_deref() {
        Some("prod") => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let Some(gemini_api_key) = secret_store.get("GEMINI_API_KEY") else {
        return Err(Error::BuildPanic(
            "GEMINI_API_KEY was not found".to_string(),
        ));
    };
    let Some(config) = secret_store.get("CONFIG") else {
        return Err(Error::BuildPanic("CONFIG was not found".to_string()));
    };

    let router = api::serve(&gemini_api_key, &format!("Config{}", config))
        .map_err(|e| Error::BuildPanic(format!("{:#}", e)))?;

    Ok(router.into())
}
