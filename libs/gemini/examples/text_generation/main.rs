use gemini::{
    models::text_generation::GEMINI_2_0_FLASH, GenerateContentRequest, Models,
    TextGeneration,
};
use util::{load_env, secret};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let secrets = load_env("Secrets.dev.toml")?;

    let models = Models::new(secret(&secrets, "GEMINI_API_KEY")?)?;

    let result = models
        .generate_content(
            GEMINI_2_0_FLASH,
            GenerateContentRequest::from_fragments(["Hello, world!"]),
        )
        .await?;

    println!("{}", result.text()?);

    Ok(())
}
