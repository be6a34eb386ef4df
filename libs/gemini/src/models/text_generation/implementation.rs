use anyhow::Context;
use tracing::debug;

use crate::models::Models;

use super::{GenerateContentRequest, GenerateContentResponse, TextGeneration};

impl TextGeneration for Models {
    async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> anyhow::Result<GenerateContentResponse> {
        debug!(
            task = "generate content",
            model = model,
            parts = request.fragments().len()
        );

        let text = self
            .string_response(request, model, "generateContent")
            .await?;

        let response =
            serde_json::from_str(&text).context("failed to parse response")?;

        Ok(response)
    }
}
