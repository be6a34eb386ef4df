use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use gemini::{GenerateContentRequest, TextGeneration};
use tracing::{info, warn};

use crate::{
    response::{ApiResponse, IntoApiResponse},
    ApiError, ApiState,
};

use self::{request::SummarizeRequest, response::SummarizeResponse};

pub mod request;
pub mod response;

pub static PROMPT_PREFIX: &str = "Summarize this text: ";

/// Summarize a text
///
/// The model receives the raw text followed by the summarization prompt as
/// two parts of a single user turn.
#[utoipa::path(
    post,
    path = "/summarize",
    tag = "summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary generated", body = SummarizeResponse),
        (status = 400, description = "No text provided", body = crate::ErrorResponse),
        (status = 413, description = "Request body over the configured limit", body = crate::ErrorResponse),
        (status = 500, description = "Generation failed", body = crate::ErrorResponse)
    )
)]
pub async fn post_summarize<G>(
    State(state): State<ApiState<G>>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResponse<Json<SummarizeResponse>>
where
    G: TextGeneration + Clone + Send + Sync + 'static,
{
    let body = body.map_err(|rejection| {
        warn!(task = "summarize", reason = %rejection.body_text());
        ApiError::RequestBody(rejection.status(), rejection.body_text())
    })?;

    let Some(SummarizeRequest { text }) = SummarizeRequest::from_body(&body)
    else {
        warn!(task = "summarize", reason = "no text provided");
        return Err(ApiError::InputError);
    };

    let text_len = text.len();
    let prompt = format!("{}{}", PROMPT_PREFIX, text);
    let request = GenerateContentRequest::from_fragments([text, prompt]);

    let summary = state
        .generator
        .generate_content(&state.config.gemini.model, request)
        .await
        .and_then(|response| response.text())
        .into_api_response("generate content")?;

    info!(
        task = "summarize",
        model = %state.config.gemini.model,
        text_len = text_len,
        summary_len = summary.len()
    );

    Ok(Json(SummarizeResponse { summary }))
}
