use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Debug, ToSchema)]
pub struct SummarizeRequest {
    /// Text to summarize; must be a non-empty string.
    pub text: String,
}

impl SummarizeRequest {
    /// Reads the request from a raw body.
    ///
    /// Returns `None` when the body is not a JSON object or `text` is absent,
    /// null, not a string, or empty.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let object = serde_json::from_slice::<Map<String, Value>>(body).ok()?;

        match object.get("text") {
            Some(Value::String(text)) if !text.is_empty() => Some(Self {
                text: text.clone(),
            }),
            _ => None,
        }
    }
}
