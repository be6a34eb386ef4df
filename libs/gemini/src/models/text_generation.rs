pub mod implementation;

use anyhow::{anyhow, bail};
use reqwest::Body;
use serde::{Deserialize, Serialize};

pub static GEMINI_2_0_FLASH: &str = "gemini-2.0-flash";

pub trait TextGeneration {
    fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> impl std::future::Future<Output = anyhow::Result<GenerateContentResponse>>
           + Send;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Builds a single user turn carrying one text part per fragment, in order.
    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: fragments
                    .into_iter()
                    .map(|text| Part {
                        text: Some(text.into()),
                    })
                    .collect(),
            }],
        }
    }

    /// Text of every part, in request order.
    pub fn fragments(&self) -> Vec<&str> {
        self.contents
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Response carrying `text` as the only part of a single candidate.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part {
                        text: Some(text.into()),
                    }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
        }
    }

    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> anyhow::Result<String> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason.as_deref());
            return match reason {
                Some(reason) => {
                    Err(anyhow!("prompt was blocked (block reason: {reason})"))
                }
                None => Err(anyhow!("response contained no candidates")),
            };
        };

        let parts = candidate
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>();

        if parts.is_empty() {
            bail!(
                "candidate contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("UNKNOWN")
            );
        }

        Ok(parts.concat())
    }
}

impl From<GenerateContentRequest> for Body {
    fn from(request: GenerateContentRequest) -> Body {
        // Plain strings and vectors always serialize.
        let body = serde_json::to_string(&request).unwrap_or_default();
        Body::from(body)
    }
}
