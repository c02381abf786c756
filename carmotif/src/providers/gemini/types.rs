//! Gemini `generateContent` wire types.

use serde::{Deserialize, Serialize};

use crate::generation::{GenerateRequest, GenerateResponse, Modality, Part};
use crate::image::ImagePart;

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

/// A content turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A content part: either text or inline data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: ImagePart,
    },
    /// Parts this client does not consume (thoughts, function calls).
    Other(serde_json::Value),
}

/// Generation options.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    pub response_modalities: Vec<Modality>,
}

/// Response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

/// One response candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback on a blocked prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorResponse {
    pub error: GeminiError,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiError {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl GeminiRequest {
    /// Convert a generation request into the wire body.
    pub fn from_request(request: &GenerateRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => GeminiPart::Text { text: text.clone() },
                Part::Image(image) => GeminiPart::InlineData {
                    inline_data: image.clone(),
                },
            })
            .collect();

        let generation_config = (!request.modalities.is_empty()).then(|| GeminiGenerationConfig {
            response_modalities: request.modalities.clone(),
        });

        Self {
            contents: vec![GeminiContent { role: None, parts }],
            generation_config,
        }
    }
}

impl GeminiResponse {
    /// Parts of the first candidate, in order.
    pub fn into_response(self) -> GenerateResponse {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| match part {
                GeminiPart::Text { text } => Some(Part::Text(text)),
                GeminiPart::InlineData { inline_data } => Some(Part::Image(inline_data)),
                GeminiPart::Other(_) => None,
            })
            .collect();
        GenerateResponse::new(parts)
    }

    /// Reason the prompt was blocked, if it was.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}
