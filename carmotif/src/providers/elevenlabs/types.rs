//! ElevenLabs text-to-speech wire types.

use serde::{Deserialize, Serialize};

use crate::speech::{SpeechRequest, VoiceSettings};

/// Request body for `text-to-speech/{voice_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ElevenLabsSpeechRequest<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: VoiceSettings,
}

impl<'a> From<&'a SpeechRequest> for ElevenLabsSpeechRequest<'a> {
    fn from(request: &'a SpeechRequest) -> Self {
        Self {
            text: &request.text,
            model_id: &request.model_id,
            voice_settings: request.voice_settings,
        }
    }
}

/// Error body; `detail` is either a string or an object with a message.
#[derive(Debug, Clone, Deserialize)]
pub struct ElevenLabsErrorResponse {
    #[serde(default)]
    pub detail: Option<ElevenLabsDetail>,
}

/// The `detail` field of an error body.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ElevenLabsDetail {
    Message(String),
    Structured {
        message: String,
        #[serde(default)]
        status: Option<String>,
    },
    Other(serde_json::Value),
}

impl ElevenLabsDetail {
    /// Human readable message, when the detail carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(message) | Self::Structured { message, .. } => Some(message),
            Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_shape() {
        let request = SpeechRequest::new("sk", "voice", "Hello");
        let body = serde_json::to_value(ElevenLabsSpeechRequest::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "text": "Hello",
                "model_id": "eleven_multilingual_v2",
                "voice_settings": {"stability": 0.5, "similarity_boost": 0.75}
            })
        );
    }

    #[test]
    fn detail_variants() {
        let plain: ElevenLabsErrorResponse =
            serde_json::from_value(json!({"detail": "Invalid key"})).unwrap();
        assert_eq!(plain.detail.unwrap().message(), Some("Invalid key"));

        let structured: ElevenLabsErrorResponse = serde_json::from_value(
            json!({"detail": {"status": "quota_exceeded", "message": "Out of credits"}}),
        )
        .unwrap();
        assert_eq!(structured.detail.unwrap().message(), Some("Out of credits"));

        let other: ElevenLabsErrorResponse =
            serde_json::from_value(json!({"detail": [{"loc": ["body"]}]})).unwrap();
        assert_eq!(other.detail.unwrap().message(), None);
    }
}
