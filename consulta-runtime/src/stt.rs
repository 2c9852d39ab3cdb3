use crate::gateway::execute_checked;
use consulta_engine::traits::{AudioClip, GatewayError, TranscriptionProvider};
use consulta_providers::gemini::{self, GeminiConfig, build_transcription_request};
use consulta_providers::parse::parse_generate_content;

/// Speech-to-text over the Gemini `generateContent` endpoint, with the
/// audio inlined into the request.
#[derive(Debug, Clone)]
pub struct GeminiTranscriptionProvider {
    base_url: String,
    model: String,
}

impl GeminiTranscriptionProvider {
    pub fn new() -> Self {
        Self {
            base_url: gemini::DEFAULT_BASE_URL.into(),
            model: gemini::DEFAULT_MODEL.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn config(&self, api_key: &str) -> GeminiConfig {
        GeminiConfig {
            base_url: self.base_url.clone(),
            api_key: api_key.to_string(),
            model: self.model.clone(),
        }
    }
}

impl Default for GeminiTranscriptionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TranscriptionProvider for GeminiTranscriptionProvider {
    async fn transcribe(
        &self,
        audio: &AudioClip,
        language_hint: &str,
        api_key: &str,
    ) -> Result<String, GatewayError> {
        let req = build_transcription_request(
            &self.config(api_key),
            &audio.mime_type,
            &audio.bytes,
            language_hint,
        );
        let body = execute_checked(&req).await?;
        parse_generate_content(&body).map_err(|e| GatewayError::Unknown(e.to_string()))
    }
}
