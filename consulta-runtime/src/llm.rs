use crate::gateway::execute_checked;
use consulta_engine::traits::{GatewayError, GenerationProvider};
use consulta_providers::gemini::{self, GeminiConfig, build_generate_content_request};
use consulta_providers::parse::parse_generate_content;

/// Text generation over the Gemini `generateContent` endpoint.
///
/// Holds no credential: the key travels with each call, straight from the
/// session that owns it.
#[derive(Debug, Clone)]
pub struct GeminiGenerationProvider {
    base_url: String,
    model: String,
}

impl GeminiGenerationProvider {
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

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
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

impl Default for GeminiGenerationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GenerationProvider for GeminiGenerationProvider {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, GatewayError> {
        let req = build_generate_content_request(&self.config(api_key), prompt);
        let body = execute_checked(&req).await?;
        parse_generate_content(&body).map_err(|e| GatewayError::Unknown(e.to_string()))
    }
}
