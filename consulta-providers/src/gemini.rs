use crate::request::{Body, HttpRequest};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

/// Text generation via `generateContent`: one user turn carrying the whole
/// prompt. The caller owns prompt assembly; this only shapes the wire call.
pub fn build_generate_content_request(cfg: &GeminiConfig, prompt: &str) -> HttpRequest {
    let payload = json!({
        "contents": [{
            "parts": [{"text": prompt}],
        }],
    });

    HttpRequest {
        method: "POST".into(),
        url: generate_content_url(cfg),
        headers: default_headers(cfg),
        body: Body::Json(payload.to_string()),
    }
}

/// Transcription via the same `generateContent` endpoint: the audio travels
/// as a base64 `inline_data` part next to a fixed transcription instruction.
/// `language_hint` is advisory only; the service decides what it heard.
pub fn build_transcription_request(
    cfg: &GeminiConfig,
    mime_type: &str,
    audio: &[u8],
    language_hint: &str,
) -> HttpRequest {
    let instruction = format!(
        "Transcribe the attached audio verbatim. The audio is in {language_hint}. \
         Output only the transcript text, with no commentary."
    );

    let payload = json!({
        "contents": [{
            "parts": [
                {"text": instruction},
                {"inline_data": {"mime_type": mime_type, "data": BASE64.encode(audio)}},
            ],
        }],
    });

    HttpRequest {
        method: "POST".into(),
        url: generate_content_url(cfg),
        headers: default_headers(cfg),
        body: Body::Json(payload.to_string()),
    }
}

fn generate_content_url(cfg: &GeminiConfig) -> String {
    join_url(&cfg.base_url, &format!("models/{}:generateContent", cfg.model))
}

fn default_headers(cfg: &GeminiConfig) -> Vec<(String, String)> {
    vec![
        ("Content-Type".into(), "application/json".into()),
        ("x-goog-api-key".into(), cfg.api_key.clone()),
    ]
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
