use async_trait::async_trait;
use thiserror::Error;

/// One uploaded audio artifact, already read into memory by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("mime_type", &self.mime_type)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Failure of one gateway call. Each call attempts exactly once; there is
/// no retry, no backoff and no caching behind this boundary, so every
/// variant is terminal for the current pipeline run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("the endpoint rejected the credential")]
    AuthenticationFailed,
    #[error("endpoint unreachable or unhealthy: {detail}")]
    TransportFailed { status: Option<u16>, detail: String },
    #[error("{0}")]
    Unknown(String),
}

/// Text generation against a hosted model: prompt in, free text out.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, GatewayError>;
}

/// Speech-to-text against a hosted model. `language_hint` is advisory.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(
        &self,
        audio: &AudioClip,
        language_hint: &str,
        api_key: &str,
    ) -> Result<String, GatewayError>;
}
