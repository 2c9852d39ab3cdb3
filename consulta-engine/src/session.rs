use crate::traits::GatewayError;
use consulta_core::analysis::ExtractError;
use consulta_core::session::SessionError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Driver-visible stages, emitted through the engines' stage hooks so a
/// front end can block further submissions while a run is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Submitting,
    Transcribing,
    Summarizing,
    Done,
    Failed,
}

impl PipelineStage {
    // A stable string label for UI display.
    // This is intentionally not derived from `Debug`.
    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Submitting => "submitting",
            PipelineStage::Transcribing => "transcribing",
            PipelineStage::Summarizing => "summarizing",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        }
    }
}

/// Why one iterative-consultation run ended early. Every variant returns the
/// session to idle; none of them roll back an already-appended observation.
#[derive(Debug, Error)]
pub enum ConsultError {
    #[error("no credential configured for this session")]
    MissingCredential,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("could not parse the model response: {0}")]
    Extract(#[from] ExtractError),
}

/// Why one single-shot notes run ended early. Failure at either step means
/// no `TranscriptBundle` exists; an interim transcript is discarded rather
/// than surfaced half-done.
#[derive(Debug, Error)]
pub enum NotesError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("transcription produced no usable text")]
    EmptyTranscript,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels_are_stable_strings() {
        assert_eq!(PipelineStage::Submitting.label(), "submitting");
        assert_eq!(PipelineStage::Transcribing.label(), "transcribing");
        assert_eq!(PipelineStage::Summarizing.label(), "summarizing");
        assert_eq!(PipelineStage::Done.label(), "done");
        assert_eq!(PipelineStage::Failed.label(), "failed");
    }

    #[test]
    fn gateway_errors_convert_into_consult_errors() {
        let err: ConsultError = GatewayError::AuthenticationFailed.into();
        assert!(matches!(
            err,
            ConsultError::Gateway(GatewayError::AuthenticationFailed)
        ));
    }
}
