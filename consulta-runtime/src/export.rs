use consulta_core::types::TranscriptBundle;
use serde::Serialize;

pub const TRANSCRIPT_FILENAME: &str = "transcricao.txt";
pub const NOTES_FILENAME: &str = "notas_de_aula.md";

/// One downloadable artifact of the single-shot pipeline. Filenames and
/// content types are fixed; the presentation layer only has to hand the
/// bytes over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

pub fn transcript_artifact(bundle: &TranscriptBundle) -> Artifact {
    Artifact {
        filename: TRANSCRIPT_FILENAME,
        content_type: "text/plain",
        body: bundle.transcript.clone(),
    }
}

pub fn notes_artifact(bundle: &TranscriptBundle) -> Artifact {
    Artifact {
        filename: NOTES_FILENAME,
        content_type: "text/markdown",
        body: bundle.notes.clone(),
    }
}
