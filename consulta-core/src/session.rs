use crate::analysis::StructuredAnalysis;
use crate::types::{ApiKey, SessionId};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("observation is empty")]
    EmptyInput,
}

/// Full mutable state of one interactive consultation run.
///
/// Explicit value, no ambient store: every pipeline operation takes the
/// session it acts on, which keeps concurrent sessions isolated and lets the
/// core be tested without any UI harness. Mutated only between pipeline
/// state transitions; the analysis is always either absent or derived from
/// the current observation history as a whole.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: SessionId,
    observations: Vec<String>,
    latest_analysis: Option<StructuredAnalysis>,
    #[serde(skip)]
    credential: Option<ApiKey>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            observations: Vec::new(),
            latest_analysis: None,
            credential: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn observations(&self) -> &[String] {
        &self.observations
    }

    pub fn latest_analysis(&self) -> Option<&StructuredAnalysis> {
        self.latest_analysis.as_ref()
    }

    pub fn credential(&self) -> Option<&ApiKey> {
        self.credential.as_ref()
    }

    /// Appends one trimmed observation. Whitespace-only input is rejected
    /// with `EmptyInput` and leaves the session untouched. Insertion order
    /// is preserved; nothing is deduplicated or reordered.
    pub fn append_observation(&mut self, text: &str) -> Result<(), SessionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        self.observations.push(trimmed.to_string());
        Ok(())
    }

    /// Unconditional wholesale replacement; analyses are never merged.
    pub fn replace_analysis(&mut self, analysis: StructuredAnalysis) {
        self.latest_analysis = Some(analysis);
    }

    pub fn set_credential(&mut self, key: ApiKey) {
        self.credential = Some(key);
    }

    /// Resets every field to its initial empty state. The only way the
    /// observation history ever shrinks; there is no selective deletion.
    pub fn clear(&mut self) {
        self.observations.clear();
        self.latest_analysis = None;
        self.credential = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
