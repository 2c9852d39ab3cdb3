use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedDiagnosis {
    pub condition: String,
    pub probability: u8,
}

/// Structured record the consultation prompt asks the model to emit.
///
/// Every field is optional on the wire: a payload that omits one resolves to
/// the empty default, and unknown fields are ignored. The ranking of
/// `diagnoses` (non-increasing probability) is a contract on the *prompted*
/// shape only; nothing here re-sorts or validates what the model returned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuredAnalysis {
    #[serde(default)]
    pub diagnoses: Vec<RankedDiagnosis>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(default)]
    pub suggested_conduct: String,
    #[serde(default)]
    pub suggested_followup: String,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no structured payload found in model output")]
    NoPayloadFound,
    #[error("malformed structured payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Pulls the structured payload out of raw model output.
///
/// The model is asked to reply with a JSON object but routinely wraps it in
/// explanatory prose, so this takes the greedy span from the first `{` to the
/// last `}` and parses that. Deliberately permissive: a nested unrelated
/// object can false-match, which we accept in exchange for not requiring the
/// model to emit the payload alone. Swap this function out for a stricter
/// mode without touching the pipeline driver.
pub fn extract(raw: &str) -> Result<StructuredAnalysis, ExtractError> {
    let start = raw.find('{').ok_or(ExtractError::NoPayloadFound)?;
    let end = raw
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or(ExtractError::NoPayloadFound)?;

    let analysis = serde_json::from_str(&raw[start..=end])?;
    Ok(analysis)
}
