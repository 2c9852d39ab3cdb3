use serde::{Deserialize, Serialize};

/// Output language of the model-facing instruction blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    PtBr,
    En,
}

const CONSULTATION_HEADER: &str =
    "As a medical AI assistant, analyze the following consultation data and provide:";

// The JSON example doubles as the output contract: field names here are the
// field names the extractor decodes.
const CONSULTATION_SHAPE: &str = r#"Please provide your response in the following JSON format:
{
    "diagnoses": [
        {"condition": "Diagnosis 1", "probability": 85},
        {"condition": "Diagnosis 2", "probability": 70},
        {"condition": "Diagnosis 3", "probability": 45}
    ],
    "follow_up_questions": [
        "Question 1 to gather more information",
        "Question 2 to clarify symptoms"
    ],
    "suggested_conduct": "Immediate actions and treatment recommendations",
    "suggested_followup": "Recommended examinations, tests, and follow-up appointments"
}"#;

const CONSULTATION_RULES_PT_BR: &str = r#"Important:
- Diagnoses should be ranked by probability (highest first) and must be in Brazilian Portuguese
- Probabilities should be integers between 0 and 100 and reflect realistic medical uncertainty
- All text fields must be written in Brazilian Portuguese
- Follow-up questions should be specific and relevant to the current information
- Conduct suggestions should be immediate, actionable medical advice
- Keep medical advice general and emphasize the need for proper medical evaluation"#;

const CONSULTATION_RULES_EN: &str = r#"Important:
- Diagnoses should be ranked by probability (highest first) and must be in English
- Probabilities should be integers between 0 and 100 and reflect realistic medical uncertainty
- All text fields must be written in English
- Follow-up questions should be specific and relevant to the current information
- Conduct suggestions should be immediate, actionable medical advice
- Keep medical advice general and emphasize the need for proper medical evaluation"#;

const NOTES_RULES_PT_BR: &str = r#"Write well-structured study notes in Markdown, in Brazilian Portuguese:
- Start with a short summary of the class
- Group the content under topic headings, in the order it was presented
- Use bullet points for definitions, formulas and examples
- Finish with a list of points the students should review
- Output only the Markdown notes, nothing else"#;

const NOTES_RULES_EN: &str = r#"Write well-structured study notes in Markdown, in English:
- Start with a short summary of the class
- Group the content under topic headings, in the order it was presented
- Use bullet points for definitions, formulas and examples
- Finish with a list of points the students should review
- Output only the Markdown notes, nothing else"#;

/// Renders the iterative-consultation prompt from the full observation
/// history. Pure and deterministic: the entire history goes into every
/// prompt, each entry tagged with its 1-based position, so the model's
/// analysis stays self-consistent across turns. Prompt size grows linearly
/// with the number of turns, which is acceptable for one consultation.
pub fn build_consultation_prompt(observations: &[String], locale: Locale) -> String {
    let joined = observations
        .iter()
        .enumerate()
        .map(|(i, text)| format!("Input {}: {}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n");

    let rules = match locale {
        Locale::PtBr => CONSULTATION_RULES_PT_BR,
        Locale::En => CONSULTATION_RULES_EN,
    };

    format!(
        "{CONSULTATION_HEADER}\n\nConsultation Data:\n{joined}\n\n{CONSULTATION_SHAPE}\n\n{rules}"
    )
}

/// Renders the single-shot class-notes prompt from one transcript.
pub fn build_notes_prompt(transcript: &str, locale: Locale) -> String {
    let rules = match locale {
        Locale::PtBr => NOTES_RULES_PT_BR,
        Locale::En => NOTES_RULES_EN,
    };

    format!("You are given the transcript of a recorded class.\n\nTranscript:\n{transcript}\n\n{rules}")
}
