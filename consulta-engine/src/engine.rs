use crate::session::{ConsultError, NotesError, PipelineStage};
use crate::traits::{AudioClip, GenerationProvider, TranscriptionProvider};
use consulta_core::analysis::{StructuredAnalysis, extract};
use consulta_core::prompt::{Locale, build_consultation_prompt, build_notes_prompt};
use consulta_core::session::Session;
use consulta_core::types::{ApiKey, TranscriptBundle};
use std::future::Future;
use std::sync::Arc;

/// Driver of the iterative-consultation pipeline.
///
/// One call to `submit` is one full pipeline run: append the observation,
/// re-derive the analysis from the entire accumulated history, and replace
/// the session's analysis wholesale. The `&mut Session` borrow enforces the
/// single-in-flight rule per session at compile time.
pub struct ConsultationEngine {
    llm: Arc<dyn GenerationProvider>,
    locale: Locale,
}

impl ConsultationEngine {
    pub fn new(llm: Arc<dyn GenerationProvider>, locale: Locale) -> Self {
        Self { llm, locale }
    }

    pub async fn submit(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<StructuredAnalysis, ConsultError> {
        self.submit_with_hook(session, text, |_stage| async {}).await
    }

    /// Same as `submit`, but emits a stage hook as the pipeline progresses.
    ///
    /// The hook is intended for UI progress (blocking the input box while a
    /// run is in flight) and must be fast.
    pub async fn submit_with_hook<F, Fut>(
        &self,
        session: &mut Session,
        text: &str,
        on_stage: F,
    ) -> Result<StructuredAnalysis, ConsultError>
    where
        F: Fn(PipelineStage) -> Fut,
        Fut: Future<Output = ()>,
    {
        // Credential first: a session without one must not be mutated at all.
        let Some(key) = session.credential().cloned() else {
            return Err(ConsultError::MissingCredential);
        };

        session.append_observation(text)?;

        on_stage(PipelineStage::Submitting).await;
        let prompt = build_consultation_prompt(session.observations(), self.locale);

        // From here on the observation stays in history no matter what:
        // user input is never discarded because a downstream step failed.
        let raw = match self.llm.generate(&prompt, key.as_str()).await {
            Ok(raw) => raw,
            Err(e) => {
                on_stage(PipelineStage::Failed).await;
                return Err(e.into());
            }
        };

        let analysis = match extract(&raw) {
            Ok(analysis) => analysis,
            Err(e) => {
                on_stage(PipelineStage::Failed).await;
                return Err(e.into());
            }
        };

        session.replace_analysis(analysis.clone());
        on_stage(PipelineStage::Done).await;
        Ok(analysis)
    }
}

/// Driver of the single-shot transform pipeline (class notes).
///
/// No looped state: transcribe once, summarize once, and either both
/// artifacts exist or neither does. An interim transcript is discarded if
/// summarization fails.
pub struct NotesEngine {
    stt: Arc<dyn TranscriptionProvider>,
    llm: Arc<dyn GenerationProvider>,
    locale: Locale,
}

impl NotesEngine {
    pub fn new(
        stt: Arc<dyn TranscriptionProvider>,
        llm: Arc<dyn GenerationProvider>,
        locale: Locale,
    ) -> Self {
        Self { stt, llm, locale }
    }

    pub async fn run(
        &self,
        audio: &AudioClip,
        language_hint: &str,
        api_key: &ApiKey,
    ) -> Result<TranscriptBundle, NotesError> {
        self.run_with_hook(audio, language_hint, api_key, |_stage| async {})
            .await
    }

    pub async fn run_with_hook<F, Fut>(
        &self,
        audio: &AudioClip,
        language_hint: &str,
        api_key: &ApiKey,
        on_stage: F,
    ) -> Result<TranscriptBundle, NotesError>
    where
        F: Fn(PipelineStage) -> Fut,
        Fut: Future<Output = ()>,
    {
        on_stage(PipelineStage::Transcribing).await;
        let transcript = match self
            .stt
            .transcribe(audio, language_hint, api_key.as_str())
            .await
        {
            Ok(transcript) => transcript,
            Err(e) => {
                on_stage(PipelineStage::Failed).await;
                return Err(e.into());
            }
        };

        if transcript.trim().is_empty() {
            on_stage(PipelineStage::Failed).await;
            return Err(NotesError::EmptyTranscript);
        }

        on_stage(PipelineStage::Summarizing).await;
        let prompt = build_notes_prompt(&transcript, self.locale);
        let notes = match self.llm.generate(&prompt, api_key.as_str()).await {
            Ok(notes) => notes,
            Err(e) => {
                on_stage(PipelineStage::Failed).await;
                return Err(e.into());
            }
        };

        on_stage(PipelineStage::Done).await;
        Ok(TranscriptBundle { transcript, notes })
    }
}
