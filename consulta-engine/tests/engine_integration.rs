use consulta_core::prompt::Locale;
use consulta_core::session::Session;
use consulta_core::types::ApiKey;
use consulta_engine::engine::{ConsultationEngine, NotesEngine};
use consulta_engine::session::{ConsultError, NotesError, PipelineStage};
use consulta_engine::traits::{
    AudioClip, GatewayError, GenerationProvider, TranscriptionProvider,
};
use consulta_providers::gemini::{
    GeminiConfig, build_generate_content_request, build_transcription_request,
};
use consulta_providers::parse::parse_generate_content;
use consulta_providers::request::HttpRequest;
use consulta_providers::runtime;
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

/// Gemini provider pointed at a mock server, with the same status mapping
/// the runtime crate applies.
struct GeminiTestProvider {
    base_url: String,
}

impl GeminiTestProvider {
    fn config(&self, api_key: &str) -> GeminiConfig {
        GeminiConfig {
            base_url: self.base_url.clone(),
            api_key: api_key.to_string(),
            model: "gemini-2.5-flash".into(),
        }
    }

    async fn dispatch(&self, req: &HttpRequest) -> Result<String, GatewayError> {
        let resp = runtime::execute(req)
            .await
            .map_err(|e| GatewayError::TransportFailed {
                status: None,
                detail: e.to_string(),
            })?;

        match resp.status {
            401 | 403 => Err(GatewayError::AuthenticationFailed),
            s if !(200..=299).contains(&s) => Err(GatewayError::TransportFailed {
                status: Some(s),
                detail: String::from_utf8_lossy(&resp.body).into_owned(),
            }),
            _ => parse_generate_content(&resp.body).map_err(|e| GatewayError::Unknown(e.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl GenerationProvider for GeminiTestProvider {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, GatewayError> {
        let req = build_generate_content_request(&self.config(api_key), prompt);
        self.dispatch(&req).await
    }
}

#[async_trait::async_trait]
impl TranscriptionProvider for GeminiTestProvider {
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
        self.dispatch(&req).await
    }
}

fn gemini_body(text: &str) -> String {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}).to_string()
}

async fn mount_text_response(server: &MockServer, text: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(gemini_body(text), "application/json"))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

fn engine_for(server: &MockServer) -> ConsultationEngine {
    ConsultationEngine::new(
        Arc::new(GeminiTestProvider {
            base_url: server.uri(),
        }),
        Locale::PtBr,
    )
}

fn session_with_key() -> Session {
    let mut session = Session::new();
    session.set_credential(ApiKey::new("k"));
    session
}

#[tokio::test]
async fn submit_extracts_analysis_embedded_in_prose() {
    let server = MockServer::start().await;
    let reply = concat!(
        "Claro! Segue a análise:\n",
        r#"{"diagnoses":[{"condition":"Dengue","probability":60}],"#,
        r#""follow_up_questions":["Há manchas na pele?"],"#,
        r#""suggested_conduct":"Hidratação e repouso","#,
        r#""suggested_followup":"Hemograma completo"}"#
    );
    mount_text_response(&server, reply, 1).await;

    let engine = engine_for(&server);
    let mut session = session_with_key();

    let analysis = engine
        .submit(&mut session, "febre e dor de cabeça há 2 dias")
        .await
        .unwrap();

    assert_eq!(analysis.diagnoses.len(), 1);
    assert_eq!(analysis.diagnoses[0].condition, "Dengue");
    assert_eq!(analysis.diagnoses[0].probability, 60);
    assert_eq!(analysis.follow_up_questions.len(), 1);
    assert_eq!(session.observations(), &["febre e dor de cabeça há 2 dias"]);
    assert_eq!(session.latest_analysis(), Some(&analysis));
}

#[tokio::test]
async fn second_submission_sends_the_full_history() {
    let server = MockServer::start().await;
    mount_text_response(&server, r#"{"diagnoses":[]}"#, 2).await;

    let engine = engine_for(&server);
    let mut session = session_with_key();

    engine.submit(&mut session, "febre há 2 dias").await.unwrap();
    engine.submit(&mut session, "tosse seca").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let last_body = String::from_utf8_lossy(&requests[1].body).into_owned();
    let first = last_body.find("Input 1: febre há 2 dias").unwrap();
    let second = last_body.find("Input 2: tosse seca").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn transport_failure_keeps_observation_and_previous_analysis() {
    let server = MockServer::start().await;
    mount_text_response(
        &server,
        r#"{"diagnoses":[{"condition":"Gripe","probability":70}]}"#,
        1,
    )
    .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let mut session = session_with_key();

    let first = engine.submit(&mut session, "febre").await.unwrap();

    let err = engine.submit(&mut session, "tosse").await.unwrap_err();
    assert!(matches!(
        err,
        ConsultError::Gateway(GatewayError::TransportFailed {
            status: Some(500),
            ..
        })
    ));

    // The failed turn still recorded its observation; the analysis is still
    // the one derived before the failure.
    assert_eq!(session.observations(), &["febre", "tosse"]);
    assert_eq!(session.latest_analysis(), Some(&first));
}

#[tokio::test]
async fn rejected_credential_maps_to_authentication_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let mut session = session_with_key();

    let err = engine.submit(&mut session, "febre").await.unwrap_err();
    assert!(matches!(
        err,
        ConsultError::Gateway(GatewayError::AuthenticationFailed)
    ));
    assert_eq!(session.observations(), &["febre"]);
}

#[tokio::test]
async fn missing_credential_blocks_before_any_mutation() {
    let server = MockServer::start().await;

    let engine = engine_for(&server);
    let mut session = Session::new();

    let err = engine.submit(&mut session, "febre").await.unwrap_err();
    assert!(matches!(err, ConsultError::MissingCredential));
    assert!(session.observations().is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unparsable_reply_fails_but_keeps_the_observation() {
    let server = MockServer::start().await;
    mount_text_response(&server, "desculpe, não consegui analisar este caso", 1).await;

    let engine = engine_for(&server);
    let mut session = session_with_key();

    let err = engine.submit(&mut session, "febre").await.unwrap_err();
    assert!(matches!(err, ConsultError::Extract(_)));
    assert_eq!(session.observations(), &["febre"]);
    assert!(session.latest_analysis().is_none());
}

#[tokio::test]
async fn stage_hook_observes_submitting_then_done() {
    let server = MockServer::start().await;
    mount_text_response(&server, r#"{"diagnoses":[]}"#, 1).await;

    let engine = engine_for(&server);
    let mut session = session_with_key();

    let stages: Arc<Mutex<Vec<PipelineStage>>> = Arc::new(Mutex::new(vec![]));
    engine
        .submit_with_hook(&mut session, "febre", |stage| {
            let stages = stages.clone();
            async move {
                stages.lock().unwrap().push(stage);
            }
        })
        .await
        .unwrap();

    assert_eq!(
        *stages.lock().unwrap(),
        vec![PipelineStage::Submitting, PipelineStage::Done]
    );
}

fn clip() -> AudioClip {
    AudioClip {
        mime_type: "audio/mp3".into(),
        bytes: vec![1, 2, 3, 4],
    }
}

#[tokio::test]
async fn notes_run_transcribes_then_summarizes() {
    let server = MockServer::start().await;
    mount_text_response(&server, "hoje a aula foi sobre fotossíntese", 1).await;
    mount_text_response(&server, "# Notas de aula\n\n- Fotossíntese", 1).await;

    let provider = Arc::new(GeminiTestProvider {
        base_url: server.uri(),
    });
    let engine = NotesEngine::new(provider.clone(), provider, Locale::PtBr);

    let bundle = engine
        .run(&clip(), "Brazilian Portuguese", &ApiKey::new("k"))
        .await
        .unwrap();

    assert_eq!(bundle.transcript, "hoje a aula foi sobre fotossíntese");
    assert!(bundle.notes.starts_with("# Notas de aula"));

    // First call carried the audio inline, second carried the transcript.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let first_body = String::from_utf8_lossy(&requests[0].body).into_owned();
    let second_body = String::from_utf8_lossy(&requests[1].body).into_owned();
    assert!(first_body.contains("inline_data"));
    assert!(second_body.contains("fotossíntese"));
}

#[tokio::test]
async fn notes_summarization_failure_discards_the_transcript() {
    let server = MockServer::start().await;
    mount_text_response(&server, "transcrição parcial", 1).await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = Arc::new(GeminiTestProvider {
        base_url: server.uri(),
    });
    let engine = NotesEngine::new(provider.clone(), provider, Locale::PtBr);

    let err = engine
        .run(&clip(), "Brazilian Portuguese", &ApiKey::new("k"))
        .await
        .unwrap_err();
    assert!(matches!(err, NotesError::Gateway(_)));
}

#[tokio::test]
async fn whitespace_transcription_aborts_before_summarizing() {
    let server = MockServer::start().await;
    mount_text_response(&server, "   \n\t", 1).await;

    let provider = Arc::new(GeminiTestProvider {
        base_url: server.uri(),
    });
    let engine = NotesEngine::new(provider.clone(), provider, Locale::PtBr);

    let err = engine
        .run(&clip(), "Brazilian Portuguese", &ApiKey::new("k"))
        .await
        .unwrap_err();
    assert!(matches!(err, NotesError::EmptyTranscript));

    // Only the transcription call went out.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
