use anyhow::{Context, bail};
use consulta_core::analysis::StructuredAnalysis;
use consulta_core::prompt::Locale;
use consulta_core::session::Session;
use consulta_core::types::ApiKey;
use consulta_engine::engine::{ConsultationEngine, NotesEngine};
use consulta_engine::session::ConsultError;
use consulta_engine::traits::AudioClip;
use consulta_runtime::export::{notes_artifact, transcript_artifact};
use consulta_runtime::llm::GeminiGenerationProvider;
use consulta_runtime::stt::GeminiTranscriptionProvider;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => run_consultation().await,
        Some("notes") => {
            let path = args
                .get(1)
                .context("usage: consulta-cli notes <audio-file>")?;
            run_notes(Path::new(path)).await
        }
        Some(other) => bail!("unknown command: {other} (expected no command or `notes`)"),
    }
}

fn read_api_key() -> anyhow::Result<ApiKey> {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(ApiKey::new(key));
        }
    }

    print!("Chave API: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let key = line.trim();
    if key.is_empty() {
        bail!("an API key is required (set GEMINI_API_KEY or type one)");
    }
    Ok(ApiKey::new(key))
}

async fn run_consultation() -> anyhow::Result<()> {
    let engine = ConsultationEngine::new(Arc::new(GeminiGenerationProvider::new()), Locale::PtBr);

    let mut session = Session::new();
    session.set_credential(read_api_key()?);

    println!("Insira dados do caso clínico. Comandos: /clear reinicia a sessão, /quit sai.");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "/quit" => break,
            "/clear" => {
                // Clearing wipes the credential with everything else, so a
                // fresh session asks for the key again.
                session.clear();
                session.set_credential(read_api_key()?);
                println!("Sessão reiniciada.");
            }
            "" => continue,
            text => {
                println!("Analisando...");
                match engine.submit(&mut session, text).await {
                    Ok(analysis) => render_analysis(&analysis),
                    Err(ConsultError::Extract(e)) => {
                        log::warn!("extraction failed: {e}");
                        println!("Não foi possível interpretar a resposta. Tente novamente.");
                    }
                    Err(e) => println!("Erro: {e}"),
                }
            }
        }
    }

    Ok(())
}

fn render_analysis(analysis: &StructuredAnalysis) {
    if !analysis.diagnoses.is_empty() {
        println!("\nPossíveis diagnósticos:");
        for d in &analysis.diagnoses {
            let filled = usize::from(d.probability.min(100)) / 5;
            println!("  {:<30} {:>3}% {}", d.condition, d.probability, "#".repeat(filled));
        }
    }
    if !analysis.follow_up_questions.is_empty() {
        println!("\nPerguntas sugeridas:");
        for (i, q) in analysis.follow_up_questions.iter().enumerate() {
            println!("  Q{}: {}", i + 1, q);
        }
    }
    if !analysis.suggested_conduct.is_empty() {
        println!("\nConduta sugerida:\n  {}", analysis.suggested_conduct);
    }
    if !analysis.suggested_followup.is_empty() {
        println!("\nSeguimento sugerido:\n  {}", analysis.suggested_followup);
    }
    println!();
}

async fn run_notes(path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("read audio file {}", path.display()))?;
    let clip = AudioClip {
        mime_type: mime_for_path(path).into(),
        bytes,
    };

    let engine = NotesEngine::new(
        Arc::new(GeminiTranscriptionProvider::new()),
        Arc::new(GeminiGenerationProvider::new()),
        Locale::PtBr,
    );

    let key = read_api_key()?;
    let bundle = engine
        .run_with_hook(&clip, "Brazilian Portuguese", &key, |stage| async move {
            eprintln!("[{}]", stage.label());
        })
        .await?;

    for artifact in [transcript_artifact(&bundle), notes_artifact(&bundle)] {
        std::fs::write(artifact.filename, &artifact.body)
            .with_context(|| format!("write {}", artifact.filename))?;
        println!("Gerado {} ({})", artifact.filename, artifact.content_type);
    }

    Ok(())
}

fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp3") => "audio/mp3",
        Some("wav") => "audio/wav",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}
