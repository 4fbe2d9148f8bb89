mod cli;
mod terminal;
mod uploads;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use docqa_core::{config, Config};
use docqa_ingest::build_embedder;
use docqa_llm::AnswerSynthesizer;
use docqa_rag::{Query, Session, SessionOptions};

use crate::cli::{AskArgs, ChatArgs, CliArgs, Command, SourceArgs};
use crate::terminal::Terminal;
use crate::uploads::read_uploads;

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let mut config = Config::from_env();

    match args.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
            Ok(())
        }
        Command::Ask(ask) => {
            apply_overrides(&mut config, &ask.source);
            let mut session = start_session(&config)?;
            index_files(&mut session, &ask.source, &Terminal::new()).await?;
            run_ask(&session, &ask).await
        }
        Command::Chat(chat) => {
            apply_overrides(&mut config, &chat.source);
            let mut session = start_session(&config)?;
            let terminal = Terminal::new();
            let report = index_files(&mut session, &chat.source, &terminal).await?;
            let model = match config.llm.provider.as_str() {
                "ollama" => config.ollama.model.as_str(),
                _ => config.llm.model(),
            };
            terminal.print_banner(&config.llm.provider, model, &report)?;
            run_chat(&session, &chat, &terminal).await
        }
    }
}

fn apply_overrides(config: &mut Config, source: &SourceArgs) {
    if let Some(k) = source.top_k {
        config.retrieval.top_k = k;
    }
}

/// Validate configuration and build the pipeline. Fails before any file is
/// read when the synthesizer's credential is missing.
fn start_session(config: &Config) -> Result<Session> {
    config.validate().context("configuration error")?;
    config.log_summary();

    let embedder = build_embedder(config).context("failed to create embedding provider")?;
    let synthesizer =
        AnswerSynthesizer::from_config(config).context("failed to initialize answer synthesizer")?;
    let options = SessionOptions::from_config(config).context("invalid retrieval settings")?;
    Ok(Session::new(embedder, synthesizer, options))
}

async fn index_files(
    session: &mut Session,
    source: &SourceArgs,
    terminal: &Terminal,
) -> Result<docqa_rag::IngestReport> {
    let uploads = read_uploads(&source.files)?;
    let report = session
        .ingest(uploads)
        .await
        .context("failed to index uploaded files")?;
    terminal.print_rejected(&report)?;
    info!(
        files = report.accepted.len(),
        chunks = report.chunks,
        "ready for questions"
    );
    Ok(report)
}

async fn run_ask(session: &Session, ask: &AskArgs) -> Result<()> {
    let terminal = Terminal::new();
    let query = Query::new(ask.question()).with_language(ask.source.language);

    let Some(answer) = session.ask(&query).await.context("failed to answer question")? else {
        terminal.print_info("No documents uploaded; pass --file to index something first.")?;
        return Ok(());
    };

    if ask.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        terminal.print_answer(&answer)?;
    }
    Ok(())
}

async fn run_chat(session: &Session, chat: &ChatArgs, terminal: &Terminal) -> Result<()> {
    if !session.has_index() {
        terminal.print_info("No documents uploaded; pass --file to index something first.")?;
        return Ok(());
    }

    loop {
        let input = match terminal.read_input()? {
            Some(text) => text,
            None => {
                terminal.print_info("Goodbye.")?;
                break;
            }
        };

        if input.is_empty() {
            continue;
        }

        let query = Query::new(input).with_language(chat.source.language);
        match session.ask(&query).await {
            Ok(Some(answer)) => terminal.print_answer(&answer)?,
            Ok(None) => terminal.print_info("No documents indexed.")?,
            Err(e) => {
                error!(error = %e, "question failed");
                terminal.print_error(&format!("{:#}", e))?;
            }
        }
    }

    Ok(())
}
