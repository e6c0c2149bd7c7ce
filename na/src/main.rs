//! nutriassist - conversational nutrition intake assistant
//!
//! CLI entry point for the interactive intake chat.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use nutriassist::cli::{Cli, Command};
use nutriassist::config::Config;
use nutriassist::flow::Engine;
use nutriassist::llm;
use nutriassist::repl::ChatSession;
use nutriassist::state::{StateManager, spawn_sweeper};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nutriassist")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file, not stdout/stderr - the terminal belongs to the chat
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("nutriassist.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "nutriassist loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::Chat {
            session_id,
            initial_message,
        }) => cmd_chat(&config, session_id, initial_message).await,
        None => cmd_chat(&config, None, None).await,
    }
}

async fn cmd_chat(config: &Config, session_id: Option<String>, initial_message: Option<String>) -> Result<()> {
    config.validate()?;

    let llm = llm::create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;

    let state = StateManager::spawn(config.session.timeout());
    let _sweeper = spawn_sweeper(state.clone(), config.session.sweep_interval());

    let engine = Arc::new(Engine::new(state, llm, &config.llm));

    let mut session = ChatSession::new(engine, session_id);
    session.run(initial_message).await
}
