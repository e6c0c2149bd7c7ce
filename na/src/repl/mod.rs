//! Interactive chat session
//!
//! Drives the engine from a terminal: a readline loop for the intake
//! conversation plus slash commands for session inspection and document
//! export. This is the thin presentation layer in front of the core
//! contracts.

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use sessionstore::UserData;

use crate::export::{DocumentRenderer, TextDocumentRenderer};
use crate::flow::{EXPORT_SENTINEL, Engine};

/// Default path for the exported document
const DEFAULT_EXPORT_PATH: &str = "plano-alimentar.txt";

/// Interactive chat session bound to one session id
pub struct ChatSession {
    engine: Arc<Engine>,
    renderer: TextDocumentRenderer,
    session_id: String,
    /// Completed record + plan text, once the flow finishes
    plan: Option<(UserData, String)>,
}

enum SlashResult {
    Continue,
    Quit,
}

impl ChatSession {
    /// Create a chat session; a fresh id is generated unless one is given
    pub fn new(engine: Arc<Engine>, session_id: Option<String>) -> Self {
        let session_id = session_id.unwrap_or_else(|| Uuid::now_v7().to_string());
        Self {
            engine,
            renderer: TextDocumentRenderer::new(),
            session_id,
            plan: None,
        }
    }

    /// Run the chat main loop
    pub async fn run(&mut self, initial_message: Option<String>) -> Result<()> {
        self.print_welcome();

        // Open with a greeting so the assistant asks for permission first
        let opener = initial_message.unwrap_or_else(|| "olá".to_string());
        println!("{} {}", ">".bright_green(), opener);
        self.process_user_input(&opener).await;

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_user_input(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Até logo!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!("{}", "nutriassist - assistente nutricional".bright_cyan().bold());
        println!("Sessão: {}", self.session_id.dimmed());
        println!("Comandos: /session, /export [caminho], /quit\n");
    }

    async fn process_user_input(&mut self, input: &str) {
        let response = self.engine.process_message(&self.session_id, input).await;

        // The sentinel is a signal for presentation layers, not for humans
        let display = response.text.replace(EXPORT_SENTINEL, "").trim_end().to_string();
        println!("{} {}\n", "nutri>".bright_cyan(), display);

        if response.done {
            if let Some(record) = response.record {
                self.plan = Some((record, display));
            }
            println!(
                "{}",
                "Plano pronto! Use /export [caminho] para salvar o documento.".bright_yellow()
            );
        }
    }

    async fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or("");

        match command {
            "/quit" | "/exit" => SlashResult::Quit,
            "/help" => {
                println!("/session           mostra os metadados da sessão");
                println!("/export [caminho]  salva o documento do plano (padrão: {DEFAULT_EXPORT_PATH})");
                println!("/quit              encerra a conversa");
                SlashResult::Continue
            }
            "/session" => {
                match self.engine.session_summary(&self.session_id).await {
                    Some(summary) => {
                        println!("id: {}", summary.id);
                        println!("passo atual: {:?}", summary.current_step);
                        println!("completo: {}", summary.completed);
                        println!("mensagens: {}", summary.message_count);
                        println!("última atividade: {}", summary.last_activity);
                    }
                    None => println!("{}", "Sessão não encontrada (expirada?).".yellow()),
                }
                SlashResult::Continue
            }
            "/export" => {
                let path = parts.next().unwrap_or(DEFAULT_EXPORT_PATH);
                self.export_document(Path::new(path)).await;
                SlashResult::Continue
            }
            other => {
                println!("Comando desconhecido: {other}. Use /help.");
                SlashResult::Continue
            }
        }
    }

    async fn export_document(&self, path: &Path) {
        let Some((record, plan)) = &self.plan else {
            println!("{}", "Ainda não há plano completo para exportar.".yellow());
            return;
        };

        match self.renderer.render(record, plan).await {
            Ok(bytes) => match std::fs::write(path, bytes) {
                Ok(()) => println!("Documento salvo em {}", path.display()),
                Err(err) => println!("{} {err}", "Falha ao salvar o documento:".red()),
            },
            Err(err) => println!("{} {err}", "Falha ao renderizar o documento:".red()),
        }
    }
}
