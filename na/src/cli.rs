//! Command-line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Conversational nutrition intake assistant
#[derive(Debug, Parser)]
#[command(name = "na", version, about = "Conversational nutrition intake assistant")]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive intake chat session (the default)
    Chat {
        /// Reuse an existing session id instead of generating one
        #[arg(long)]
        session_id: Option<String>,

        /// First message to send before the prompt loop starts
        initial_message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_no_command() {
        let cli = Cli::try_parse_from(["na"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_chat_with_session_id() {
        let cli = Cli::try_parse_from(["na", "chat", "--session-id", "abc", "olá"]).unwrap();
        match cli.command {
            Some(Command::Chat {
                session_id,
                initial_message,
            }) => {
                assert_eq!(session_id.as_deref(), Some("abc"));
                assert_eq!(initial_message.as_deref(), Some("olá"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
