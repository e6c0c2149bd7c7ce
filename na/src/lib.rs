//! nutriassist - conversational nutrition intake assistant
//!
//! A step-driven dialogue that collects a structured nutrition profile
//! from natural-language messages, then produces a generated diet plan
//! and an exportable document.
//!
//! # Core Concepts
//!
//! - **Fixed Step Sequence**: the intake is a strict linear state machine;
//!   steps only move forward, invalid answers re-ask the same step
//! - **Injected Capabilities**: the generative-text backend and document
//!   renderer are traits, so both run against deterministic stubs in tests
//! - **Never Dead-End**: a deterministic templated plan replaces the
//!   generated one whenever the backend fails
//! - **Bounded Sessions**: state is in-memory only, expired lazily on
//!   access and periodically by the sweeper
//!
//! # Modules
//!
//! - [`extract`] - pure text-to-typed-value parsers with synonym rules
//! - [`flow`] - the conversation state machine and message contract
//! - [`state`] - actor wrapping the session store
//! - [`plan`] - metabolic estimates and plan generation with fallback
//! - [`llm`] - LLM client trait and Gemini implementation
//! - [`export`] - document renderer boundary
//! - [`config`] - configuration types and loading
//! - [`cli`] / [`repl`] - command-line interface and interactive chat

pub mod cli;
pub mod config;
pub mod export;
pub mod extract;
pub mod flow;
pub mod llm;
pub mod plan;
pub mod prompts;
pub mod repl;
pub mod state;

// Re-export commonly used types
pub use config::{Config, LlmConfig, SessionConfig};
pub use export::{DocumentRenderer, ExportError, TextDocumentRenderer};
pub use flow::{EXPORT_SENTINEL, Engine, INTERNAL_ERROR_TEXT, MessageResponse};
pub use llm::{CompletionRequest, CompletionResponse, GeminiClient, LlmClient, LlmError, Message, create_client};
pub use plan::{PlanGenerator, basal_metabolic_rate, daily_calories};
pub use state::{StateError, StateManager, spawn_sweeper};
