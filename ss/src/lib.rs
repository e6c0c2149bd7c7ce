//! SessionStore - bounded in-memory conversational session state
//!
//! Keyed session records for the intake flow: creation, lookup with lazy
//! expiry, append-only message history, record merging, step advancement,
//! and a sweep operation intended to run on a fixed interval. Sessions
//! never outlive the process.
//!
//! # Example
//!
//! ```ignore
//! use sessionstore::{ConversationMessage, SessionStore};
//!
//! let mut store = SessionStore::new(std::time::Duration::from_secs(3600));
//! store.create("abc-123");
//! store.add_message("abc-123", ConversationMessage::user("olá"));
//! ```

pub mod model;
mod store;

pub use model::{
    ActivityLevel, ConversationMessage, MessageRole, Session, SessionId, SessionSummary, Sex, Step, UserData,
    UserDataPatch, UserProfile,
};
pub use store::SessionStore;

/// Fixed timezone tag stamped on completed records
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Default session inactivity timeout (1 hour)
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 3600;
