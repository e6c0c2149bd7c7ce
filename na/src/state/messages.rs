//! State manager messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use sessionstore::{ConversationMessage, Session, SessionId, UserDataPatch};

/// Errors from state operations.
///
/// The in-memory store itself is infallible; the only failure mode is the
/// actor channel closing.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Channel error")]
    ChannelError,
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    Create {
        id: SessionId,
        reply: oneshot::Sender<Session>,
    },
    Get {
        id: SessionId,
        reply: oneshot::Sender<Option<Session>>,
    },
    AddMessage {
        id: SessionId,
        message: ConversationMessage,
        reply: oneshot::Sender<Option<Session>>,
    },
    UpdateUserData {
        id: SessionId,
        patch: UserDataPatch,
        reply: oneshot::Sender<Option<Session>>,
    },
    AdvanceStep {
        id: SessionId,
        reply: oneshot::Sender<Option<Session>>,
    },
    Delete {
        id: SessionId,
        reply: oneshot::Sender<bool>,
    },
    Count {
        reply: oneshot::Sender<usize>,
    },
    SweepExpired {
        reply: oneshot::Sender<usize>,
    },
}
