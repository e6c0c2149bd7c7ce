//! StateManager - actor that owns the SessionStore
//!
//! Processes commands via channels for serialized access to session state.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use sessionstore::{ConversationMessage, Session, SessionStore, UserDataPatch};

use super::messages::{StateCommand, StateError, StateResponse};

/// Handle to send commands to the StateManager actor
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn a new StateManager actor owning a store with the given
    /// inactivity timeout.
    pub fn spawn(session_timeout: Duration) -> Self {
        let store = SessionStore::new(session_timeout);
        let (tx, rx) = mpsc::channel(256);

        tokio::spawn(actor_loop(store, rx));

        info!("StateManager spawned");
        Self { tx }
    }

    /// Initialize a fresh session, overwriting any existing entry
    pub async fn create(&self, id: &str) -> StateResponse<Session> {
        debug!(%id, "create: called");
        self.send(|reply| StateCommand::Create { id: id.to_string(), reply }).await
    }

    /// Look up a session; None when absent or expired
    pub async fn get(&self, id: &str) -> StateResponse<Option<Session>> {
        debug!(%id, "get: called");
        self.send(|reply| StateCommand::Get { id: id.to_string(), reply }).await
    }

    /// Append a message to the session history
    pub async fn add_message(&self, id: &str, message: ConversationMessage) -> StateResponse<Option<Session>> {
        debug!(%id, "add_message: called");
        self.send(|reply| StateCommand::AddMessage {
            id: id.to_string(),
            message,
            reply,
        })
        .await
    }

    /// Merge a partial record update into the session
    pub async fn update_user_data(&self, id: &str, patch: UserDataPatch) -> StateResponse<Option<Session>> {
        debug!(%id, "update_user_data: called");
        self.send(|reply| StateCommand::UpdateUserData {
            id: id.to_string(),
            patch,
            reply,
        })
        .await
    }

    /// Advance the session to the next step (saturating at Complete)
    pub async fn advance_step(&self, id: &str) -> StateResponse<Option<Session>> {
        debug!(%id, "advance_step: called");
        self.send(|reply| StateCommand::AdvanceStep { id: id.to_string(), reply }).await
    }

    /// Remove a session; true when an entry existed
    pub async fn delete(&self, id: &str) -> StateResponse<bool> {
        debug!(%id, "delete: called");
        self.send(|reply| StateCommand::Delete { id: id.to_string(), reply }).await
    }

    /// Number of stored entries
    pub async fn count(&self) -> StateResponse<usize> {
        self.send(|reply| StateCommand::Count { reply }).await
    }

    /// Delete every expired entry and return how many were removed
    pub async fn sweep_expired(&self) -> StateResponse<usize> {
        self.send(|reply| StateCommand::SweepExpired { reply }).await
    }

    async fn send<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> StateCommand) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(command(reply_tx))
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)
    }
}

async fn actor_loop(mut store: SessionStore, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::Create { id, reply } => {
                let _ = reply.send(store.create(id));
            }
            StateCommand::Get { id, reply } => {
                let _ = reply.send(store.get(&id));
            }
            StateCommand::AddMessage { id, message, reply } => {
                let _ = reply.send(store.add_message(&id, message));
            }
            StateCommand::UpdateUserData { id, patch, reply } => {
                let _ = reply.send(store.update_user_data(&id, patch));
            }
            StateCommand::AdvanceStep { id, reply } => {
                let _ = reply.send(store.advance_step(&id));
            }
            StateCommand::Delete { id, reply } => {
                let _ = reply.send(store.delete(&id));
            }
            StateCommand::Count { reply } => {
                let _ = reply.send(store.count());
            }
            StateCommand::SweepExpired { reply } => {
                let _ = reply.send(store.sweep_expired());
            }
        }
    }

    debug!("StateManager actor stopped");
}

/// Run the expiry sweep on a fixed period, independent of request traffic.
///
/// The sweeper only ever deletes; it stops when the actor goes away.
pub fn spawn_sweeper(state: StateManager, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            match state.sweep_expired().await {
                Ok(0) => {}
                Ok(swept) => info!(swept, "Cleaned up expired sessions"),
                Err(_) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessionstore::{Step, UserProfile};

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let state = StateManager::spawn(Duration::from_secs(3600));

        let created = state.create("s1").await.unwrap();
        assert_eq!(created.current_step, Step::Permission);

        let fetched = state.get("s1").await.unwrap().unwrap();
        assert_eq!(fetched.id, "s1");
    }

    #[tokio::test]
    async fn test_update_and_advance() {
        let state = StateManager::spawn(Duration::from_secs(3600));
        state.create("s1").await.unwrap();

        let session = state
            .update_user_data(
                "s1",
                UserDataPatch {
                    profile: UserProfile {
                        age: Some(25),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.user_data.profile.age, Some(25));

        let session = state.advance_step("s1").await.unwrap().unwrap();
        assert_eq!(session.current_step, Step::Age);
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let state = StateManager::spawn(Duration::from_secs(3600));
        state.create("s1").await.unwrap();
        state.create("s2").await.unwrap();
        assert_eq!(state.count().await.unwrap(), 2);

        assert!(state.delete("s1").await.unwrap());
        assert!(!state.delete("s1").await.unwrap());
        assert_eq!(state.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sweep_expired_removes_stale_sessions() {
        let state = StateManager::spawn(Duration::ZERO);
        state.create("s1").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(state.sweep_expired().await.unwrap(), 1);
        assert_eq!(state.count().await.unwrap(), 0);
    }
}
