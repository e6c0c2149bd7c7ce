//! Core SessionStore implementation

use chrono::{Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::model::{ConversationMessage, Session, SessionId, Step, UserData, UserDataPatch};

/// In-memory session store with lazy expiry.
///
/// Entries whose last activity is older than the configured timeout are
/// treated as absent: lookups remove them on the spot, and
/// [`SessionStore::sweep_expired`] removes them in bulk. All reads return
/// owned snapshots; mutation happens only through the update operations.
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
    timeout: Duration,
}

impl SessionStore {
    /// Create a store whose entries expire after `timeout` of inactivity
    pub fn new(timeout: std::time::Duration) -> Self {
        let timeout = Duration::from_std(timeout).unwrap_or(Duration::MAX);
        Self {
            sessions: HashMap::new(),
            timeout,
        }
    }

    /// Initialize a fresh session, overwriting any existing entry with the
    /// same id.
    pub fn create(&mut self, id: impl Into<SessionId>) -> Session {
        let id = id.into();
        debug!(%id, "create: called");
        let now = Utc::now();
        let session = Session {
            id: id.clone(),
            created_at: now,
            last_activity: now,
            current_step: Step::Permission,
            user_data: UserData::default(),
            history: Vec::new(),
        };
        self.sessions.insert(id, session.clone());
        session
    }

    /// Look up a session; None when absent or expired. An expired entry is
    /// deleted as a side effect.
    pub fn get(&mut self, id: &str) -> Option<Session> {
        self.live_entry(id).map(|session| session.clone())
    }

    /// Append a message to the history and refresh activity
    pub fn add_message(&mut self, id: &str, message: ConversationMessage) -> Option<Session> {
        debug!(%id, role = ?message.role, "add_message: called");
        let session = self.live_entry(id)?;
        session.history.push(message);
        session.last_activity = Utc::now();
        Some(session.clone())
    }

    /// Merge a partial record update and refresh activity.
    ///
    /// Top-level fields merge shallowly; the nested profile merges
    /// field-by-field (new fields win, unspecified fields retained).
    pub fn update_user_data(&mut self, id: &str, patch: UserDataPatch) -> Option<Session> {
        debug!(%id, "update_user_data: called");
        let session = self.live_entry(id)?;
        session.user_data.apply(patch);
        session.last_activity = Utc::now();
        Some(session.clone())
    }

    /// Advance to the next step (saturating at Complete) and refresh
    /// activity.
    pub fn advance_step(&mut self, id: &str) -> Option<Session> {
        debug!(%id, "advance_step: called");
        let session = self.live_entry(id)?;
        session.current_step = session.current_step.next();
        session.last_activity = Utc::now();
        Some(session.clone())
    }

    /// Remove a session; true when an entry existed
    pub fn delete(&mut self, id: &str) -> bool {
        debug!(%id, "delete: called");
        self.sessions.remove(id).is_some()
    }

    /// Number of stored entries, including not-yet-swept expired ones
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Delete every expired entry and return how many were removed
    pub fn sweep_expired(&mut self) -> usize {
        let now = Utc::now();
        let timeout = self.timeout;
        let before = self.sessions.len();
        self.sessions.retain(|_, session| now - session.last_activity <= timeout);
        let swept = before - self.sessions.len();
        if swept > 0 {
            debug!(swept, "sweep_expired: removed entries");
        }
        swept
    }

    /// Fetch a live entry, removing it first when expired
    fn live_entry(&mut self, id: &str) -> Option<&mut Session> {
        let now = Utc::now();
        let expired = self
            .sessions
            .get(id)
            .is_some_and(|session| now - session.last_activity > self.timeout);
        if expired {
            debug!(%id, "live_entry: session expired, removing");
            self.sessions.remove(id);
            return None;
        }
        self.sessions.get_mut(id)
    }
}
