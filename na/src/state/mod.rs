//! Session state management
//!
//! Wraps the synchronous [`sessionstore::SessionStore`] in an actor so
//! concurrent message handlers get atomic store mutations without sharing
//! the map. Includes the periodic expiry sweeper.

mod manager;
mod messages;

pub use manager::{StateManager, spawn_sweeper};
pub use messages::{StateCommand, StateError, StateResponse};
