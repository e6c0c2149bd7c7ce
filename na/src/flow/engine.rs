//! Conversation engine
//!
//! Drives a session through the fixed step sequence: extracts typed values
//! from each answer, merges them into the record, and crafts the next
//! prompt. The terminal step generates the plan. One engine instance
//! serves every session; handling is single-flight per session id.

use chrono::Utc;
use eyre::{Result, eyre};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use sessionstore::{
    ConversationMessage, DEFAULT_TIMEZONE, Session, SessionSummary, Step, UserData, UserDataPatch, UserProfile,
};

use crate::config::LlmConfig;
use crate::extract;
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::plan::PlanGenerator;
use crate::prompts::{Prompts, embedded};
use crate::state::StateManager;

use super::{
    COMPLETION_PREFIX, EXPORT_SENTINEL, GENERAL_FAILURE_TEXT, INTERNAL_ERROR_TEXT, MEDICAL_DISCLAIMER,
    contains_medical_request, is_affirmative, question, reprompt,
};

/// Reply for one processed message
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// The updated record, when the session was reachable
    pub record: Option<UserData>,
    /// Assistant reply text, always in the flow's natural language
    pub text: String,
    /// True only on the final reply carrying the generated plan
    pub done: bool,
}

/// The conversation engine behind the message-processing contract
pub struct Engine {
    state: StateManager,
    llm: Arc<dyn LlmClient>,
    planner: PlanGenerator,
    max_tokens: u32,
    temperature: f32,
    /// Single-flight guards, one per live session id
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Engine {
    pub fn new(state: StateManager, llm: Arc<dyn LlmClient>, llm_config: &LlmConfig) -> Self {
        let prompts = Arc::new(Prompts::new());
        let planner = PlanGenerator::new(
            llm.clone(),
            prompts,
            llm_config.max_tokens,
            llm_config.temperature,
        );

        Self {
            state,
            llm,
            planner,
            max_tokens: llm_config.max_tokens,
            temperature: llm_config.temperature,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Process one user message for a session.
    ///
    /// Fails closed: any internal error becomes a fixed apology with
    /// `record: None, done: false` instead of propagating.
    pub async fn process_message(&self, session_id: &str, message: &str) -> MessageResponse {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        match self.process_inner(session_id, message).await {
            Ok(response) => response,
            Err(err) => {
                error!(%session_id, error = %err, "process_message: internal error");
                MessageResponse {
                    record: None,
                    text: INTERNAL_ERROR_TEXT.to_string(),
                    done: false,
                }
            }
        }
    }

    /// Session metadata; None when the session is absent or expired
    pub async fn session_summary(&self, session_id: &str) -> Option<SessionSummary> {
        match self.state.get(session_id).await {
            Ok(session) => session.map(|s| s.summary()),
            Err(err) => {
                error!(%session_id, error = %err, "session_summary: state unavailable");
                None
            }
        }
    }

    /// Delete a session; true when an entry existed
    pub async fn delete_session(&self, session_id: &str) -> bool {
        let deleted = self.state.delete(session_id).await.unwrap_or(false);
        if deleted {
            self.locks.lock().await.remove(session_id);
        }
        deleted
    }

    /// Number of live sessions
    pub async fn session_count(&self) -> usize {
        self.state.count().await.unwrap_or(0)
    }

    async fn process_inner(&self, session_id: &str, message: &str) -> Result<MessageResponse> {
        // An absent or expired session is transparently re-created
        let session = match self.state.get(session_id).await? {
            Some(session) => session,
            None => self.state.create(session_id).await?,
        };

        self.state
            .add_message(session_id, ConversationMessage::user(message))
            .await?;

        let response = self.handle_step(&session, message).await?;

        self.state
            .add_message(session_id, ConversationMessage::assistant(response.text.clone()))
            .await?;

        Ok(response)
    }

    /// Dispatch to exactly one handler per step
    async fn handle_step(&self, session: &Session, message: &str) -> Result<MessageResponse> {
        debug!(id = %session.id, step = ?session.current_step, "handle_step: called");
        match session.current_step {
            Step::Permission => self.handle_permission(session, message).await,
            Step::Age => {
                self.collect_number(session, message, 1, 120, |value| UserProfile {
                    age: Some(value),
                    ..Default::default()
                })
                .await
            }
            Step::Sex => self.handle_sex(session, message).await,
            Step::Height => {
                self.collect_number(session, message, 50, 300, |value| UserProfile {
                    height_cm: Some(value),
                    ..Default::default()
                })
                .await
            }
            Step::Weight => {
                self.collect_number(session, message, 20, 500, |value| UserProfile {
                    weight_kg: Some(value),
                    ..Default::default()
                })
                .await
            }
            Step::ActivityLevel => self.handle_activity_level(session, message).await,
            Step::Goal => self.handle_goal(session, message).await,
            Step::MealsPerDay => {
                self.collect_number(session, message, 1, 10, |value| UserProfile {
                    meals_per_day: Some(value),
                    ..Default::default()
                })
                .await
            }
            Step::DietaryRestrictions => {
                self.collect_list(session, message, |items| UserProfile {
                    dietary_restrictions: Some(items),
                    ..Default::default()
                })
                .await
            }
            Step::Allergies => {
                self.collect_list(session, message, |items| UserProfile {
                    allergies: Some(items),
                    ..Default::default()
                })
                .await
            }
            Step::Preferences => {
                self.collect_list(session, message, |items| UserProfile {
                    preferences: Some(items),
                    ..Default::default()
                })
                .await
            }
            Step::MedicalConditions => self.handle_medical_conditions(session, message).await,
            Step::Complete => self.handle_general_question(session, message).await,
        }
    }

    async fn handle_permission(&self, session: &Session, message: &str) -> Result<MessageResponse> {
        if !is_affirmative(message) {
            return Ok(self.reprompt_response(session));
        }
        self.advance(session).await
    }

    async fn handle_sex(&self, session: &Session, message: &str) -> Result<MessageResponse> {
        match extract::extract_sex(message) {
            Some(sex) => {
                self.advance_with(session, UserProfile {
                    sex: Some(sex),
                    ..Default::default()
                })
                .await
            }
            None => Ok(self.reprompt_response(session)),
        }
    }

    async fn handle_activity_level(&self, session: &Session, message: &str) -> Result<MessageResponse> {
        match extract::extract_activity_level(message) {
            Some(level) => {
                self.advance_with(session, UserProfile {
                    activity_level: Some(level),
                    ..Default::default()
                })
                .await
            }
            None => Ok(self.reprompt_response(session)),
        }
    }

    /// Goal takes any non-empty free text verbatim
    async fn handle_goal(&self, session: &Session, message: &str) -> Result<MessageResponse> {
        let goal = message.trim();
        if goal.is_empty() {
            return Ok(self.reprompt_response(session));
        }
        self.advance_with(session, UserProfile {
            goal: Some(goal.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Shared handler for the numeric steps; out-of-range answers reprompt
    async fn collect_number(
        &self,
        session: &Session,
        message: &str,
        min: u32,
        max: u32,
        build: fn(u32) -> UserProfile,
    ) -> Result<MessageResponse> {
        match extract::extract_number(message) {
            Some(value) if (min..=max).contains(&value) => self.advance_with(session, build(value)).await,
            _ => Ok(self.reprompt_response(session)),
        }
    }

    /// Shared handler for the list steps; an empty list is a valid answer,
    /// so these always advance.
    async fn collect_list(
        &self,
        session: &Session,
        message: &str,
        build: fn(Vec<String>) -> UserProfile,
    ) -> Result<MessageResponse> {
        let items = extract::extract_list(message);
        self.advance_with(session, build(items)).await
    }

    /// Terminal collecting step: completes the record and generates the plan
    async fn handle_medical_conditions(&self, session: &Session, message: &str) -> Result<MessageResponse> {
        let conditions = extract::extract_list(message);

        let patch = UserDataPatch {
            completed: Some(true),
            collected_at: Some(Utc::now().to_rfc3339()),
            profile: UserProfile {
                medical_conditions: Some(conditions),
                timezone: Some(DEFAULT_TIMEZONE.to_string()),
                ..Default::default()
            },
        };

        let updated = self
            .state
            .update_user_data(&session.id, patch)
            .await?
            .ok_or_else(|| eyre!("session {} vanished during completion", session.id))?;
        self.state
            .advance_step(&session.id)
            .await?
            .ok_or_else(|| eyre!("session {} vanished during completion", session.id))?;

        let plan = self.planner.generate(&updated.user_data).await;
        let text = format!("{COMPLETION_PREFIX}\n\n{plan}\n\n{EXPORT_SENTINEL}");

        Ok(MessageResponse {
            record: Some(updated.user_data),
            text,
            done: true,
        })
    }

    /// Free-text handler once the flow is complete
    async fn handle_general_question(&self, session: &Session, message: &str) -> Result<MessageResponse> {
        if contains_medical_request(message) {
            return Ok(MessageResponse {
                record: Some(session.user_data.clone()),
                text: MEDICAL_DISCLAIMER.to_string(),
                done: false,
            });
        }

        let request = CompletionRequest {
            system_prompt: embedded::ASSISTANT_SYSTEM.to_string(),
            messages: vec![Message::user(message)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let text = match self.llm.complete(request).await {
            Ok(response) => match response.content {
                Some(content) if !content.trim().is_empty() => content,
                _ => GENERAL_FAILURE_TEXT.to_string(),
            },
            Err(err) => {
                warn!(id = %session.id, error = %err, "handle_general_question: reply failed");
                GENERAL_FAILURE_TEXT.to_string()
            }
        };

        Ok(MessageResponse {
            record: Some(session.user_data.clone()),
            text,
            done: false,
        })
    }

    /// Merge the extracted fields, advance, and ask the next question
    async fn advance_with(&self, session: &Session, profile: UserProfile) -> Result<MessageResponse> {
        self.state
            .update_user_data(&session.id, UserDataPatch {
                profile,
                ..Default::default()
            })
            .await?
            .ok_or_else(|| eyre!("session {} vanished during update", session.id))?;
        self.advance(session).await
    }

    async fn advance(&self, session: &Session) -> Result<MessageResponse> {
        let advanced = self
            .state
            .advance_step(&session.id)
            .await?
            .ok_or_else(|| eyre!("session {} vanished during advance", session.id))?;

        Ok(MessageResponse {
            record: Some(advanced.user_data),
            text: question(advanced.current_step).to_string(),
            done: false,
        })
    }

    /// Unmodified-state reply that re-asks the current step
    fn reprompt_response(&self, session: &Session) -> MessageResponse {
        MessageResponse {
            record: Some(session.user_data.clone()),
            text: reprompt(session.current_step).to_string(),
            done: false,
        }
    }

    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(session_id.to_string()).or_default().clone()
    }
}
