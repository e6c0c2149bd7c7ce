//! Session domain model
//!
//! Types shared by the store and the conversation engine: the session
//! container, the user data record assembled across the intake steps, and
//! the fixed step sequence itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a session (opaque, client-generated)
pub type SessionId = String;

/// One position in the fixed linear intake sequence.
///
/// Invariant: a session's step only moves forward and never exceeds
/// [`Step::Complete`]. Every collecting step has exactly one extractor and
/// one question text (see the flow module in the engine crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    Permission,
    Age,
    Sex,
    Height,
    Weight,
    ActivityLevel,
    Goal,
    MealsPerDay,
    DietaryRestrictions,
    Allergies,
    Preferences,
    MedicalConditions,
    Complete,
}

impl Step {
    /// The next step in the sequence, saturating at [`Step::Complete`]
    pub fn next(self) -> Step {
        match self {
            Step::Permission => Step::Age,
            Step::Age => Step::Sex,
            Step::Sex => Step::Height,
            Step::Height => Step::Weight,
            Step::Weight => Step::ActivityLevel,
            Step::ActivityLevel => Step::Goal,
            Step::Goal => Step::MealsPerDay,
            Step::MealsPerDay => Step::DietaryRestrictions,
            Step::DietaryRestrictions => Step::Allergies,
            Step::Allergies => Step::Preferences,
            Step::Preferences => Step::MedicalConditions,
            Step::MedicalConditions | Step::Complete => Step::Complete,
        }
    }

    /// Ordinal position in the sequence (Permission = 0, Complete = 12)
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Whether the intake flow has finished collecting
    pub fn is_complete(self) -> bool {
        self == Step::Complete
    }
}

/// Closed set of accepted sex/gender answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "masculino")]
    Masculino,
    #[serde(rename = "feminino")]
    Feminino,
    #[serde(rename = "outro")]
    Outro,
}

impl Sex {
    /// Canonical lowercase label, as collected from the user
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Masculino => "masculino",
            Sex::Feminino => "feminino",
            Sex::Outro => "outro",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of accepted activity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "sedentário")]
    Sedentario,
    #[serde(rename = "leve")]
    Leve,
    #[serde(rename = "moderado")]
    Moderado,
    #[serde(rename = "intenso")]
    Intenso,
}

impl ActivityLevel {
    /// Canonical lowercase label, as collected from the user
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentario => "sedentário",
            ActivityLevel::Leve => "leve",
            ActivityLevel::Moderado => "moderado",
            ActivityLevel::Intenso => "intenso",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nested profile assembled across the intake steps.
///
/// Every field is optional until its step has been reached. The list
/// fields are set to `Some(vec![])` (never left absent) once their step
/// runs, so a completed record always carries concrete lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meals_per_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl UserProfile {
    /// Field-by-field merge: fields present in `other` win, absent fields
    /// keep their current value.
    pub fn merge(&mut self, other: UserProfile) {
        if other.age.is_some() {
            self.age = other.age;
        }
        if other.sex.is_some() {
            self.sex = other.sex;
        }
        if other.height_cm.is_some() {
            self.height_cm = other.height_cm;
        }
        if other.weight_kg.is_some() {
            self.weight_kg = other.weight_kg;
        }
        if other.activity_level.is_some() {
            self.activity_level = other.activity_level;
        }
        if other.goal.is_some() {
            self.goal = other.goal;
        }
        if other.meals_per_day.is_some() {
            self.meals_per_day = other.meals_per_day;
        }
        if other.dietary_restrictions.is_some() {
            self.dietary_restrictions = other.dietary_restrictions;
        }
        if other.allergies.is_some() {
            self.allergies = other.allergies;
        }
        if other.preferences.is_some() {
            self.preferences = other.preferences;
        }
        if other.medical_conditions.is_some() {
            self.medical_conditions = other.medical_conditions;
        }
        if other.timezone.is_some() {
            self.timezone = other.timezone;
        }
    }
}

/// The accumulated user data record for one session.
///
/// Invariant: once `completed` is true, every field the flow collects is
/// populated and `collected_at` carries the completion timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<String>,
    #[serde(rename = "user")]
    pub profile: UserProfile,
}

impl UserData {
    /// Apply a partial update: shallow-merge the top-level fields and
    /// deep-merge the nested profile.
    pub fn apply(&mut self, patch: UserDataPatch) {
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if patch.collected_at.is_some() {
            self.collected_at = patch.collected_at;
        }
        self.profile.merge(patch.profile);
    }
}

/// A partial update to a [`UserData`] record
#[derive(Debug, Clone, Default)]
pub struct UserDataPatch {
    pub completed: Option<bool>,
    pub collected_at: Option<String>,
    pub profile: UserProfile,
}

/// Role of a conversation message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One exchanged message, append-only in arrival order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    /// Create a user message stamped now
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant message stamped now
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One user's conversational state, keyed by an opaque id.
///
/// Owned exclusively by the [`SessionStore`](crate::SessionStore); mutated
/// only through its operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub current_step: Step,
    pub user_data: UserData,
    pub history: Vec<ConversationMessage>,
}

impl Session {
    /// Metadata view of this session for the boundary contract
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            created_at: self.created_at,
            last_activity: self.last_activity,
            current_step: self.current_step,
            completed: self.user_data.completed,
            message_count: self.history.len(),
        }
    }
}

/// Session metadata exposed to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub current_step: Step,
    pub completed: bool,
    pub message_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_next_is_linear() {
        let mut step = Step::Permission;
        let expected = [
            Step::Age,
            Step::Sex,
            Step::Height,
            Step::Weight,
            Step::ActivityLevel,
            Step::Goal,
            Step::MealsPerDay,
            Step::DietaryRestrictions,
            Step::Allergies,
            Step::Preferences,
            Step::MedicalConditions,
            Step::Complete,
        ];
        for next in expected {
            step = step.next();
            assert_eq!(step, next);
        }
    }

    #[test]
    fn test_step_next_saturates_at_complete() {
        assert_eq!(Step::Complete.next(), Step::Complete);
        assert_eq!(Step::MedicalConditions.next(), Step::Complete);
    }

    #[test]
    fn test_step_ordinal() {
        assert_eq!(Step::Permission.ordinal(), 0);
        assert_eq!(Step::Age.ordinal(), 1);
        assert_eq!(Step::Complete.ordinal(), 12);
    }

    #[test]
    fn test_profile_merge_retains_unspecified_fields() {
        let mut profile = UserProfile {
            age: Some(30),
            sex: Some(Sex::Feminino),
            ..Default::default()
        };

        profile.merge(UserProfile {
            height_cm: Some(165),
            ..Default::default()
        });

        assert_eq!(profile.age, Some(30));
        assert_eq!(profile.sex, Some(Sex::Feminino));
        assert_eq!(profile.height_cm, Some(165));
    }

    #[test]
    fn test_profile_merge_new_fields_win() {
        let mut profile = UserProfile {
            age: Some(30),
            ..Default::default()
        };

        profile.merge(UserProfile {
            age: Some(31),
            ..Default::default()
        });

        assert_eq!(profile.age, Some(31));
    }

    #[test]
    fn test_user_data_apply_shallow_and_deep() {
        let mut data = UserData {
            completed: false,
            collected_at: None,
            profile: UserProfile {
                age: Some(25),
                ..Default::default()
            },
        };

        data.apply(UserDataPatch {
            completed: Some(true),
            collected_at: Some("2025-01-01T00:00:00Z".to_string()),
            profile: UserProfile {
                medical_conditions: Some(vec![]),
                ..Default::default()
            },
        });

        assert!(data.completed);
        assert_eq!(data.collected_at.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(data.profile.age, Some(25));
        assert_eq!(data.profile.medical_conditions, Some(vec![]));
    }

    #[test]
    fn test_user_data_serializes_profile_as_user() {
        let data = UserData {
            completed: false,
            collected_at: None,
            profile: UserProfile {
                age: Some(40),
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["user"]["age"], 40);
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn test_enum_labels() {
        assert_eq!(Sex::Masculino.to_string(), "masculino");
        assert_eq!(ActivityLevel::Sedentario.to_string(), "sedentário");
        assert_eq!(serde_json::to_value(ActivityLevel::Intenso).unwrap(), "intenso");
    }
}
