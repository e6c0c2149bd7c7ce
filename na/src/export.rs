//! Document export boundary
//!
//! The renderer contract consumed by presentation layers, plus the plain
//! text implementation shipped with the CLI. Styling and real PDF emission
//! stay outside the core; the contract only promises bytes for a completed
//! record.

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use sessionstore::{UserData, UserProfile};

use crate::prompts::{self, Prompts};

/// Errors from document rendering
#[derive(Debug, Error)]
pub enum ExportError {
    /// The record has not finished the intake flow
    #[error("Incomplete data: the record must be completed before rendering")]
    IncompleteData,

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),
}

/// Renders a completed record + plan text into a document byte stream
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Precondition: `data.completed` is true
    async fn render(&self, data: &UserData, plan: &str) -> Result<Vec<u8>, ExportError>;
}

/// Plain-text renderer backed by the embedded document template
pub struct TextDocumentRenderer {
    prompts: Arc<Prompts>,
}

impl TextDocumentRenderer {
    pub fn new() -> Self {
        Self {
            prompts: Arc::new(Prompts::new()),
        }
    }
}

impl Default for TextDocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentRenderer for TextDocumentRenderer {
    async fn render(&self, data: &UserData, plan: &str) -> Result<Vec<u8>, ExportError> {
        if !data.completed {
            return Err(ExportError::IncompleteData);
        }

        let context = DocumentContext::from_parts(&data.profile, plan);
        let rendered = self.prompts.render(prompts::DOCUMENT, &context)?;
        Ok(rendered.into_bytes())
    }
}

/// Context for the document template; absent fields are omitted entirely
#[derive(Debug, Serialize)]
struct DocumentContext {
    date: String,
    age: Option<String>,
    sex: Option<String>,
    height: Option<String>,
    weight: Option<String>,
    activity: Option<String>,
    goal: Option<String>,
    meals: Option<String>,
    has_restrictions: bool,
    restrictions: Option<String>,
    allergies: Option<String>,
    preferences: Option<String>,
    conditions: Option<String>,
    plan: String,
}

impl DocumentContext {
    fn from_parts(profile: &UserProfile, plan: &str) -> Self {
        let restrictions = join_nonempty(&profile.dietary_restrictions);
        let allergies = join_nonempty(&profile.allergies);
        let preferences = join_nonempty(&profile.preferences);
        let conditions = join_nonempty(&profile.medical_conditions);
        let has_restrictions =
            restrictions.is_some() || allergies.is_some() || preferences.is_some() || conditions.is_some();

        Self {
            date: Local::now().format("%d/%m/%Y").to_string(),
            age: profile.age.map(|v| v.to_string()),
            sex: profile.sex.map(|v| v.to_string()),
            height: profile.height_cm.map(|v| v.to_string()),
            weight: profile.weight_kg.map(|v| v.to_string()),
            activity: profile.activity_level.map(|v| v.to_string()),
            goal: profile.goal.clone().filter(|g| !g.is_empty()),
            meals: profile.meals_per_day.map(|v| v.to_string()),
            has_restrictions,
            restrictions,
            allergies,
            preferences,
            conditions,
            plan: plan.to_string(),
        }
    }
}

fn join_nonempty(list: &Option<Vec<String>>) -> Option<String> {
    list.as_ref().filter(|items| !items.is_empty()).map(|items| items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessionstore::{ActivityLevel, Sex};

    fn completed_data() -> UserData {
        UserData {
            completed: true,
            collected_at: Some("2025-06-01T12:00:00Z".to_string()),
            profile: UserProfile {
                age: Some(30),
                sex: Some(Sex::Feminino),
                height_cm: Some(165),
                weight_kg: Some(60),
                activity_level: Some(ActivityLevel::Leve),
                goal: Some("manutenção do peso".to_string()),
                meals_per_day: Some(4),
                dietary_restrictions: Some(vec!["vegetariana".to_string()]),
                allergies: Some(vec![]),
                preferences: Some(vec![]),
                medical_conditions: Some(vec![]),
                timezone: Some(sessionstore::DEFAULT_TIMEZONE.to_string()),
            },
        }
    }

    #[tokio::test]
    async fn test_render_requires_completed_record() {
        let renderer = TextDocumentRenderer::new();
        let result = renderer.render(&UserData::default(), "plano").await;
        assert!(matches!(result, Err(ExportError::IncompleteData)));
    }

    #[tokio::test]
    async fn test_render_includes_profile_and_plan() {
        let renderer = TextDocumentRenderer::new();
        let bytes = renderer.render(&completed_data(), "Texto do plano.").await.unwrap();
        let document = String::from_utf8(bytes).unwrap();

        assert!(document.contains("PLANO ALIMENTAR PERSONALIZADO"));
        assert!(document.contains("Idade: 30 anos"));
        assert!(document.contains("Sexo: feminino"));
        assert!(document.contains("Restrições alimentares: vegetariana"));
        assert!(document.contains("Texto do plano."));
        // Empty lists leave no trace
        assert!(!document.contains("Alergias:"));
    }

    #[tokio::test]
    async fn test_render_omits_restrictions_block_when_all_lists_empty() {
        let mut data = completed_data();
        data.profile.dietary_restrictions = Some(vec![]);

        let renderer = TextDocumentRenderer::new();
        let bytes = renderer.render(&data, "plano").await.unwrap();
        let document = String::from_utf8(bytes).unwrap();

        assert!(!document.contains("RESTRIÇÕES E PREFERÊNCIAS"));
    }
}
