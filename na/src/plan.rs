//! Diet plan generation
//!
//! Derived metabolic estimates from the collected record plus one external
//! text-generation call. A deterministic templated plan keeps the flow
//! alive whenever the generator is unavailable.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

use sessionstore::{ActivityLevel, Sex, UserData, UserProfile};

use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts::{self, Prompts, embedded};

/// Basal metabolic estimate (Mifflin-St Jeor).
///
/// Invariant kept from the collected flow: any zero component yields 0,
/// and the non-masculine offset applies to both "feminino" and "outro".
pub fn basal_metabolic_rate(weight_kg: u32, height_cm: u32, age: u32, sex: Option<Sex>) -> f64 {
    if weight_kg == 0 || height_cm == 0 || age == 0 {
        return 0.0;
    }

    let offset = if sex == Some(Sex::Masculino) { 5.0 } else { -161.0 };
    10.0 * f64::from(weight_kg) + 6.25 * f64::from(height_cm) - 5.0 * f64::from(age) + offset
}

/// Estimated daily energy expenditure; absent activity defaults to the
/// sedentary multiplier.
pub fn daily_calories(bmr: f64, activity: Option<ActivityLevel>) -> f64 {
    bmr * activity.map_or(1.2, activity_multiplier)
}

fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentario => 1.2,
        ActivityLevel::Leve => 1.375,
        ActivityLevel::Moderado => 1.55,
        ActivityLevel::Intenso => 1.725,
    }
}

/// Context for the plan-generation system prompt; absent fields render as
/// explicit "not informed" placeholders.
#[derive(Debug, Serialize)]
struct PlanContext {
    age: String,
    sex: String,
    height: String,
    weight: String,
    activity: String,
    goal: String,
    meals: String,
    restrictions: String,
    allergies: String,
    preferences: String,
    conditions: String,
    bmr: String,
    daily_calories: String,
}

impl PlanContext {
    fn from_user_data(data: &UserData) -> Self {
        let profile = &data.profile;
        let bmr = basal_metabolic_rate(
            profile.weight_kg.unwrap_or(0),
            profile.height_cm.unwrap_or(0),
            profile.age.unwrap_or(0),
            profile.sex,
        );
        let daily = daily_calories(bmr, profile.activity_level);

        Self {
            age: opt_number(profile.age, "não informada"),
            sex: profile.sex.map_or_else(|| "não informado".to_string(), |s| s.to_string()),
            height: opt_number(profile.height_cm, "não informada"),
            weight: opt_number(profile.weight_kg, "não informado"),
            activity: profile
                .activity_level
                .map_or_else(|| "não informado".to_string(), |a| a.to_string()),
            goal: opt_text(profile.goal.as_deref(), "não informado"),
            meals: opt_number(profile.meals_per_day, "não informado"),
            restrictions: join_list(&profile.dietary_restrictions),
            allergies: join_list(&profile.allergies),
            preferences: join_list(&profile.preferences),
            conditions: join_list(&profile.medical_conditions),
            bmr: format!("{bmr:.0}"),
            daily_calories: format!("{daily:.0}"),
        }
    }
}

/// Context for the deterministic fallback plan
#[derive(Debug, Serialize)]
struct FallbackContext {
    goal: String,
    meals: String,
    activity: String,
}

impl FallbackContext {
    fn from_profile(profile: &UserProfile) -> Self {
        Self {
            goal: opt_text(profile.goal.as_deref(), "Melhoria da saúde geral"),
            meals: opt_number(profile.meals_per_day, "4"),
            activity: profile
                .activity_level
                .map_or_else(|| "Moderado".to_string(), |a| a.to_string()),
        }
    }
}

fn opt_number(value: Option<u32>, absent: &str) -> String {
    value.map_or_else(|| absent.to_string(), |v| v.to_string())
}

fn opt_text(value: Option<&str>, absent: &str) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => absent.to_string(),
    }
}

fn join_list(list: &Option<Vec<String>>) -> String {
    match list {
        Some(items) if !items.is_empty() => items.join(", "),
        _ => "nenhuma".to_string(),
    }
}

/// Produces the final plan text for a completed record.
///
/// One generator call on the normal path; any failure (error, timeout,
/// empty content) switches to the templated fallback so the flow never
/// dead-ends.
pub struct PlanGenerator {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<Prompts>,
    max_tokens: u32,
    temperature: f32,
}

impl PlanGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<Prompts>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            llm,
            prompts,
            max_tokens,
            temperature,
        }
    }

    /// Generate the plan text for a collected record
    pub async fn generate(&self, data: &UserData) -> String {
        let context = PlanContext::from_user_data(data);
        debug!(bmr = %context.bmr, daily_calories = %context.daily_calories, "generate: called");

        let system_prompt = match self.prompts.render(prompts::PLAN_SYSTEM, &context) {
            Ok(rendered) => rendered,
            Err(err) => {
                error!(error = %err, "generate: plan prompt render failed");
                return self.fallback(data);
            }
        };

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(embedded::PLAN_DIRECTIVE)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        match self.llm.complete(request).await {
            Ok(response) => match response.content {
                Some(text) if !text.trim().is_empty() => text,
                _ => {
                    warn!("generate: empty generator content, using fallback");
                    self.fallback(data)
                }
            },
            Err(err) => {
                warn!(error = %err, "generate: generator call failed, using fallback");
                self.fallback(data)
            }
        }
    }

    fn fallback(&self, data: &UserData) -> String {
        let context = FallbackContext::from_profile(&data.profile);
        self.prompts.render(prompts::FALLBACK_PLAN, &context).unwrap_or_else(|err| {
            error!(error = %err, "fallback: template render failed");
            embedded::FALLBACK_PLAN.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockLlmClient;
    use sessionstore::UserProfile;

    fn completed_data() -> UserData {
        UserData {
            completed: true,
            collected_at: Some("2025-06-01T12:00:00Z".to_string()),
            profile: UserProfile {
                age: Some(30),
                sex: Some(Sex::Masculino),
                height_cm: Some(175),
                weight_kg: Some(70),
                activity_level: Some(ActivityLevel::Moderado),
                goal: Some("emagrecimento".to_string()),
                meals_per_day: Some(5),
                dietary_restrictions: Some(vec!["vegetariano".to_string()]),
                allergies: Some(vec![]),
                preferences: Some(vec![]),
                medical_conditions: Some(vec![]),
                timezone: Some(sessionstore::DEFAULT_TIMEZONE.to_string()),
            },
        }
    }

    #[test]
    fn test_bmr_masculino() {
        let bmr = basal_metabolic_rate(70, 175, 30, Some(Sex::Masculino));
        assert_eq!(bmr.round(), 1649.0);
    }

    #[test]
    fn test_bmr_feminino() {
        let bmr = basal_metabolic_rate(70, 175, 30, Some(Sex::Feminino));
        assert_eq!(bmr.round(), 1483.0);
    }

    #[test]
    fn test_bmr_outro_uses_non_masculine_offset() {
        // Inherited behavior: "outro" gets the same coefficient as "feminino"
        assert_eq!(
            basal_metabolic_rate(70, 175, 30, Some(Sex::Outro)),
            basal_metabolic_rate(70, 175, 30, Some(Sex::Feminino)),
        );
    }

    #[test]
    fn test_bmr_zero_when_any_component_missing() {
        assert_eq!(basal_metabolic_rate(0, 175, 30, Some(Sex::Masculino)), 0.0);
        assert_eq!(basal_metabolic_rate(70, 0, 30, Some(Sex::Masculino)), 0.0);
        assert_eq!(basal_metabolic_rate(70, 175, 0, Some(Sex::Masculino)), 0.0);
    }

    #[test]
    fn test_daily_calories_moderado() {
        let bmr = basal_metabolic_rate(70, 175, 30, Some(Sex::Masculino));
        assert_eq!(daily_calories(bmr, Some(ActivityLevel::Moderado)).round(), 2556.0);
    }

    #[test]
    fn test_daily_calories_defaults_to_sedentary_multiplier() {
        assert_eq!(daily_calories(1000.0, None), 1200.0);
        assert_eq!(daily_calories(1000.0, Some(ActivityLevel::Sedentario)), 1200.0);
    }

    #[test]
    fn test_plan_context_placeholders_for_empty_profile() {
        let context = PlanContext::from_user_data(&UserData::default());
        assert_eq!(context.age, "não informada");
        assert_eq!(context.sex, "não informado");
        assert_eq!(context.restrictions, "nenhuma");
        assert_eq!(context.bmr, "0");
        assert_eq!(context.daily_calories, "0");
    }

    #[test]
    fn test_plan_context_computes_estimates() {
        let context = PlanContext::from_user_data(&completed_data());
        assert_eq!(context.bmr, "1649");
        assert_eq!(context.daily_calories, "2556");
        assert_eq!(context.restrictions, "vegetariano");
        assert_eq!(context.allergies, "nenhuma");
    }

    #[tokio::test]
    async fn test_generate_uses_llm_content() {
        let llm = Arc::new(MockLlmClient::with_texts(&["plano gerado pelo modelo"]));
        let generator = PlanGenerator::new(llm.clone(), Arc::new(Prompts::new()), 2048, 0.7);

        let plan = generator.generate(&completed_data()).await;
        assert_eq!(plan, "plano gerado pelo modelo");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_error() {
        // Exhausted mock fails every call
        let llm = Arc::new(MockLlmClient::new(vec![]));
        let generator = PlanGenerator::new(llm, Arc::new(Prompts::new()), 2048, 0.7);

        let plan = generator.generate(&completed_data()).await;
        assert!(plan.contains("RESUMO NUTRICIONAL"));
        assert!(plan.contains("PLANO ALIMENTAR DIÁRIO"));
        assert!(plan.contains("SUGESTÕES DE CARDÁPIO SEMANAL"));
        assert!(plan.contains("DICAS IMPORTANTES"));
        assert!(plan.contains("RECOMENDAÇÕES GERAIS"));
        assert!(plan.contains("**Objetivo**: emagrecimento"));
    }

    #[tokio::test]
    async fn test_fallback_defaults_for_missing_fields() {
        let llm = Arc::new(MockLlmClient::new(vec![]));
        let generator = PlanGenerator::new(llm, Arc::new(Prompts::new()), 2048, 0.7);

        let plan = generator.generate(&UserData::default()).await;
        assert!(plan.contains("**Objetivo**: Melhoria da saúde geral"));
        assert!(plan.contains("**Refeições diárias**: 4 refeições"));
        assert!(plan.contains("**Nível de atividade**: Moderado"));
    }
}
