//! Prompt and document templates
//!
//! Handlebars templates compiled into the binary, registered once and
//! rendered with typed serializable contexts.

pub mod embedded;

use handlebars::Handlebars;
use serde::Serialize;

/// Template name for the plan-generation system prompt
pub const PLAN_SYSTEM: &str = "plan-system";

/// Template name for the deterministic fallback plan
pub const FALLBACK_PLAN: &str = "fallback-plan";

/// Template name for the exported document body
pub const DOCUMENT: &str = "document";

/// Registry of the embedded templates
pub struct Prompts {
    registry: Handlebars<'static>,
}

impl Prompts {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        // Rendered text is prompts and plain documents, not HTML
        registry.register_escape_fn(handlebars::no_escape);

        registry
            .register_template_string(PLAN_SYSTEM, embedded::PLAN_SYSTEM)
            .expect("embedded plan-system template");
        registry
            .register_template_string(FALLBACK_PLAN, embedded::FALLBACK_PLAN)
            .expect("embedded fallback-plan template");
        registry
            .register_template_string(DOCUMENT, embedded::DOCUMENT)
            .expect("embedded document template");

        Self { registry }
    }

    /// Render a registered template with the given context
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, handlebars::RenderError> {
        self.registry.render(name, context)
    }
}

impl Default for Prompts {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct FallbackCtx {
        goal: String,
        meals: String,
        activity: String,
    }

    #[test]
    fn test_render_fallback_plan() {
        let prompts = Prompts::new();
        let rendered = prompts
            .render(
                FALLBACK_PLAN,
                &FallbackCtx {
                    goal: "emagrecimento".to_string(),
                    meals: "5".to_string(),
                    activity: "leve".to_string(),
                },
            )
            .unwrap();

        assert!(rendered.contains("**Objetivo**: emagrecimento"));
        assert!(rendered.contains("**Refeições diárias**: 5 refeições"));
        assert!(rendered.contains("**Nível de atividade**: leve"));
    }

    #[test]
    fn test_render_does_not_escape_text() {
        let prompts = Prompts::new();
        let rendered = prompts
            .render(
                FALLBACK_PLAN,
                &FallbackCtx {
                    goal: "ganho de massa & definição".to_string(),
                    meals: "4".to_string(),
                    activity: "moderado".to_string(),
                },
            )
            .unwrap();

        assert!(rendered.contains("ganho de massa & definição"));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let prompts = Prompts::new();
        assert!(prompts.render("missing", &()).is_err());
    }
}
