//! Instruction template wrapped around a question before generation.

use faqgate_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Template used when the configuration does not provide one.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are a helpful assistant for a product admin system. Provide a clear, actionable answer:\n\n{{question}}";

const TEMPLATE_NAME: &str = "answer";

/// A compiled Handlebars template with a `question` variable.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    registry: Handlebars<'static>,
}

impl PromptTemplate {
    /// Compile a template; syntax errors are reported here, not at render time.
    pub fn new(template: &str) -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Plain text prompt, no HTML escaping
        registry.register_escape_fn(handlebars::no_escape);

        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

        Ok(Self { registry })
    }

    /// Render the template for a question.
    pub fn render(&self, question: &str) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("question", question);

        self.registry
            .render(TEMPLATE_NAME, &variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template() {
        let template = PromptTemplate::new(DEFAULT_PROMPT_TEMPLATE).unwrap();
        let prompt = template.render("How do I export data?").unwrap();

        assert_eq!(
            prompt,
            "You are a helpful assistant for a product admin system. Provide a clear, actionable answer:\n\nHow do I export data?"
        );
    }

    #[test]
    fn test_question_is_not_escaped_or_expanded() {
        let template = PromptTemplate::new("Q: {{question}}").unwrap();
        let prompt = template.render("Why does <b>&</b> show {{literally}}?").unwrap();

        assert_eq!(prompt, "Q: Why does <b>&</b> show {{literally}}?");
    }

    #[test]
    fn test_invalid_template_rejected() {
        let result = PromptTemplate::new("{{#if question}}unterminated");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
