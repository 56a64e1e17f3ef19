use std::sync::Arc;

use super::prompts::PromptSpec;
use crate::llm::{GenerationService, LlmError};

/// Sends one rendered prompt to the configured provider.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    service: Arc<dyn GenerationService>,
}

impl GenerationClient {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Exactly one provider call. Blank text is reported as
    /// [`LlmError::EmptyResponse`]; other failures pass through unchanged.
    pub async fn generate(&self, prompt: &PromptSpec) -> Result<String, LlmError> {
        tracing::debug!(
            task = %prompt.task,
            provider = self.service.provider_name(),
            model = self.service.model_name(),
            "Sending generation request"
        );

        let text = self.service.generate(&prompt.to_request()).await?;
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }

    pub fn service(&self) -> &Arc<dyn GenerationService> {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompts::render_quick_ideas_prompt;
    use crate::i18n::BuiltinTranslator;
    use crate::llm::{FakeProvider, Task};
    use crate::types::Language;

    #[tokio::test]
    async fn test_blank_text_is_empty_response() {
        let fake = Arc::new(FakeProvider::new().with_default_response(Task::QuickIdeas, "  \n"));
        let client = GenerationClient::new(fake.clone());
        let prompt = render_quick_ideas_prompt(&BuiltinTranslator::new(Language::En), "lunch");

        let err = client.generate(&prompt).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn test_passes_request_through() {
        let fake = Arc::new(FakeProvider::new().with_default_response(Task::QuickIdeas, "[]"));
        let client = GenerationClient::new(fake.clone());
        let prompt = render_quick_ideas_prompt(&BuiltinTranslator::new(Language::En), "lunch");

        assert_eq!(client.generate(&prompt).await.unwrap(), "[]");
        let calls = fake.calls();
        assert_eq!(calls[0].temperature, 0.9);
        assert!(calls[0].user.contains("lunch"));
    }
}
