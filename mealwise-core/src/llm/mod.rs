//! Content-generation provider abstraction.
//!
//! Providers turn a [`GenerationRequest`] into raw model text. They know
//! nothing about retries, queuing or the shape of the JSON they return.

mod fake;
mod gemini;

pub use fake::{FakeCall, FakeProvider};
pub use gemini::GeminiProvider;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::ai::config::AiConfig;

/// Error type for provider calls.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider returned no content")]
    EmptyResponse,

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl LlmError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }
}

/// The kind of content a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    WeeklySkeleton,
    Recipe,
    RecipeBatch,
    ShoppingList,
    RescueRecipe,
    QuickIdeas,
    SwapSuggestions,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::WeeklySkeleton => "weekly_skeleton",
            Task::Recipe => "recipe",
            Task::RecipeBatch => "recipe_batch",
            Task::ShoppingList => "shopping_list",
            Task::RescueRecipe => "rescue_recipe",
            Task::QuickIdeas => "quick_ideas",
            Task::SwapSuggestions => "swap_suggestions",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured-output request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub task: Task,
    pub system: String,
    pub user: String,
    /// Response schema in the provider's JSON dialect.
    pub schema: serde_json::Value,
    pub temperature: f32,
}

/// Trait for content-generation providers.
///
/// Implementations must be thread-safe. One call to `generate` is one
/// request to the remote service.
#[async_trait]
pub trait GenerationService: Send + Sync + fmt::Debug {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;

    /// Get the provider name (e.g., "gemini", "fake").
    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

/// Build the provider selected by `config.provider`.
pub fn create_provider(config: &AiConfig) -> Result<Arc<dyn GenerationService>, LlmError> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config)?)),
        "fake" => Ok(Arc::new(FakeProvider::with_demo_responses())),
        other => Err(LlmError::NotConfigured(format!(
            "Unknown provider: {}",
            other
        ))),
    }
}

/// Build a provider from environment variables.
///
/// See [`AiConfig::from_env`] for the variables read.
pub fn create_provider_from_env() -> Result<Arc<dyn GenerationService>, LlmError> {
    let config = AiConfig::from_env().map_err(|e| LlmError::NotConfigured(e.to_string()))?;
    create_provider(&config)
}
