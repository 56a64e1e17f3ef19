//! Per-task generation entry points.
//!
//! Every call is rendered, queued on the shared [`RequestSequencer`], retried
//! on rate limits while it holds the lane, and finally parsed into typed
//! values.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

use super::client::GenerationClient;
use super::prompts::{
    render_quick_ideas_prompt, render_recipe_batch_prompt, render_recipe_prompt,
    render_rescue_prompt, render_shopping_list_prompt, render_swap_suggestions_prompt,
    render_weekly_plan_prompt, PromptSpec, WeeklyPlanRequest,
};
use super::retry::RetryController;
use super::sequencer::RequestSequencer;
use crate::error::PlannerError;
use crate::i18n::Translator;
use crate::llm::GenerationService;
use crate::types::{
    normalize_meal_name, DifficultyLevel, Ingredient, MealSlot, QuickIdea, Recipe, ShoppingListItem, Theme,
    UserProfile, WeeklyPlan,
};

/// Maximum number of swap suggestions handed back to callers.
pub const MAX_SWAP_SUGGESTIONS: usize = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    meal_name: String,
    recipe: Recipe,
}

#[derive(Debug, Deserialize)]
struct SuggestionsResponse {
    suggestions: Vec<String>,
}

#[derive(Clone)]
pub struct GenerationGateway {
    client: GenerationClient,
    retry: RetryController,
    sequencer: Arc<RequestSequencer>,
    translator: Arc<dyn Translator>,
}

impl std::fmt::Debug for GenerationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationGateway")
            .field("client", &self.client)
            .field("retry", &self.retry)
            .field("language", &self.translator.language())
            .finish()
    }
}

impl GenerationGateway {
    pub fn new(
        service: Arc<dyn GenerationService>,
        sequencer: Arc<RequestSequencer>,
        retry: RetryController,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            client: GenerationClient::new(service),
            retry,
            sequencer,
            translator,
        }
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    pub fn sequencer(&self) -> &Arc<RequestSequencer> {
        &self.sequencer
    }

    /// Queue one prompt and wait for its raw text.
    async fn call(&self, prompt: PromptSpec) -> Result<String, PlannerError> {
        let client = self.client.clone();
        let retry = self.retry.clone();
        let context = prompt.context.clone();
        self.sequencer
            .enqueue(&context, async move {
                retry
                    .run(&prompt.context, || client.generate(&prompt))
                    .await
            })
            .await
    }

    async fn call_json<T: DeserializeOwned>(&self, prompt: PromptSpec) -> Result<T, PlannerError> {
        let context = prompt.context.clone();
        let task = prompt.task;
        let text = self.call(prompt).await?;
        serde_json::from_str(strip_code_fence(&text)).map_err(|e| {
            tracing::warn!(task = %task, error = %e, "Unparseable generation response");
            PlannerError::malformed(context, e)
        })
    }

    /// Dish names for the whole week. Recipes are not requested.
    pub async fn weekly_skeleton(
        &self,
        request: &WeeklyPlanRequest<'_>,
    ) -> Result<WeeklyPlan, PlannerError> {
        let prompt = render_weekly_plan_prompt(self.translator(), request);
        self.call_json(prompt).await
    }

    pub async fn recipe(
        &self,
        meal_name: &str,
        profile: &UserProfile,
        level: DifficultyLevel,
    ) -> Result<Recipe, PlannerError> {
        let prompt = render_recipe_prompt(self.translator(), meal_name, profile, level);
        let recipe: Recipe = self.call_json(prompt).await?;
        Ok(recipe.with_fresh_id())
    }

    /// Recipes for several names in a single call, keyed by the name the
    /// model echoed back.
    pub async fn recipe_batch(
        &self,
        meal_names: &[String],
        profile: &UserProfile,
        level: DifficultyLevel,
    ) -> Result<Vec<(String, Recipe)>, PlannerError> {
        let prompt = render_recipe_batch_prompt(self.translator(), meal_names, profile, level);
        let entries: Vec<BatchEntry> = self.call_json(prompt).await?;
        Ok(entries
            .into_iter()
            .map(|entry| (entry.meal_name, entry.recipe.with_fresh_id()))
            .collect())
    }

    pub async fn shopping_list(
        &self,
        ingredients: &[Ingredient],
    ) -> Result<Vec<ShoppingListItem>, PlannerError> {
        let prompt = render_shopping_list_prompt(self.translator(), ingredients);
        self.call_json(prompt).await
    }

    pub async fn rescue_recipe(&self, ingredients: &str) -> Result<Recipe, PlannerError> {
        let prompt = render_rescue_prompt(self.translator(), ingredients);
        let recipe: Recipe = self.call_json(prompt).await?;
        Ok(recipe.with_fresh_id())
    }

    pub async fn quick_ideas(&self, meal_type: &str) -> Result<Vec<QuickIdea>, PlannerError> {
        let prompt = render_quick_ideas_prompt(self.translator(), meal_type);
        self.call_json(prompt).await
    }

    /// Up to [`MAX_SWAP_SUGGESTIONS`] distinct alternative names. Names
    /// matching `original` or anything in `existing` are dropped.
    pub async fn swap_suggestions(
        &self,
        original: &str,
        slot: MealSlot,
        existing: &[String],
        profile: &UserProfile,
        level: DifficultyLevel,
        theme: Theme,
    ) -> Result<Vec<String>, PlannerError> {
        let prompt = render_swap_suggestions_prompt(
            self.translator(),
            original,
            slot,
            existing,
            profile,
            level,
            theme,
        );
        let context = prompt.context.clone();
        let response: SuggestionsResponse = self.call_json(prompt).await?;

        let mut taken: HashSet<String> = existing
            .iter()
            .map(|name| normalize_meal_name(name))
            .collect();
        taken.insert(normalize_meal_name(original));

        let suggestions: Vec<String> = response
            .suggestions
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .filter(|name| taken.insert(normalize_meal_name(name)))
            .take(MAX_SWAP_SUGGESTIONS)
            .collect();

        if suggestions.is_empty() {
            return Err(PlannerError::malformed(context, "no suggestions returned"));
        }
        Ok(suggestions)
    }
}

/// Drop a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::retry::RetryPolicy;
    use crate::i18n::BuiltinTranslator;
    use crate::llm::{FakeProvider, Task};
    use crate::types::{DinerCounts, Language};
    use std::time::Duration;

    fn gateway(fake: Arc<FakeProvider>) -> GenerationGateway {
        GenerationGateway::new(
            fake,
            Arc::new(RequestSequencer::new(Duration::from_millis(500))),
            RetryController::new(RetryPolicy::default()),
            Arc::new(BuiltinTranslator::new(Language::En)),
        )
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: "p1".to_string(),
            name: "Home".to_string(),
            diners: DinerCounts::default(),
            forbidden_foods: vec![],
            prioritize_favorites: false,
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence(" [1] "), "[1]");
    }

    #[tokio::test(start_paused = true)]
    async fn test_recipe_gets_local_id() {
        let fake = Arc::new(FakeProvider::with_demo_responses());
        let recipe = gateway(fake)
            .recipe("Paella", &profile(), DifficultyLevel::Medium)
            .await
            .unwrap();
        assert_eq!(recipe.name, "Paella");
        assert!(recipe.id.starts_with("recipe_"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparseable_is_malformed() {
        let fake = Arc::new(FakeProvider::new().with_default_response(Task::QuickIdeas, "not json"));
        let err = gateway(fake).quick_ideas("lunch").await.unwrap_err();
        match err {
            PlannerError::MalformedResponse { context, .. } => {
                assert_eq!(context, "generating ideas for lunch");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestions_truncated_to_three() {
        let fake = Arc::new(FakeProvider::new().with_default_response(
            Task::SwapSuggestions,
            r#"{"suggestions": ["A", " ", "B", "C", "D"]}"#,
        ));
        let suggestions = gateway(fake)
            .swap_suggestions(
                "Soup",
                MealSlot::Lunch,
                &[],
                &profile(),
                DifficultyLevel::Easy,
                Theme::None,
            )
            .await
            .unwrap();
        assert_eq!(suggestions, vec!["A", "B", "C"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestions_skip_dishes_already_planned() {
        let fake = Arc::new(FakeProvider::new().with_default_response(
            Task::SwapSuggestions,
            r#"{"suggestions": ["Soup", " paella ", "Baked cod", "baked cod", "Lentil stew"]}"#,
        ));
        let suggestions = gateway(fake)
            .swap_suggestions(
                "Soup",
                MealSlot::Dinner,
                &["Paella".to_string()],
                &profile(),
                DifficultyLevel::Easy,
                Theme::None,
            )
            .await
            .unwrap();
        assert_eq!(suggestions, vec!["Baked cod", "Lentil stew"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_repeated_suggestions_are_malformed() {
        let fake = Arc::new(FakeProvider::new().with_default_response(
            Task::SwapSuggestions,
            r#"{"suggestions": ["soup", "Paella"]}"#,
        ));
        let err = gateway(fake)
            .swap_suggestions(
                "Soup",
                MealSlot::Dinner,
                &["Paella".to_string()],
                &profile(),
                DifficultyLevel::Easy,
                Theme::None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::MalformedResponse { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_suggestions_are_malformed() {
        let fake = Arc::new(
            FakeProvider::new()
                .with_default_response(Task::SwapSuggestions, r#"{"suggestions": []}"#),
        );
        let err = gateway(fake)
            .swap_suggestions(
                "Soup",
                MealSlot::Lunch,
                &[],
                &profile(),
                DifficultyLevel::Easy,
                Theme::None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::MalformedResponse { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retried_inside_lane() {
        let fake = Arc::new(FakeProvider::with_demo_responses());
        fake.push_rate_limit(Task::QuickIdeas);
        let ideas = gateway(fake.clone()).quick_ideas("dinner").await.unwrap();
        assert_eq!(ideas.len(), 3);
        assert_eq!(fake.calls_for(Task::QuickIdeas), 2);
    }
}
