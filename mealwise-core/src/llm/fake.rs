//! Fake generation provider for tests and offline demos.
//!
//! Responses are scripted per [`Task`]. Queued responses are consumed first,
//! then the task's default responder is used. Every call is recorded with
//! its start and finish instants so tests can check ordering and spacing.

use super::{GenerationRequest, GenerationService, LlmError, Task};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

type Responder = Arc<dyn Fn(&GenerationRequest) -> Result<String, LlmError> + Send + Sync>;

/// One recorded call.
#[derive(Debug, Clone)]
pub struct FakeCall {
    pub task: Task,
    pub user: String,
    pub temperature: f32,
    pub started: Instant,
    pub finished: Instant,
}

#[derive(Default)]
pub struct FakeProvider {
    queued: Mutex<HashMap<Task, VecDeque<Responder>>>,
    defaults: Mutex<HashMap<Task, Responder>>,
    calls: Mutex<Vec<FakeCall>>,
    latency: Duration,
}

impl fmt::Debug for FakeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeProvider")
            .field("latency", &self.latency)
            .field("calls", &lock(&self.calls).len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate time spent on the remote side of each call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Respond to every call for `task` with `response` once the queue is empty.
    pub fn with_default_response(self, task: Task, response: impl Into<String>) -> Self {
        let response = response.into();
        self.set_responder(task, move |_| Ok(response.clone()));
        self
    }

    pub fn set_responder<F>(&self, task: Task, responder: F)
    where
        F: Fn(&GenerationRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        lock(&self.defaults).insert(task, Arc::new(responder));
    }

    /// Queue a one-shot text response for `task`.
    pub fn push_response(&self, task: Task, response: impl Into<String>) {
        let response = response.into();
        self.push_with(task, move |_| Ok(response.clone()));
    }

    /// Queue a one-shot rate-limit failure for `task`.
    pub fn push_rate_limit(&self, task: Task) {
        self.push_with(task, |_| {
            Err(LlmError::RateLimited {
                retry_after_secs: None,
            })
        });
    }

    pub fn push_with<F>(&self, task: Task, responder: F)
    where
        F: Fn(&GenerationRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        lock(&self.queued)
            .entry(task)
            .or_default()
            .push_back(Arc::new(responder));
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn calls_for(&self, task: Task) -> usize {
        lock(&self.calls).iter().filter(|c| c.task == task).count()
    }

    fn next_responder(&self, task: Task) -> Option<Responder> {
        if let Some(responder) = lock(&self.queued).get_mut(&task).and_then(VecDeque::pop_front) {
            return Some(responder);
        }
        lock(&self.defaults).get(&task).cloned()
    }

    /// A provider that answers every task with plausible content.
    ///
    /// Skeletons use distinct names for all 35 slots. Batch and shopping
    /// responses echo what the prompt asks for.
    pub fn with_demo_responses() -> Self {
        let provider = Self::new();

        provider.set_responder(Task::WeeklySkeleton, |_| Ok(demo_skeleton().to_string()));
        provider.set_responder(Task::RecipeBatch, |request| {
            let entries: Vec<Value> = numbered_lines(&request.user)
                .into_iter()
                .map(|name| json!({"mealName": name, "recipe": demo_recipe(&name)}))
                .collect();
            Ok(Value::Array(entries).to_string())
        });
        provider.set_responder(Task::Recipe, |request| {
            let name = quoted(&request.user).unwrap_or("Recipe");
            Ok(demo_recipe(name).to_string())
        });
        provider.set_responder(Task::RescueRecipe, |_| {
            Ok(demo_recipe("Fridge rescue omelette").to_string())
        });
        provider.set_responder(Task::ShoppingList, |request| {
            let items: Vec<Value> = request
                .user
                .lines()
                .filter_map(|line| line.strip_prefix("- "))
                .filter_map(|line| line.split_once(": "))
                .map(|(name, quantity)| {
                    json!({"name": name, "quantity": quantity, "category": "Despensa"})
                })
                .collect();
            Ok(Value::Array(items).to_string())
        });
        provider.set_responder(Task::QuickIdeas, |_| {
            Ok(json!([
                {"name": "Avocado toast", "description": "Crunchy bread with creamy avocado."},
                {"name": "Greek yogurt bowl", "description": "Yogurt, honey and walnuts."},
                {"name": "Tomato bruschetta", "description": "Garlic, basil and ripe tomato."}
            ])
            .to_string())
        });
        provider.set_responder(Task::SwapSuggestions, |_| {
            Ok(json!({"suggestions": ["Baked cod", "Lentil stew", "Beef stir-fry"]}).to_string())
        });

        provider
    }
}

#[async_trait]
impl GenerationService for FakeProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let started = Instant::now();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let result = match self.next_responder(request.task) {
            Some(responder) => responder(request),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: No response configured for task {}",
                request.task
            ))),
        };

        lock(&self.calls).push(FakeCall {
            task: request.task,
            user: request.user.clone(),
            temperature: request.temperature,
            started,
            finished: Instant::now(),
        });

        result
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

/// Entries of a `1. name` style list.
fn numbered_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let (number, rest) = line.trim().split_once(". ")?;
            number
                .chars()
                .all(|c| c.is_ascii_digit())
                .then(|| rest.trim().to_string())
        })
        .collect()
}

/// First double-quoted fragment of `text`.
fn quoted(text: &str) -> Option<&str> {
    let start = text.find('"')? + 1;
    let len = text[start..].find('"')?;
    Some(&text[start..start + len])
}

fn demo_recipe(name: &str) -> Value {
    json!({
        "name": name,
        "instructions": ["Prepare the ingredients.", "Cook and serve."],
        "ingredients": [
            {"name": "olive oil", "quantity": "1 tbsp"},
            {"name": format!("{} base", name.to_lowercase()), "quantity": "300 g"}
        ],
        "complexity": "Easy",
        "prepTime": "20 min",
        "category": "Mixed"
    })
}

fn demo_skeleton() -> Value {
    const DAYS: [&str; 7] = [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ];
    const SLOTS: [&str; 5] = [
        "breakfast",
        "morning_snack",
        "lunch",
        "afternoon_snack",
        "dinner",
    ];

    let mut week = serde_json::Map::new();
    for day in DAYS {
        let mut plan = serde_json::Map::new();
        for slot in SLOTS {
            plan.insert(
                slot.to_string(),
                json!({"name": format!("{} {}", day, slot.replace('_', " "))}),
            );
        }
        week.insert(day.to_string(), Value::Object(plan));
    }
    Value::Object(week)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(task: Task, user: &str) -> GenerationRequest {
        GenerationRequest {
            task,
            system: String::new(),
            user: user.to_string(),
            schema: Value::Null,
            temperature: 0.5,
        }
    }

    #[tokio::test]
    async fn test_queued_before_default() {
        let provider = FakeProvider::new().with_default_response(Task::Recipe, "default");
        provider.push_response(Task::Recipe, "first");

        let first = provider.generate(&request(Task::Recipe, "")).await.unwrap();
        let second = provider.generate(&request(Task::Recipe, "")).await.unwrap();
        assert_eq!(first, "first");
        assert_eq!(second, "default");
        assert_eq!(provider.calls_for(Task::Recipe), 2);
    }

    #[tokio::test]
    async fn test_unscripted_task_fails() {
        let provider = FakeProvider::new();
        let result = provider.generate(&request(Task::QuickIdeas, "")).await;
        assert!(matches!(result, Err(LlmError::RequestFailed(_))));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_demo_batch_echoes_names() {
        let provider = FakeProvider::with_demo_responses();
        let response = provider
            .generate(&request(Task::RecipeBatch, "Dishes:\n1. Paella\n2. Gazpacho\n- Diners: 2"))
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[1]["mealName"], "Gazpacho");
    }

    #[test]
    fn test_quoted() {
        assert_eq!(quoted("recipe for \"Paella\" now"), Some("Paella"));
        assert_eq!(quoted("no quotes"), None);
    }
}
