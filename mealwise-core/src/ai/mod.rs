//! Generation orchestration: schemas, prompts, retries and the request lane.
//!
//! This module provides:
//! - `Schema` registry for structured responses
//! - Prompt builders producing `PromptSpec` values
//! - `GenerationClient`, one provider call per invocation
//! - `RetryController` with bounded exponential backoff on rate limits
//! - `RequestSequencer`, the single-flight lane every call goes through
//! - `GenerationGateway`, tying the above together per task
//!
//! # Configuration
//!
//! See [`AiConfig::from_env`] and [`PlannerConfig::from_env`].

pub mod client;
pub mod config;
pub mod gateway;
pub mod prompts;
pub mod retry;
pub mod schema;
pub mod sequencer;

pub use client::GenerationClient;
pub use config::{AiConfig, ConfigError, PlannerConfig};
pub use gateway::{GenerationGateway, MAX_SWAP_SUGGESTIONS};
pub use prompts::{PreferenceSignals, PromptSpec, WeeklyPlanRequest};
pub use retry::{LogRetryObserver, RetryController, RetryObserver, RetryPolicy};
pub use schema::Schema;
pub use sequencer::{CallHandle, RequestSequencer};
