//! Bounded exponential backoff for rate-limited calls.

use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::config::PlannerConfig;
use crate::error::PlannerError;
use crate::llm::LlmError;

/// Backoff schedule. The wait before retry `k` (0-based) is
/// `initial_delay * 2^k` plus a jitter below `min(max_jitter, initial_delay)`,
/// so waits never shrink from one retry to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_secs(4),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            max_attempts: config.retry_max_attempts.max(1),
            initial_delay: config.retry_initial_delay,
            ..Self::default()
        }
    }

    /// Delay before retry `attempt`, without jitter.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    fn jitter_bound(&self) -> Duration {
        self.max_jitter.min(self.initial_delay)
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let bound = self.jitter_bound();
        let jitter = if bound.is_zero() {
            Duration::ZERO
        } else {
            bound.mul_f64(rand::rng().random::<f64>())
        };
        self.base_delay(attempt) + jitter.min(bound.saturating_sub(Duration::from_nanos(1)))
    }
}

/// Notified before each backoff sleep.
pub trait RetryObserver: Send + Sync {
    /// `attempt` is the 1-based number of the retry about to happen.
    fn on_retry(&self, context: &str, attempt: u32, wait: Duration);
}

/// Default observer: logs each backoff.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRetryObserver;

impl RetryObserver for LogRetryObserver {
    fn on_retry(&self, context: &str, attempt: u32, wait: Duration) {
        tracing::warn!(
            context = context,
            attempt = attempt,
            wait_ms = wait.as_millis() as u64,
            "Rate limited, backing off"
        );
    }
}

/// Runs an operation, retrying only on rate limits.
#[derive(Clone)]
pub struct RetryController {
    policy: RetryPolicy,
    observer: Arc<dyn RetryObserver>,
}

impl std::fmt::Debug for RetryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryController")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for RetryController {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            observer: Arc::new(LogRetryObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn run<T, F, Fut>(&self, context: &str, mut operation: F) -> Result<T, PlannerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_rate_limited() => {
                    attempt += 1;
                    if attempt >= self.policy.max_attempts {
                        tracing::warn!(
                            context = context,
                            attempts = attempt,
                            "Giving up after repeated rate limits"
                        );
                        return Err(PlannerError::RateLimitExceeded {
                            context: context.to_string(),
                        });
                    }
                    let wait = self.policy.delay_for(attempt - 1);
                    self.observer.on_retry(context, attempt, wait);
                    tokio::time::sleep(wait).await;
                }
                Err(err) => return Err(map_llm_error(context, err)),
            }
        }
    }
}

/// Map a non-retried provider failure into the surfaced taxonomy.
pub fn map_llm_error(context: &str, err: LlmError) -> PlannerError {
    match err {
        LlmError::NotConfigured(reason) => PlannerError::Configuration(reason),
        LlmError::EmptyResponse => PlannerError::EmptyResponse {
            context: context.to_string(),
        },
        LlmError::RateLimited { .. } => PlannerError::RateLimitExceeded {
            context: context.to_string(),
        },
        other => PlannerError::transport(context, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        waits: Mutex<Vec<(u32, Duration)>>,
    }

    impl RetryObserver for Recorder {
        fn on_retry(&self, _context: &str, attempt: u32, wait: Duration) {
            self.waits.lock().unwrap().push((attempt, wait));
        }
    }

    #[test]
    fn test_delays_never_decrease() {
        let policy = RetryPolicy::default();
        for _ in 0..50 {
            let delays: Vec<Duration> = (0..3).map(|k| policy.delay_for(k)).collect();
            for (k, delay) in delays.iter().enumerate() {
                let base = policy.base_delay(k as u32);
                assert!(*delay >= base);
                assert!(*delay < base + Duration::from_secs(1));
            }
            assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        }
        assert_eq!(policy.base_delay(2), Duration::from_secs(16));
    }

    #[test]
    fn test_jitter_capped_by_initial_delay() {
        let policy = RetryPolicy {
            max_attempts: 4,
            initial_delay: Duration::from_millis(10),
            max_jitter: Duration::from_secs(1),
        };
        for k in 0..3 {
            assert!(policy.delay_for(k) < policy.base_delay(k) + Duration::from_millis(10));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_four_attempts() {
        let recorder = Arc::new(Recorder::default());
        let controller = RetryController::default().with_observer(recorder.clone());
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = controller
            .run("testing", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LlmError::RateLimited {
                    retry_after_secs: None,
                })
            })
            .await;

        assert!(matches!(result, Err(PlannerError::RateLimitExceeded { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let waits = recorder.waits.lock().unwrap().clone();
        assert_eq!(waits.iter().map(|(a, _)| *a).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(waits.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_rate_limit() {
        let controller = RetryController::default();
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = controller
            .run("testing", || async {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(LlmError::RateLimited {
                        retry_after_secs: None,
                    })
                } else {
                    Ok("done")
                }
            })
            .await
            .unwrap();

        assert_eq!(result, "done");
        assert!(started.elapsed() >= Duration::from_secs(4));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_not_retried() {
        let controller = RetryController::default();
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = controller
            .run("testing", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LlmError::NotConfigured("no key".to_string()))
            })
            .await;

        assert!(matches!(result, Err(PlannerError::Configuration(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let err = map_llm_error("testing", LlmError::ApiError {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(matches!(err, PlannerError::Transport { .. }));
    }
}
