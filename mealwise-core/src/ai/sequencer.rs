//! Single-flight lane for outbound generation calls.
//!
//! Jobs run one at a time in submission order, with a fixed cooldown between
//! the end of one job and the start of the next.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::error::PlannerError;

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Debug)]
pub struct RequestSequencer {
    jobs: mpsc::UnboundedSender<Job>,
    pending: Arc<AtomicUsize>,
    cooldown: Duration,
}

impl RequestSequencer {
    /// Start the lane. Must be called inside a tokio runtime.
    pub fn new(cooldown: Duration) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        tokio::spawn(run_lane(rx, cooldown, Arc::clone(&pending)));
        Self {
            jobs,
            pending,
            cooldown,
        }
    }

    /// Queue a job and return a handle to its result.
    ///
    /// The job runs even if the handle is dropped. A job that panics
    /// resolves as [`PlannerError::Transport`].
    pub fn enqueue<T, F>(&self, context: &str, job: F) -> CallHandle<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, PlannerError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job_context = context.to_string();

        let wrapped: Job = Box::pin(async move {
            let result = match tokio::spawn(job).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(context = %job_context, error = %err, "Queued call failed");
                    Err(PlannerError::transport(job_context, err))
                }
            };
            // The caller may have gone away; the result is simply dropped then.
            let _ = tx.send(result);
        });

        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.jobs.send(wrapped).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            tracing::error!(context = context, "Request lane is closed");
        }

        CallHandle {
            result: rx,
            context: context.to_string(),
        }
    }

    /// Jobs queued but not yet started.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

async fn run_lane(
    mut jobs: mpsc::UnboundedReceiver<Job>,
    cooldown: Duration,
    pending: Arc<AtomicUsize>,
) {
    let mut last_finished: Option<Instant> = None;
    while let Some(job) = jobs.recv().await {
        if let Some(finished) = last_finished {
            tokio::time::sleep_until(finished + cooldown).await;
        }
        pending.fetch_sub(1, Ordering::SeqCst);
        job.await;
        last_finished = Some(Instant::now());
    }
    tracing::debug!("Request lane stopped");
}

/// Resolves with the result of a queued job.
#[derive(Debug)]
pub struct CallHandle<T> {
    result: oneshot::Receiver<Result<T, PlannerError>>,
    context: String,
}

impl<T> Future for CallHandle<T> {
    type Output = Result<T, PlannerError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.result).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(PlannerError::transport(
                std::mem::take(&mut this.context),
                "request lane closed before the call ran",
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type Spans = Arc<Mutex<Vec<(usize, Instant, Instant)>>>;

    fn timed_job(id: usize, spans: Spans) -> impl Future<Output = Result<usize, PlannerError>> {
        async move {
            let start = Instant::now();
            tokio::time::sleep(Duration::from_millis(100)).await;
            spans.lock().unwrap().push((id, start, Instant::now()));
            Ok(id)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_jobs_run_in_order_with_cooldown() {
        let sequencer = RequestSequencer::new(Duration::from_millis(500));
        let spans: Spans = Arc::default();

        let handles: Vec<_> = (0..3)
            .map(|id| sequencer.enqueue("test", timed_job(id, spans.clone())))
            .collect();
        assert_eq!(sequencer.pending(), 3);

        for (id, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), id);
        }

        let spans = spans.lock().unwrap().clone();
        assert_eq!(spans.iter().map(|s| s.0).collect::<Vec<_>>(), vec![0, 1, 2]);
        for pair in spans.windows(2) {
            assert!(pair[1].1 >= pair[0].2 + Duration::from_millis(500));
        }
        assert_eq!(sequencer.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_job_does_not_stop_lane() {
        let sequencer = RequestSequencer::new(Duration::from_millis(500));

        let failed = sequencer.enqueue("exploding", async {
            if true {
                panic!("boom");
            }
            Ok(0u8)
        });
        let next = sequencer.enqueue("after", async { Ok(7u8) });

        assert!(matches!(failed.await, Err(PlannerError::Transport { .. })));
        assert_eq!(next.await.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_still_runs() {
        let sequencer = RequestSequencer::new(Duration::from_millis(500));
        let spans: Spans = Arc::default();

        drop(sequencer.enqueue("dropped", timed_job(1, spans.clone())));
        sequencer.enqueue("kept", timed_job(2, spans.clone())).await.unwrap();

        let ids: Vec<usize> = spans.lock().unwrap().iter().map(|s| s.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_lane_does_not_wait() {
        let sequencer = RequestSequencer::new(Duration::from_millis(500));
        sequencer.enqueue("first", async { Ok(()) }).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let before = Instant::now();
        sequencer.enqueue("second", async { Ok(()) }).await.unwrap();
        assert!(before.elapsed() < Duration::from_millis(500));
    }
}
