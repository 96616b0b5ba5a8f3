//! Per-operation cancellation and deadline

use crate::error::{PostError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation handle and optional deadline carried by one orchestrator
/// call. Every store step runs under it; once it fires no further step
/// starts.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OpContext {
    /// No deadline, cancellable only through [`OpContext::cancel`]
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Tie the operation to an externally owned token
    pub fn with_cancel(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Fail if the context is already cancelled or past its deadline
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(PostError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(PostError::DeadlineExceeded(Duration::ZERO));
            }
        }
        Ok(())
    }

    fn effective_deadline(&self, step_timeout: Option<Duration>) -> Option<Instant> {
        let step = step_timeout.map(|t| Instant::now() + t);
        match (self.deadline, step) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Start one step unless the context already fired, and drop it if the
    /// context fires before it completes. A step that has already finished
    /// keeps its result even when cancellation is observed in the same poll.
    pub(crate) async fn run<T, S, F>(&self, step_timeout: Option<Duration>, start: S) -> Result<T>
    where
        S: FnOnce() -> F,
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let step = start();
        let deadline = self.effective_deadline(step_timeout);
        let started = Instant::now();
        let guarded = async {
            match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, step)
                    .await
                    .map_err(|_| PostError::DeadlineExceeded(started.elapsed()))?,
                None => step.await,
            }
        };

        tokio::select! {
            biased;
            result = guarded => result,
            _ = self.token.cancelled() => Err(PostError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_cancelled_context_skips_step() {
        let ctx = OpContext::background();
        ctx.cancel();

        let started = AtomicBool::new(false);
        let flag = &started;
        let result = ctx
            .run(None, move || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(PostError::Cancelled)));
        assert!(!started.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_interrupts_slow_step() {
        let ctx = OpContext::with_timeout(Duration::from_millis(50));
        let result: Result<()> = ctx
            .run(None, || async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(PostError::DeadlineExceeded(_))));
        assert!(matches!(ctx.check(), Err(PostError::DeadlineExceeded(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_timeout_tighter_than_context() {
        let ctx = OpContext::background();
        let result: Result<()> = ctx
            .run(Some(Duration::from_millis(10)), || async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(PostError::DeadlineExceeded(_))));
    }

    #[tokio::test]
    async fn test_cancel_during_step() {
        let token = CancellationToken::new();
        let ctx = OpContext::with_cancel(token.clone());

        let inner = token.clone();
        let result: Result<()> = ctx
            .run(None, move || async move {
                inner.cancel();
                std::future::pending::<()>().await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(PostError::Cancelled)));
    }

    #[tokio::test]
    async fn test_finished_step_wins_over_cancellation() {
        let token = CancellationToken::new();
        let ctx = OpContext::with_cancel(token.clone());

        let inner = token.clone();
        let result = ctx
            .run(None, move || async move {
                inner.cancel();
                Ok(5)
            })
            .await;
        assert_eq!(result.unwrap(), 5);
        assert!(matches!(ctx.check(), Err(PostError::Cancelled)));
    }

    #[tokio::test]
    async fn test_step_result_passes_through() {
        let ctx = OpContext::background();
        assert_eq!(ctx.run(None, || async { Ok(7) }).await.unwrap(), 7);
        let err = ctx
            .run::<(), _, _>(None, || async { Err(PostError::NotFound("x".into())) })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
