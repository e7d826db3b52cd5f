//! Per-request deadline and cancellation.
//!
//! Every store call made for a request runs through [`RequestContext::run`].
//! When the deadline passes or the cancellation signal is raised, the store
//! future is dropped (releasing any pooled connection it holds) and the
//! caller receives an [`Interrupt`] instead of a generic failure.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Why a request stopped before its store call finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Interrupt {
    /// The caller went away or the server is shutting down.
    #[error("request cancelled")]
    Cancelled,
    /// The request deadline elapsed while waiting on the store.
    #[error("deadline exceeded")]
    Timeout,
}

/// Deadline and cancellation signal for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

impl RequestContext {
    /// No deadline, never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: None,
        }
    }

    /// Cancel when `signal` becomes `true`.
    pub fn cancel_on(mut self, signal: watch::Receiver<bool>) -> Self {
        self.cancel = Some(signal);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Drive `fut` to completion unless the request is interrupted first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Interrupt> {
        if self.is_cancelled() {
            return Err(Interrupt::Cancelled);
        }

        let mut cancel = self.cancel.clone();

        tokio::select! {
            biased;
            _ = cancelled(cancel.as_mut()) => Err(Interrupt::Cancelled),
            _ = expired(self.deadline) => Err(Interrupt::Timeout),
            output = fut => Ok(output),
        }
    }
}

async fn cancelled(signal: Option<&mut watch::Receiver<bool>>) {
    let Some(rx) = signal else {
        return std::future::pending().await;
    };
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        // Sender dropped: nobody can cancel us any more.
        if rx.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
}

async fn expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes_without_limits() {
        let ctx = RequestContext::background();
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(50));
        let result = ctx
            .run(tokio::time::sleep(Duration::from_secs(10)))
            .await;
        assert_eq!(result, Err(Interrupt::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_finishes_before_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(10));
        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                "done"
            })
            .await;
        assert_eq!(result, Ok("done"));
    }

    #[tokio::test]
    async fn test_already_cancelled_never_polls() {
        let (tx, rx) = watch::channel(true);
        let ctx = RequestContext::background().cancel_on(rx);
        let result = ctx.run(async { panic!("should not run") }).await;
        assert_eq!(result, Err::<(), _>(Interrupt::Cancelled));
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_flight() {
        let (tx, rx) = watch::channel(false);
        let ctx = RequestContext::with_timeout(Duration::from_secs(60)).cancel_on(rx);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = tx.send(true);
        });

        let result = ctx
            .run(tokio::time::sleep(Duration::from_secs(30)))
            .await;
        assert_eq!(result, Err(Interrupt::Cancelled));
    }

    #[tokio::test]
    async fn test_dropped_sender_does_not_cancel() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let ctx = RequestContext::background().cancel_on(rx);
        assert_eq!(ctx.run(async { 1 }).await, Ok(1));
    }
}
