//! Per-call cancellation and deadline handle
//!
//! Every client operation takes a [`Context`]. The same context bounds all
//! sub-requests an operation makes (the job fetch inside a trigger, the crumb
//! fetch before a mutation, the settle sleep and verification read of a stop),
//! so cancelling it or reaching its deadline ends the whole operation.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline for one logical operation.
///
/// Cheap to clone; clones share the cancellation token.
///
/// # Example
///
/// ```rust
/// use jenkins_bridge::Context;
/// use std::time::Duration;
///
/// let ctx = Context::with_timeout(Duration::from_secs(10));
/// let child = ctx.child();
/// ctx.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Deadline>,
    token: CancellationToken,
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        let budget = deadline.saturating_duration_since(Instant::now());
        Self {
            deadline: Some(Deadline {
                at: deadline,
                budget,
            }),
            token: CancellationToken::new(),
        }
    }

    /// A context driven by an externally owned cancellation token.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            deadline: None,
            token,
        }
    }

    /// Tighten the deadline to at most `timeout` from now.
    ///
    /// A `timeout` too large to represent as an instant leaves the context
    /// unbounded (or keeps its existing deadline).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let Some(at) = Instant::now().checked_add(timeout) else {
            return self;
        };
        match self.deadline {
            Some(existing) if existing.at <= at => {}
            _ => {
                self.deadline = Some(Deadline {
                    at,
                    budget: timeout,
                })
            }
        }
        self
    }

    /// A child context: cancelled with its parent, cancellable on its own.
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            token: self.token.child_token(),
        }
    }

    /// Cancel this context and every child.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether this context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The underlying cancellation token.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline.map(|d| d.at)
    }

    /// Time left before the deadline, if any.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.at.saturating_duration_since(Instant::now()))
    }

    /// Fail fast if the context is already cancelled or expired.
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline.at
        {
            return Err(Error::Timeout(deadline.budget));
        }
        Ok(())
    }

    /// Run `fut` bounded by this context.
    ///
    /// The future is dropped (aborting any in-flight request) as soon as the
    /// context is cancelled or its deadline passes.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let expired = async {
            match self.deadline {
                Some(deadline) => {
                    tokio::time::sleep_until(deadline.at).await;
                    deadline.budget
                }
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled),
            budget = expired => Err(Error::Timeout(budget)),
            result = fut => result,
        }
    }

    /// Sleep for `duration`, waking early with an error on cancel or deadline.
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        self.run(async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }
}
