//! Poll until the remote side reflects a change, bounded by the context deadline

use std::future::Future;
use std::time::Duration;
use tfplug::context::Context;
use thiserror::Error;

use crate::api::ApiError;

/// Outcome of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    Ready,
    Pending,
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("context has no deadline")]
    NoDeadline,

    #[error("timed out waiting after {0:?}")]
    Timeout(Duration),

    #[error("wait was cancelled")]
    Cancelled,

    #[error("check failed: {0}")]
    Check(#[from] ApiError),
}

/// Run `check` every `interval` until it reports [`Poll::Ready`].
///
/// The context must carry a deadline. A failing check ends the wait with its error.
pub async fn wait_for<F, Fut>(ctx: &Context, interval: Duration, mut check: F) -> Result<(), WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Poll, ApiError>>,
{
    let deadline = ctx.deadline().ok_or(WaitError::NoDeadline)?;
    let started = tokio::time::Instant::now();
    let mut done = ctx.done();

    loop {
        if *done.borrow() {
            return Err(cancelled_or_timeout(deadline, started));
        }

        if check().await? == Poll::Ready {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = done.wait_for(|cancelled| *cancelled) => {
                return Err(cancelled_or_timeout(deadline, started));
            }
        }

        if std::time::Instant::now() >= deadline {
            return Err(WaitError::Timeout(started.elapsed()));
        }
    }
}

fn cancelled_or_timeout(deadline: std::time::Instant, started: tokio::time::Instant) -> WaitError {
    if std::time::Instant::now() >= deadline {
        WaitError::Timeout(started.elapsed())
    } else {
        WaitError::Cancelled
    }
}
