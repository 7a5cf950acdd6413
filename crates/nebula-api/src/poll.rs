//! Namespace lifecycle polling.
//!
//! Phase transitions are driven entirely by the remote system; this module
//! only observes. The wait loop re-fetches the namespace at a fixed
//! interval until a target predicate holds or the deadline passes, and the
//! outcome is explicit so callers can tell "reached" from "gave up".

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::error::ApiError;
use crate::types::{Namespace, Phase};

/// Terminal result of a wait loop.
#[derive(Debug, Clone)]
pub enum WaitOutcome {
    /// The target phase predicate was satisfied before the deadline.
    Reached(Namespace),
    /// The deadline passed; carries the last observed state.
    TimedOut(Namespace),
}

impl WaitOutcome {
    /// The namespace in its last observed state, either way.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        match self {
            Self::Reached(ns) | Self::TimedOut(ns) => ns,
        }
    }

    /// True when the target phase was reached.
    #[must_use]
    pub fn reached(&self) -> bool {
        matches!(self, Self::Reached(_))
    }
}

/// Poll until `target` holds for the namespace phase or `timeout` elapses.
///
/// `initial` is checked first, so a namespace that already satisfies the
/// target never triggers a fetch. A failed poll aborts the wait with the
/// error; the fixed-interval loop is the only retry mechanism.
///
/// # Errors
///
/// Propagates the first fetch failure.
pub async fn wait_for<F, Fut>(
    initial: Namespace,
    mut fetch: F,
    target: impl Fn(Phase) -> bool,
    interval: Duration,
    timeout: Duration,
) -> Result<WaitOutcome, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Namespace, ApiError>>,
{
    let deadline = Instant::now() + timeout;
    let mut ns = initial;

    loop {
        if target(ns.phase) {
            debug!(alias = %ns.alias, phase = %ns.phase, "target phase reached");
            return Ok(WaitOutcome::Reached(ns));
        }
        if Instant::now() >= deadline {
            debug!(alias = %ns.alias, phase = %ns.phase, "wait deadline passed");
            return Ok(WaitOutcome::TimedOut(ns));
        }
        tokio::time::sleep(interval).await;
        ns = fetch().await?;
    }
}

/// A freshly created or scheduled namespace has settled: the phase left
/// SCHEDULED/STARTING (to RUNNING on success, elsewhere on failure).
#[must_use]
pub fn start_settled(phase: Phase) -> bool {
    !matches!(phase, Phase::Scheduled | Phase::Starting)
}

/// A resumed namespace has settled: like [`start_settled`] but the loop
/// must also leave PAUSED, which is where a resume starts from.
#[must_use]
pub fn resume_settled(phase: Phase) -> bool {
    !matches!(phase, Phase::Scheduled | Phase::Starting | Phase::Paused)
}

/// The namespace finished pausing.
#[must_use]
pub fn stopped(phase: Phase) -> bool {
    phase == Phase::Paused
}

/// The namespace finished deletion.
#[must_use]
pub fn removed(phase: Phase) -> bool {
    phase == Phase::Removed
}
