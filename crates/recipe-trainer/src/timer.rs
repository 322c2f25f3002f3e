//! Deferred delivery of matching-drill resolutions.
//!
//! A [`ResolutionTimer`] holds at most one sleeping tokio task. When the
//! delay elapses the task sends its [`PendingResolution`] down an mpsc
//! channel to the session loop. Scheduling again, cancelling, or dropping
//! the timer aborts the task that is still waiting.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::config::Config;
use crate::matching::{PendingResolution, Verdict};

/// How long each verdict stays on screen before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionDelays {
    /// Pause before a correct pair is marked matched.
    pub matched: Duration,
    /// Pause before a wrong pair is turned back over.
    pub mismatched: Duration,
}

impl ResolutionDelays {
    /// Delays from the `[drill]` configuration section.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            matched: config.match_delay(),
            mismatched: config.mismatch_delay(),
        }
    }

    /// The pause for `verdict`.
    #[must_use]
    pub fn for_verdict(&self, verdict: Verdict) -> Duration {
        match verdict {
            Verdict::Match => self.matched,
            Verdict::Mismatch => self.mismatched,
        }
    }
}

impl Default for ResolutionDelays {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Cancellable single-slot timer for pending resolutions.
#[derive(Debug)]
pub struct ResolutionTimer {
    tx: mpsc::Sender<PendingResolution>,
    handle: Option<JoinHandle<()>>,
}

impl ResolutionTimer {
    /// Deliver elapsed resolutions to `tx`.
    #[must_use]
    pub fn new(tx: mpsc::Sender<PendingResolution>) -> Self {
        Self { tx, handle: None }
    }

    /// Send `pending` after `delay`, replacing any resolution still waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, pending: PendingResolution, delay: Duration) {
        self.cancel();
        let tx = self.tx.clone();
        trace!("Scheduling {:?} in {:?}", pending.verdict(), delay);
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver only goes away when the session is shutting down
            let _ = tx.send(pending).await;
        }));
    }

    /// Abort the waiting task, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                trace!("Cancelled pending resolution");
                true
            }
            _ => false,
        }
    }
}

impl Drop for ResolutionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
