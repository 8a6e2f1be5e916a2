use std::time::Duration;
use tokio::sync::oneshot;
use crate::errors::{GarageDoorError, GarageDoorResult};

/// A sleep that can be cut short through its `DelayHandle`.
///
/// Cancelling (or dropping the handle) resolves the delay with `GarageDoorError::DelayCancelled`.
#[derive(Debug)]
pub struct CancellableDelay {
    duration: Duration,
    cancelled: oneshot::Receiver<()>,
}

/// The owning side of a `CancellableDelay`.
#[derive(Debug)]
pub struct DelayHandle {
    cancel: Option<oneshot::Sender<()>>,
}

impl CancellableDelay {
    /// Creates a delay together with the handle that can cancel it.
    ///
    /// The clock starts when the delay is first awaited.
    pub fn new(duration: Duration) -> (Self, DelayHandle) {
        let (cancel, cancelled) = oneshot::channel();
        (
            Self { duration, cancelled },
            DelayHandle { cancel: Some(cancel) },
        )
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Waits for the full duration.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the duration has elapsed
    /// * `Err(GarageDoorError::DelayCancelled)` if the handle was cancelled or dropped first
    pub async fn wait(self) -> GarageDoorResult<()> {
        let mut cancelled = self.cancelled;
        tokio::select! {
            biased;
            _ = &mut cancelled => Err(GarageDoorError::DelayCancelled),
            _ = tokio::time::sleep(self.duration) => Ok(()),
        }
    }
}

impl DelayHandle {
    /// Cancels the delay. Safe to call after the delay has already finished.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Returns `true` once nothing is waiting on the delay any more.
    pub fn is_finished(&self) -> bool {
        self.cancel.as_ref().map_or(true, |cancel| cancel.is_closed())
    }
}
