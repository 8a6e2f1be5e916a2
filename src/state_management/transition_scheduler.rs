use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use crate::config::AccessorySettings;
use crate::errors::{GarageDoorError, GarageDoorResult};
use crate::models::{DoorCurrentState, DoorTargetState};
use crate::services::CommandDispatcher;
use crate::state_management::cancellable_delay::{CancellableDelay, DelayHandle};
use crate::state_management::state_store::StateStore;

/// The timed phases a door sequence can be waiting in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Opening,
    Closing,
    AutoClose,
}

/// Identifies the sequence generation a timed sequence belongs to.
///
/// Every `reset()` starts a new generation; work carrying an older token is void.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceToken(u64);

/// One delay slot per phase plus the current generation.
#[derive(Debug, Default)]
struct DelaySlots {
    generation: u64,
    opening: Option<DelayHandle>,
    closing: Option<DelayHandle>,
    auto_close: Option<DelayHandle>,
}

impl DelaySlots {
    fn slot_mut(&mut self, phase: Phase) -> &mut Option<DelayHandle> {
        match phase {
            Phase::Opening => &mut self.opening,
            Phase::Closing => &mut self.closing,
            Phase::AutoClose => &mut self.auto_close,
        }
    }

    fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for handle in [self.opening.take(), self.closing.take(), self.auto_close.take()].into_iter().flatten() {
            handle.cancel();
            cancelled += 1;
        }
        cancelled
    }

    fn check(&self, token: SequenceToken) -> GarageDoorResult<()> {
        if token.0 == self.generation {
            Ok(())
        } else {
            Err(GarageDoorError::DelayCancelled)
        }
    }
}

struct SchedulerInner {
    settings: AccessorySettings,
    store: Arc<StateStore>,
    dispatcher: Arc<dyn CommandDispatcher>,
    slots: Mutex<DelaySlots>,
}

/// Orchestrates the open, close and auto-close sequences of the door.
///
/// Owns the opening, closing and auto-close delay handles; only the scheduler cancels them.
/// Cheap to clone; clones share the same slots.
#[derive(Clone)]
pub struct TransitionScheduler {
    inner: Arc<SchedulerInner>,
}

impl TransitionScheduler {
    /// Creates a new `TransitionScheduler`.
    ///
    /// # Arguments
    ///
    /// * `settings` - Door timings, name and command codes.
    /// * `store` - The state record the sequences mutate.
    /// * `dispatcher` - The transport used to send the door's hex commands.
    pub fn new(
        settings: AccessorySettings,
        store: Arc<StateStore>,
        dispatcher: Arc<dyn CommandDispatcher>,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                settings,
                store,
                dispatcher,
                slots: Mutex::new(DelaySlots::default()),
            }),
        }
    }

    fn name(&self) -> &str {
        &self.inner.settings.name
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.inner.store
    }

    pub fn settings(&self) -> &AccessorySettings {
        &self.inner.settings
    }

    /// Cancels any pending opening, closing or auto-close delay and starts a new generation.
    ///
    /// Idempotent. A sequence started before the reset performs no further state changes,
    /// even if its delay had already elapsed.
    ///
    /// # Returns
    ///
    /// The token for work that belongs to the new generation.
    pub fn reset(&self) -> SequenceToken {
        let mut slots = self.inner.slots.lock();
        slots.generation += 1;
        let cancelled = slots.cancel_all();
        if cancelled > 0 {
            debug!("{} reset: cancelled {} pending delay(s)", self.name(), cancelled);
        }
        SequenceToken(slots.generation)
    }

    fn current_token(&self) -> SequenceToken {
        SequenceToken(self.inner.slots.lock().generation)
    }

    /// Returns `true` if a delay is armed for the given phase.
    pub fn is_pending(&self, phase: Phase) -> bool {
        let mut slots = self.inner.slots.lock();
        slots.slot_mut(phase).as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Arms the delay for a phase, replacing (and cancelling) whatever the slot held.
    pub(crate) fn arm(&self, token: SequenceToken, phase: Phase, duration: Duration) -> GarageDoorResult<CancellableDelay> {
        let mut slots = self.inner.slots.lock();
        slots.check(token)?;
        let (delay, handle) = CancellableDelay::new(duration);
        if let Some(previous) = slots.slot_mut(phase).replace(handle) {
            previous.cancel();
        }
        Ok(delay)
    }

    /// Moves the door into a motion state and arms that phase's delay, atomically.
    pub(crate) fn begin(
        &self,
        token: SequenceToken,
        phase: Phase,
        state: DoorCurrentState,
        duration: Duration,
    ) -> GarageDoorResult<CancellableDelay> {
        let mut slots = self.inner.slots.lock();
        slots.check(token)?;
        info!("{} setDoorCurrentState: {}", self.name(), state);
        self.inner.store.set_door_current_state(state);
        let (delay, handle) = CancellableDelay::new(duration);
        if let Some(previous) = slots.slot_mut(phase).replace(handle) {
            previous.cancel();
        }
        Ok(delay)
    }

    /// Ends a phase: releases its slot and applies `apply` to the store, unless the
    /// sequence has been superseded in the meantime.
    pub(crate) fn commit<R>(
        &self,
        token: SequenceToken,
        phase: Phase,
        apply: impl FnOnce(&StateStore) -> R,
    ) -> GarageDoorResult<R> {
        let mut slots = self.inner.slots.lock();
        slots.check(token)?;
        slots.slot_mut(phase).take();
        Ok(apply(&self.inner.store))
    }

    /// Sets a new door target and runs the matching timed sequence.
    ///
    /// 1. Resets any pending sequence
    /// 2. Records the new target and, if the door is shown resting at that target, flips the
    ///    displayed current state to the opposite position so observers see "Opening"/"Closing"
    /// 3. Sends the hex command for the target and waits for the transport
    /// 4. Spawns the open or close sequence; a superseded sequence ends silently
    ///
    /// # Arguments
    ///
    /// * `target` - The new door target.
    /// * `previous_target` - The target before this command.
    ///
    /// # Returns
    ///
    /// * `Ok(JoinHandle)` for the spawned sequence once the command has been sent
    /// * `Err(GarageDoorError)` if dispatch failed; no sequence is started in that case
    pub async fn set_door_target_state(
        &self,
        target: DoorTargetState,
        previous_target: DoorTargetState,
    ) -> GarageDoorResult<JoinHandle<()>> {
        let token = self.reset();
        let store = &self.inner.store;

        store.set_door_target_state(target);
        if target != previous_target && store.door_current_state() == target.resting() {
            debug!("{} showing door as {} until the command is sent", self.name(), target.opposite());
            store.set_door_current_state(target.opposite());
        }

        let command = self.inner.settings.data.for_door(target);
        info!("{} setDoorTargetState: {} (sending {})", self.name(), target, command);
        self.inner.dispatcher.perform_send(command).await?;

        let handle = match target {
            DoorTargetState::Open => self.spawn_sequence(self.open_with(token)),
            DoorTargetState::Closed => self.spawn_sequence(self.close_with(token)),
        };
        Ok(handle)
    }

    /// Runs the opening sequence for the current generation.
    ///
    /// The door is shown as opening before this returns; the returned future completes
    /// the sequence (open, then the optional auto-close).
    pub fn open(&self) -> impl Future<Output = GarageDoorResult<()>> + Send + 'static {
        self.open_with(self.current_token())
    }

    /// Runs the closing sequence for the current generation.
    ///
    /// The door is shown as closing before this returns.
    pub fn close(&self) -> impl Future<Output = GarageDoorResult<()>> + Send + 'static {
        self.close_with(self.current_token())
    }

    fn open_with(&self, token: SequenceToken) -> impl Future<Output = GarageDoorResult<()>> + Send + 'static {
        let this = self.clone();
        let opening = self.begin(token, Phase::Opening, DoorCurrentState::Opening, self.inner.settings.open_duration());

        async move {
            opening?.wait().await?;
            this.commit(token, Phase::Opening, |store| store.set_door_current_state(DoorCurrentState::Open))?;
            info!("{} setDoorCurrentState: {}", this.name(), DoorCurrentState::Open);

            let Some(auto_close_delay) = this.inner.settings.auto_close_delay() else {
                return Ok(());
            };

            info!("{} automatically closing in {:?}", this.name(), auto_close_delay);
            this.arm(token, Phase::AutoClose, auto_close_delay)?.wait().await?;
            this.commit(token, Phase::AutoClose, |store| store.set_door_target_state(DoorTargetState::Closed))?;

            let command = this.inner.settings.data.for_door(DoorTargetState::Closed);
            info!("{} setDoorTargetState: {} (sending {})", this.name(), DoorTargetState::Closed, command);
            this.inner.dispatcher.perform_send(command).await?;

            // close_with re-checks the token, so a reset during the send ends the sequence here
            this.close_with(token).await
        }
    }

    fn close_with(&self, token: SequenceToken) -> impl Future<Output = GarageDoorResult<()>> + Send + 'static {
        let this = self.clone();
        let closing = self.begin(token, Phase::Closing, DoorCurrentState::Closing, self.inner.settings.close_duration());

        async move {
            closing?.wait().await?;
            this.commit(token, Phase::Closing, |store| store.set_door_current_state(DoorCurrentState::Closed))?;
            info!("{} setDoorCurrentState: {}", this.name(), DoorCurrentState::Closed);
            Ok::<(), GarageDoorError>(())
        }
    }

    /// Spawns a sequence whose cancellation is swallowed and whose other errors are logged.
    pub fn spawn_sequence<F>(&self, sequence: F) -> JoinHandle<()>
    where
        F: Future<Output = GarageDoorResult<()>> + Send + 'static,
    {
        let name = self.name().to_string();
        tokio::spawn(async move {
            if let Err(e) = ignore_cancellation(sequence.await) {
                error!("{} door sequence failed: {}", name, e);
            }
        })
    }
}

/// Treats `DelayCancelled` as a normal early exit.
pub fn ignore_cancellation(result: GarageDoorResult<()>) -> GarageDoorResult<()> {
    match result {
        Err(e) if e.is_cancellation() => {
            debug!("Door sequence superseded");
            Ok(())
        }
        other => other,
    }
}
