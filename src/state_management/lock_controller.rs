use std::sync::Arc;
use tracing::info;
use crate::config::CommandCodes;
use crate::errors::{GarageDoorError, GarageDoorResult};
use crate::models::{LockCurrentState, LockTargetState};
use crate::services::CommandDispatcher;
use crate::state_management::state_store::StateStore;

/// Keeps the lock's current state in step with its target.
///
/// Lock motion is treated as atomic: once the command is acknowledged the lock is where it was told to be.
pub struct LockController {
    name: String,
    codes: CommandCodes,
    store: Arc<StateStore>,
    dispatcher: Arc<dyn CommandDispatcher>,
}

impl LockController {
    pub fn new(
        name: impl Into<String>,
        codes: CommandCodes,
        store: Arc<StateStore>,
        dispatcher: Arc<dyn CommandDispatcher>,
    ) -> Self {
        Self {
            name: name.into(),
            codes,
            store,
            dispatcher,
        }
    }

    /// Records the new lock target, sends the lock or unlock command and mirrors the target into the current state.
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the lock's current state matches the target
    /// * `Err(GarageDoorError)` if no code is configured for the target or dispatch fails; the current state is left untouched
    pub async fn set_lock_target_state(&self, target: LockTargetState) -> GarageDoorResult<()> {
        self.store.set_lock_target_state(target);

        let command = self.codes.for_lock(target).ok_or_else(|| {
            GarageDoorError::InvalidCommand(format!("no hex code configured to make the lock {}", target))
        })?;
        self.dispatcher.perform_send(command).await?;

        let current = LockCurrentState::from(target);
        info!("{} setCurrentLockState: {}", self.name, current);
        self.store.set_lock_current_state(current);
        Ok(())
    }
}
