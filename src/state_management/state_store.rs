use std::sync::Arc;
use parking_lot::Mutex;
use crate::models::{
    Characteristic, CharacteristicUpdate, DoorAccessoryState, DoorCurrentState, DoorTargetState,
    LockCurrentState, LockTargetState
};
use crate::services::StateSurface;

/// Holds the door/lock record and surfaces every field change.
///
/// The record lock is never held while the surface is called.
pub struct StateStore {
    state: Mutex<DoorAccessoryState>,
    surface: Arc<dyn StateSurface>,
}

impl StateStore {
    /// Creates a new `StateStore`.
    ///
    /// # Arguments
    ///
    /// * `initial` - The (already corrected) state loaded at startup.
    /// * `surface` - Where field changes are pushed.
    pub fn new(initial: DoorAccessoryState, surface: Arc<dyn StateSurface>) -> Self {
        Self {
            state: Mutex::new(initial),
            surface,
        }
    }

    /// Returns a copy of the whole record.
    pub fn snapshot(&self) -> DoorAccessoryState {
        *self.state.lock()
    }

    pub fn door_current_state(&self) -> DoorCurrentState {
        self.state.lock().door_current_state
    }

    pub fn door_target_state(&self) -> DoorTargetState {
        self.state.lock().door_target_state
    }

    pub fn lock_current_state(&self) -> LockCurrentState {
        self.state.lock().lock_current_state
    }

    pub fn lock_target_state(&self) -> LockTargetState {
        self.state.lock().lock_target_state
    }

    pub fn set_door_current_state(&self, value: DoorCurrentState) {
        self.state.lock().door_current_state = value;
        self.surface.refresh(CharacteristicUpdate::DoorCurrentState(value));
    }

    pub fn set_door_target_state(&self, value: DoorTargetState) {
        self.state.lock().door_target_state = value;
        self.surface.refresh(CharacteristicUpdate::DoorTargetState(value));
    }

    pub fn set_lock_current_state(&self, value: LockCurrentState) {
        self.state.lock().lock_current_state = value;
        self.surface.refresh(CharacteristicUpdate::LockCurrentState(value));
    }

    pub fn set_lock_target_state(&self, value: LockTargetState) {
        self.state.lock().lock_target_state = value;
        self.surface.refresh(CharacteristicUpdate::LockTargetState(value));
    }

    /// Re-surfaces a characteristic's current value without changing it.
    pub fn refresh(&self, characteristic: Characteristic) {
        let state = self.snapshot();
        let update = match characteristic {
            Characteristic::DoorCurrentState => CharacteristicUpdate::DoorCurrentState(state.door_current_state),
            Characteristic::DoorTargetState => CharacteristicUpdate::DoorTargetState(state.door_target_state),
            Characteristic::LockCurrentState => CharacteristicUpdate::LockCurrentState(state.lock_current_state),
            Characteristic::LockTargetState => CharacteristicUpdate::LockTargetState(state.lock_target_state),
        };
        self.surface.refresh(update);
    }
}
