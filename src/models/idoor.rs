//! # Garage Door Accessory State

//! The single four-field record describing what the accessory believes about the door and its lock.

use serde::{Deserialize, Serialize};
use crate::models::{CharacteristicUpdate, DoorCurrentState, DoorTargetState, LockCurrentState, LockTargetState};

/// Door and lock state, created once at accessory initialization and mutated in place for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorAccessoryState {
    /// The believed physical state of the door
    pub door_current_state: DoorCurrentState,
    /// The desired end state of the door
    pub door_target_state: DoorTargetState,
    /// The lock's current state
    pub lock_current_state: LockCurrentState,
    /// The lock's desired state
    pub lock_target_state: LockTargetState,
}

impl Default for DoorAccessoryState {
    fn default() -> Self {
        Self {
            door_current_state: DoorCurrentState::Closed,
            door_target_state: DoorTargetState::Closed,
            lock_current_state: LockCurrentState::Secured,
            lock_target_state: LockTargetState::Secured,
        }
    }
}

impl DoorAccessoryState {
    pub fn new(
        door_current_state: DoorCurrentState,
        door_target_state: DoorTargetState,
        lock_current_state: LockCurrentState,
        lock_target_state: LockTargetState,
    ) -> Self {
        Self {
            door_current_state,
            door_target_state,
            lock_current_state,
            lock_target_state,
        }
    }

    /// Returns `true` when the door rests at the position its target implies.
    pub fn is_settled(&self) -> bool {
        self.door_current_state == self.door_target_state.resting()
    }

    /// Writes a surfaced characteristic value into the matching field.
    pub fn apply(&mut self, update: CharacteristicUpdate) {
        match update {
            CharacteristicUpdate::DoorCurrentState(s) => self.door_current_state = s,
            CharacteristicUpdate::DoorTargetState(s) => self.door_target_state = s,
            CharacteristicUpdate::LockCurrentState(s) => self.lock_current_state = s,
            CharacteristicUpdate::LockTargetState(s) => self.lock_target_state = s,
        }
    }
}
