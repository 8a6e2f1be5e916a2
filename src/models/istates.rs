//! # Garage Door State Enums

//! This module defines the enums representing the door and lock states of the garage door accessory.
//! They are owned by the crate rather than borrowed from any host framework's constant table.

use serde::{Deserialize, Serialize};
use derive_more::Display;

/// The believed physical state of the door.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Serialize, Deserialize, Display)]
pub enum DoorCurrentState {
    /// The door is fully open.
    #[display("open")]
    Open,
    /// The door is fully closed.
    #[display("closed")]
    Closed,
    /// The door is moving towards open.
    #[display("opening")]
    Opening,
    /// The door is moving towards closed.
    #[display("closing")]
    Closing,
}

impl DoorCurrentState {
    /// Returns `true` while the door is believed to be moving.
    pub fn is_moving(self) -> bool {
        matches!(self, DoorCurrentState::Opening | DoorCurrentState::Closing)
    }

    /// The resting position this state ends in.
    pub fn settled(self) -> DoorTargetState {
        match self {
            DoorCurrentState::Open | DoorCurrentState::Opening => DoorTargetState::Open,
            DoorCurrentState::Closed | DoorCurrentState::Closing => DoorTargetState::Closed,
        }
    }
}

/// The desired end state of the door.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Serialize, Deserialize, Display)]
pub enum DoorTargetState {
    #[display("open")]
    Open,
    #[display("closed")]
    Closed,
}

impl DoorTargetState {
    /// The resting current state this target settles into.
    pub fn resting(self) -> DoorCurrentState {
        match self {
            DoorTargetState::Open => DoorCurrentState::Open,
            DoorTargetState::Closed => DoorCurrentState::Closed,
        }
    }

    /// The resting current state on the other side of this target.
    ///
    /// Showing this while the target points elsewhere lets a bridge render
    /// "Opening" or "Closing" before any motion has been timed.
    pub fn opposite(self) -> DoorCurrentState {
        match self {
            DoorTargetState::Open => DoorCurrentState::Closed,
            DoorTargetState::Closed => DoorCurrentState::Open,
        }
    }
}

/// The lock's current state. There are no intermediate states.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Serialize, Deserialize, Display)]
pub enum LockCurrentState {
    #[display("secured")]
    Secured,
    #[display("unsecured")]
    Unsecured,
}

/// The lock's desired state.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Serialize, Deserialize, Display)]
pub enum LockTargetState {
    #[display("secured")]
    Secured,
    #[display("unsecured")]
    Unsecured,
}

impl From<LockTargetState> for LockCurrentState {
    fn from(target: LockTargetState) -> Self {
        match target {
            LockTargetState::Secured => LockCurrentState::Secured,
            LockTargetState::Unsecured => LockCurrentState::Unsecured,
        }
    }
}

impl From<LockCurrentState> for LockTargetState {
    fn from(current: LockCurrentState) -> Self {
        match current {
            LockCurrentState::Secured => LockTargetState::Secured,
            LockCurrentState::Unsecured => LockTargetState::Unsecured,
        }
    }
}
