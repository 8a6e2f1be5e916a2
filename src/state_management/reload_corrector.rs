use crate::models::{DoorAccessoryState, LockTargetState};

/// Repairs a state record read back from storage after a restart.
///
/// Targets are made to match the current states, so the accessory does not start a transition
/// nobody asked for. A door persisted mid-motion is settled at the end of that motion.
///
/// # Returns
///
/// `true` if any field changed.
pub fn correct_reloaded_state(state: &mut DoorAccessoryState) -> bool {
    let before = *state;

    let resting = state.door_current_state.settled();
    state.door_current_state = resting.resting();
    state.door_target_state = resting;
    state.lock_target_state = LockTargetState::from(state.lock_current_state);

    *state != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DoorCurrentState, DoorTargetState, LockCurrentState};

    #[test]
    fn door_target_follows_current() {
        let mut state = DoorAccessoryState::new(
            DoorCurrentState::Closed,
            DoorTargetState::Open,
            LockCurrentState::Secured,
            LockTargetState::Secured,
        );

        assert!(correct_reloaded_state(&mut state));
        assert_eq!(state.door_target_state, DoorTargetState::Closed);
        assert_eq!(state.door_current_state, DoorCurrentState::Closed);
    }

    #[test]
    fn lock_target_follows_current() {
        let mut state = DoorAccessoryState::new(
            DoorCurrentState::Open,
            DoorTargetState::Open,
            LockCurrentState::Unsecured,
            LockTargetState::Secured,
        );

        assert!(correct_reloaded_state(&mut state));
        assert_eq!(state.lock_target_state, LockTargetState::Unsecured);
    }

    #[test]
    fn motion_is_settled_at_its_end_position() {
        let mut state = DoorAccessoryState::new(
            DoorCurrentState::Closing,
            DoorTargetState::Closed,
            LockCurrentState::Secured,
            LockTargetState::Secured,
        );

        correct_reloaded_state(&mut state);
        assert_eq!(state.door_current_state, DoorCurrentState::Closed);
        assert_eq!(state.door_target_state, DoorTargetState::Closed);

        state.door_current_state = DoorCurrentState::Opening;
        correct_reloaded_state(&mut state);
        assert_eq!(state.door_current_state, DoorCurrentState::Open);
        assert_eq!(state.door_target_state, DoorTargetState::Open);
    }

    #[test]
    fn consistent_state_is_left_alone() {
        let mut state = DoorAccessoryState::default();
        assert!(!correct_reloaded_state(&mut state));
        assert_eq!(state, DoorAccessoryState::default());
    }
}
