mod common;

use garage_door_accessory::models::{
    CharacteristicUpdate, DoorCurrentState, DoorTargetState, DOOR_OPEN_SENSOR_STATE
};
use garage_door_accessory::state_management::Phase;

use common::*;

#[tokio::test(start_paused = true)]
async fn test_sensor_on_opens_closed_door_over_open_duration() {
    let mut settings = create_mock_settings();
    settings.open_duration = Some(4.0);
    let harness = create_accessory(settings, None);

    let opening = harness.accessory.on_sensor_event(DOOR_OPEN_SENSOR_STATE, b"on");
    assert!(opening.is_some());

    let state = harness.accessory.state();
    assert_eq!(state.door_target_state, DoorTargetState::Open);
    assert_eq!(state.door_current_state, DoorCurrentState::Opening);
    assert!(harness.dispatcher.sent().is_empty(), "the sensor never sends commands");

    advance_ms(3_900).await;
    assert_eq!(harness.accessory.state().door_current_state, DoorCurrentState::Opening);

    advance_ms(200).await;
    let state = harness.accessory.state();
    assert_eq!(state.door_current_state, DoorCurrentState::Open);
    assert_eq!(state.door_target_state, DoorTargetState::Open);
}

#[tokio::test(start_paused = true)]
async fn test_sensor_payload_is_trimmed() {
    let harness = create_accessory(create_mock_settings(), None);

    assert!(harness.accessory.on_sensor_event(DOOR_OPEN_SENSOR_STATE, b" on\n").is_some());
    assert_eq!(harness.accessory.state().door_current_state, DoorCurrentState::Opening);
}

#[tokio::test(start_paused = true)]
async fn test_sensor_on_is_ignored_when_already_open_or_opening() {
    for (current, target) in [
        (DoorCurrentState::Open, DoorTargetState::Open),
        (DoorCurrentState::Open, DoorTargetState::Closed),
        (DoorCurrentState::Closed, DoorTargetState::Open),
    ] {
        let harness = create_accessory(create_mock_settings(), None);
        // Seed through the scheduler so reload correction does not settle the record
        let store = harness.accessory.scheduler().store().clone();
        store.set_door_current_state(current);
        store.set_door_target_state(target);
        harness.surface.clear();

        assert!(harness.accessory.on_sensor_event(DOOR_OPEN_SENSOR_STATE, b"on").is_none());

        let state = harness.accessory.state();
        assert_eq!(state.door_current_state, current);
        assert_eq!(state.door_target_state, target);
        assert_eq!(
            harness.surface.updates(),
            vec![
                CharacteristicUpdate::DoorCurrentState(current),
                CharacteristicUpdate::DoorTargetState(target),
            ],
            "only the refresh is surfaced"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_sensor_on_does_not_restart_a_running_open() {
    let mut settings = create_mock_settings();
    settings.open_duration = Some(5.0);
    let harness = create_accessory(settings, None);

    harness.accessory.set_door_target_state(DoorTargetState::Open).await.unwrap();
    advance_ms(3_000).await;
    assert!(harness.accessory.on_sensor_event(DOOR_OPEN_SENSOR_STATE, b"on").is_none());

    // The user's open still finishes on its own schedule
    advance_ms(2_100).await;
    assert_eq!(harness.accessory.state().door_current_state, DoorCurrentState::Open);
}

#[tokio::test(start_paused = true)]
async fn test_sensor_off_closes_immediately_and_cancels_user_open() {
    let mut settings = create_mock_settings();
    settings.open_duration = Some(10.0);
    settings.auto_close_delay = Some(5.0);
    let harness = create_accessory(settings, None);

    harness.accessory.set_door_target_state(DoorTargetState::Open).await.unwrap();
    advance_ms(2_000).await;

    assert!(harness.accessory.on_sensor_event(DOOR_OPEN_SENSOR_STATE, b"off").is_none());
    let state = harness.accessory.state();
    assert_eq!(state.door_current_state, DoorCurrentState::Closed);
    assert_eq!(state.door_target_state, DoorTargetState::Closed);
    assert!(!harness.accessory.scheduler().is_pending(Phase::Opening));

    advance_ms(20_000).await;
    let state = harness.accessory.state();
    assert_eq!(state.door_current_state, DoorCurrentState::Closed);
    assert_eq!(state.door_target_state, DoorTargetState::Closed);
    assert!(!harness.surface.saw(CharacteristicUpdate::DoorCurrentState(DoorCurrentState::Open)));
}

#[tokio::test(start_paused = true)]
async fn test_sensor_off_when_already_closed_still_refreshes() {
    let harness = create_accessory(create_mock_settings(), None);

    harness.accessory.on_sensor_event(DOOR_OPEN_SENSOR_STATE, b"off");

    let state = harness.accessory.state();
    assert_eq!(state.door_current_state, DoorCurrentState::Closed);
    assert_eq!(state.door_target_state, DoorTargetState::Closed);
    let updates = harness.surface.updates();
    assert_eq!(updates.len(), 4, "two writes and two refreshes: {:?}", updates);
}

#[tokio::test(start_paused = true)]
async fn test_unexpected_identifier_changes_nothing() {
    let harness = create_accessory(create_mock_settings(), None);

    assert!(harness.accessory.on_sensor_event("garage_light_state", b"on").is_none());

    let state = harness.accessory.state();
    assert_eq!(state.door_current_state, DoorCurrentState::Closed);
    assert_eq!(state.door_target_state, DoorTargetState::Closed);
    assert!(harness.surface.updates().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unrecognized_payload_only_refreshes() {
    let harness = create_accessory(create_mock_settings(), None);

    assert!(harness.accessory.on_sensor_event(DOOR_OPEN_SENSOR_STATE, b"ajar").is_none());

    let state = harness.accessory.state();
    assert_eq!(state.door_current_state, DoorCurrentState::Closed);
    assert_eq!(state.door_target_state, DoorTargetState::Closed);
    assert_eq!(
        harness.surface.updates(),
        vec![
            CharacteristicUpdate::DoorCurrentState(DoorCurrentState::Closed),
            CharacteristicUpdate::DoorTargetState(DoorTargetState::Closed),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_user_close_cancels_sensor_opening() {
    let mut settings = create_mock_settings();
    settings.open_duration = Some(10.0);
    settings.close_duration = Some(2.0);
    let harness = create_accessory(settings, None);

    harness.accessory.on_sensor_event(DOOR_OPEN_SENSOR_STATE, b"on");
    advance_ms(2_000).await;

    harness.accessory.set_door_target_state(DoorTargetState::Closed).await.unwrap();
    assert_eq!(harness.accessory.state().door_current_state, DoorCurrentState::Closing);
    assert_eq!(harness.dispatcher.sent(), vec![CLOSE_CODE.to_string()]);

    advance_ms(2_100).await;
    assert_eq!(harness.accessory.state().door_current_state, DoorCurrentState::Closed);

    advance_ms(10_000).await;
    let state = harness.accessory.state();
    assert_eq!(state.door_current_state, DoorCurrentState::Closed);
    assert_eq!(state.door_target_state, DoorTargetState::Closed);
    assert!(!harness.surface.saw(CharacteristicUpdate::DoorCurrentState(DoorCurrentState::Open)));
}
