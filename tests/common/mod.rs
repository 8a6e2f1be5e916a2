#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use parking_lot::Mutex;

use garage_door_accessory::config::{AccessorySettings, CommandCodes};
use garage_door_accessory::controllers::GarageDoorAccessory;
use garage_door_accessory::errors::{GarageDoorError, GarageDoorResult};
use garage_door_accessory::models::{
    CharacteristicUpdate, DoorAccessoryState, DoorCurrentState, DoorTargetState, HexCommand,
    LockCurrentState, LockTargetState
};
use garage_door_accessory::services::{CommandDispatcher, StateSurface};
use garage_door_accessory::state_management::{StateStore, TransitionScheduler};

pub const OPEN_CODE: &str = "0a01";
pub const CLOSE_CODE: &str = "0a02";
pub const LOCK_CODE: &str = "0b01";
pub const UNLOCK_CODE: &str = "0b02";

/// Records every payload it is asked to send.
#[derive(Default)]
pub struct MockDispatcher {
    pub sent: Mutex<Vec<String>>,
    pub latency: Duration,
    pub fail: AtomicBool,
}

impl MockDispatcher {
    pub fn slow(latency: Duration) -> Self {
        Self { latency, ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { fail: AtomicBool::new(true), ..Self::default() }
    }

    /// Makes every later send fail.
    pub fn fail_from_now(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl CommandDispatcher for MockDispatcher {
    async fn perform_send(&self, command: &HexCommand) -> GarageDoorResult<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(GarageDoorError::DispatchError("device unreachable".to_string()));
        }
        self.sent.lock().push(command.as_str().to_string());
        Ok(())
    }
}

/// Records every surfaced characteristic update.
#[derive(Default)]
pub struct RecordingSurface {
    pub updates: Mutex<Vec<CharacteristicUpdate>>,
}

impl RecordingSurface {
    pub fn updates(&self) -> Vec<CharacteristicUpdate> {
        self.updates.lock().clone()
    }

    pub fn clear(&self) {
        self.updates.lock().clear();
    }

    pub fn saw(&self, update: CharacteristicUpdate) -> bool {
        self.updates.lock().contains(&update)
    }
}

impl StateSurface for RecordingSurface {
    fn refresh(&self, update: CharacteristicUpdate) {
        self.updates.lock().push(update);
    }
}

pub fn create_mock_settings() -> AccessorySettings {
    AccessorySettings {
        name: "Test Garage".to_string(),
        open_duration: None,
        close_duration: None,
        open_close_duration: None,
        auto_close_delay: None,
        send_latency_ms: 0,
        data: CommandCodes {
            open: HexCommand::new(OPEN_CODE).unwrap(),
            close: HexCommand::new(CLOSE_CODE).unwrap(),
            lock: Some(HexCommand::new(LOCK_CODE).unwrap()),
            unlock: Some(HexCommand::new(UNLOCK_CODE).unwrap()),
        },
    }
}

pub fn door_state(current: DoorCurrentState, target: DoorTargetState) -> DoorAccessoryState {
    DoorAccessoryState::new(current, target, LockCurrentState::Secured, LockTargetState::Secured)
}

pub struct Harness {
    pub accessory: GarageDoorAccessory,
    pub dispatcher: Arc<MockDispatcher>,
    pub surface: Arc<RecordingSurface>,
}

pub fn create_accessory(settings: AccessorySettings, persisted: Option<DoorAccessoryState>) -> Harness {
    create_accessory_with(settings, persisted, MockDispatcher::default())
}

pub fn create_accessory_with(
    settings: AccessorySettings,
    persisted: Option<DoorAccessoryState>,
    dispatcher: MockDispatcher,
) -> Harness {
    let dispatcher = Arc::new(dispatcher);
    let surface = Arc::new(RecordingSurface::default());
    let accessory = GarageDoorAccessory::new(settings, dispatcher.clone(), surface.clone(), persisted);
    Harness { accessory, dispatcher, surface }
}

/// A scheduler over a store holding exactly `state`, bypassing reload correction.
pub fn create_scheduler(
    settings: AccessorySettings,
    state: DoorAccessoryState,
    dispatcher: MockDispatcher,
) -> (TransitionScheduler, Arc<MockDispatcher>, Arc<RecordingSurface>) {
    let dispatcher = Arc::new(dispatcher);
    let surface = Arc::new(RecordingSurface::default());
    let store = Arc::new(StateStore::new(state, surface.clone()));
    let scheduler = TransitionScheduler::new(settings, store, dispatcher.clone());
    (scheduler, dispatcher, surface)
}

/// Lets the paused clock run forward.
pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
