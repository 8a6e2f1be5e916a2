use tokio::task::JoinHandle;
use crate::errors::GarageDoorError;
use tracing::{debug, error, info, warn};
use crate::models::{Characteristic, DoorCurrentState, DoorTargetState, DOOR_OPEN_SENSOR_STATE};
use crate::state_management::transition_scheduler::{Phase, TransitionScheduler};

/// Reconciles the door state with the door-open sensor feed.
///
/// The sensor is ground truth: a message that changes the state first resets the scheduler, so a
/// superseded command sequence can never overwrite what the sensor reported. The sensor's own
/// opening delay lives in the scheduler's opening slot, so a later user command cancels it in turn.
#[derive(Clone)]
pub struct SensorReconciler {
    scheduler: TransitionScheduler,
}

impl SensorReconciler {
    pub fn new(scheduler: TransitionScheduler) -> Self {
        Self { scheduler }
    }

    /// Handles one message from the sensor feed.
    ///
    /// * `on` while the door is not open, opening or targeted open: target and current move to
    ///   open/opening now and current becomes open after the opening duration.
    /// * `off`: current and target become closed immediately.
    ///
    /// Messages on any other identifier are logged and ignored.
    ///
    /// # Returns
    ///
    /// The handle of the spawned opening sequence, if one was started.
    pub fn on_sensor_event(&self, identifier: &str, payload: &[u8]) -> Option<JoinHandle<()>> {
        let name = &self.scheduler.settings().name;
        let message = String::from_utf8_lossy(payload);
        let message = message.trim();

        if identifier != DOOR_OPEN_SENSOR_STATE {
            error!("{} onSensorEvent (message received with unexpected identifier: {}, {})", name, identifier, message);
            return None;
        }

        info!("{} onSensorEvent (message received: {}, {})", name, identifier, message);

        let opening = match message {
            "on" => self.handle_open_signal(),
            "off" => {
                self.handle_closed_signal();
                None
            }
            other => {
                warn!("{} ignoring door sensor payload: {:?}", name, other);
                None
            }
        };

        let store = self.scheduler.store();
        store.refresh(Characteristic::DoorCurrentState);
        store.refresh(Characteristic::DoorTargetState);
        opening
    }

    fn handle_open_signal(&self) -> Option<JoinHandle<()>> {
        let state = self.scheduler.store().snapshot();
        if matches!(state.door_current_state, DoorCurrentState::Open | DoorCurrentState::Opening)
            || state.door_target_state == DoorTargetState::Open
        {
            debug!("{} door already open or opening; sensor message changes nothing", self.scheduler.settings().name);
            return None;
        }

        let token = self.scheduler.reset();
        self.scheduler.store().set_door_target_state(DoorTargetState::Open);
        let opening = self.scheduler.begin(
            token,
            Phase::Opening,
            DoorCurrentState::Opening,
            self.scheduler.settings().open_duration(),
        );

        let scheduler = self.scheduler.clone();
        Some(self.scheduler.spawn_sequence(async move {
            opening?.wait().await?;
            scheduler.commit(token, Phase::Opening, |store| {
                store.set_door_current_state(DoorCurrentState::Open);
                store.set_door_target_state(DoorTargetState::Open);
            })?;
            info!("{} setDoorCurrentState: {}", scheduler.settings().name, DoorCurrentState::Open);
            Ok::<(), GarageDoorError>(())
        }))
    }

    fn handle_closed_signal(&self) {
        self.scheduler.reset();
        info!("{} setDoorCurrentState: {}", self.scheduler.settings().name, DoorCurrentState::Closed);
        let store = self.scheduler.store();
        store.set_door_current_state(DoorCurrentState::Closed);
        store.set_door_target_state(DoorTargetState::Closed);
    }
}
