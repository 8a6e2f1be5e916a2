use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::AccessorySettings;
use crate::errors::GarageDoorResult;
use crate::models::{AccessoryEvent, DoorAccessoryState, DoorTargetState, LockTargetState};
use crate::services::{CommandDispatcher, StateSurface};
use crate::state_management::{
    correct_reloaded_state, LockController, SensorReconciler, StateStore, TransitionScheduler
};

/// The garage door accessory: the door's timed state machine, its lock and the sensor feed, around one state record
pub struct GarageDoorAccessory {
    /// The accessory settings
    settings: AccessorySettings,
    /// The shared door/lock record
    store: Arc<StateStore>,
    /// Sequencing of open, close and auto-close
    scheduler: TransitionScheduler,
    /// Lock/unlock handling
    lock_controller: LockController,
    /// Door-open sensor handling
    sensor_reconciler: SensorReconciler,
}

impl GarageDoorAccessory {
    /// Creates a new `GarageDoorAccessory`
    ///
    /// The persisted state is passed through the reload correction before it becomes the live record.
    ///
    /// # Arguments
    ///
    /// * `settings`: The accessory settings
    /// * `dispatcher`: The transport used for every hex command
    /// * `surface`: Where characteristic changes are pushed
    /// * `persisted`: The state loaded from storage, if any
    pub fn new(
        settings: AccessorySettings,
        dispatcher: Arc<dyn CommandDispatcher>,
        surface: Arc<dyn StateSurface>,
        persisted: Option<DoorAccessoryState>,
    ) -> Self {
        let mut state = persisted.unwrap_or_default();
        if correct_reloaded_state(&mut state) {
            info!("{} corrected reloaded state to {:?}", settings.name, state);
        }

        let store = Arc::new(StateStore::new(state, surface));
        let scheduler = TransitionScheduler::new(settings.clone(), Arc::clone(&store), Arc::clone(&dispatcher));
        let lock_controller = LockController::new(
            settings.name.clone(),
            settings.data.clone(),
            Arc::clone(&store),
            dispatcher,
        );
        let sensor_reconciler = SensorReconciler::new(scheduler.clone());

        info!("Initializing garage door accessory {}", settings.name);
        Self {
            settings,
            store,
            scheduler,
            lock_controller,
            sensor_reconciler,
        }
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    /// A copy of the current door/lock record
    pub fn state(&self) -> DoorAccessoryState {
        self.store.snapshot()
    }

    pub fn scheduler(&self) -> &TransitionScheduler {
        &self.scheduler
    }

    /// Cancels any pending timed sequence
    pub fn reset(&self) {
        self.scheduler.reset();
    }

    /// Sets the door's target, using the recorded target as the previous value
    ///
    /// # Returns
    ///
    /// * `Ok(JoinHandle)` for the spawned timed sequence once the command has been sent
    /// * `Err(GarageDoorError)` if the command could not be sent
    pub async fn set_door_target_state(&self, target: DoorTargetState) -> GarageDoorResult<JoinHandle<()>> {
        let previous = self.store.door_target_state();
        self.scheduler.set_door_target_state(target, previous).await
    }

    pub async fn set_lock_target_state(&self, target: LockTargetState) -> GarageDoorResult<()> {
        self.lock_controller.set_lock_target_state(target).await
    }

    /// Handles one message from the sensor feed
    pub fn on_sensor_event(&self, identifier: &str, payload: &[u8]) -> Option<JoinHandle<()>> {
        self.sensor_reconciler.on_sensor_event(identifier, payload)
    }

    /// Routes an inbound event to the matching operation
    pub async fn handle_event(&self, event: AccessoryEvent) -> GarageDoorResult<()> {
        match event {
            AccessoryEvent::SetDoorTarget(target) => self.set_door_target_state(target).await.map(|_| ()),
            AccessoryEvent::SetLockTarget(target) => self.set_lock_target_state(target).await,
            AccessoryEvent::Sensor(sensor) => {
                self.on_sensor_event(&sensor.identifier, &sensor.payload);
                Ok(())
            }
        }
    }
}
