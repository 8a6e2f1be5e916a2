pub mod state_store;
pub mod cancellable_delay;
pub mod transition_scheduler;
pub mod lock_controller;
pub mod sensor_reconciler;
pub mod reload_corrector;
pub mod door_state_repository;

pub use state_store::StateStore;
pub use cancellable_delay::{CancellableDelay, DelayHandle};
pub use transition_scheduler::{ignore_cancellation, Phase, SequenceToken, TransitionScheduler};
pub use lock_controller::LockController;
pub use sensor_reconciler::SensorReconciler;
pub use reload_corrector::correct_reloaded_state;
pub use door_state_repository::DoorStateRepository;
