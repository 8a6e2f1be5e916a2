use tokio::sync::mpsc;
use tracing::{info, error, debug};
use crate::models::{CharacteristicUpdate, DoorAccessoryState};
use crate::errors::GarageDoorResult;
use crate::state_management::DoorStateRepository;

/// The EventHandler consumes the characteristic updates the accessory surfaces.
///
/// It mirrors them into its own copy of the record and, when a repository is configured,
/// persists the record after every update.
pub struct EventHandler {
    /// Accessory name used as the log prefix.
    name: String,
    /// The receiver end of the surface channel.
    updates: mpsc::UnboundedReceiver<CharacteristicUpdate>,
    /// The record as last surfaced.
    mirror: DoorAccessoryState,
    /// Where the record is persisted, if anywhere.
    repository: Option<DoorStateRepository>,
}

impl EventHandler {
    /// Creates a new `EventHandler`.
    ///
    /// # Arguments
    ///
    /// * `name` - Accessory name used in log lines.
    /// * `updates` - The receiver end of a `ChannelSurface`.
    /// * `initial` - The record the accessory started with.
    /// * `repository` - Optional persistence for the record.
    pub fn new(
        name: impl Into<String>,
        updates: mpsc::UnboundedReceiver<CharacteristicUpdate>,
        initial: DoorAccessoryState,
        repository: Option<DoorStateRepository>,
    ) -> Self {
        Self {
            name: name.into(),
            updates,
            mirror: initial,
            repository,
        }
    }

    /// The record as last surfaced.
    pub fn mirror(&self) -> DoorAccessoryState {
        self.mirror
    }

    /// Processes updates until every sender has been dropped.
    pub async fn run(mut self) -> GarageDoorResult<DoorAccessoryState> {
        info!("EventHandler started");
        while let Some(update) = self.updates.recv().await {
            if let Err(e) = self.process_update(update).await {
                error!("Error processing characteristic update: {:?}", e);
            }
        }
        info!("EventHandler stopped");
        Ok(self.mirror)
    }

    /// Applies one update to the mirror and persists the result.
    pub async fn process_update(&mut self, update: CharacteristicUpdate) -> GarageDoorResult<()> {
        info!("{} {} -> {}", self.name, update.characteristic(), update.value());
        let before = self.mirror;
        self.mirror.apply(update);

        if self.mirror == before {
            debug!("{} refresh without change; nothing to persist", self.name);
            return Ok(());
        }
        if let Some(repository) = &self.repository {
            repository.save(&self.mirror).await?;
        }
        Ok(())
    }
}
