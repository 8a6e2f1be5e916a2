use std::sync::Arc;
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use crate::config::Settings;
use crate::controllers::GarageDoorAccessory;
use crate::event_handling::EventHandler;
use crate::services::{ChannelSurface, LoggingDispatcher};
use crate::state_management::DoorStateRepository;
use crate::utils::logging;


pub struct AppContext {
    pub settings: Arc<Settings>,
    pub accessory: Arc<GarageDoorAccessory>,
    pub event_handler: EventHandler,
    /// Keeps the log file writer alive for the life of the process
    pub log_guard: Option<WorkerGuard>,
}

pub async fn initialize() -> Result<AppContext> {
    let settings = Arc::new(Settings::new()?);
    let log_guard = logging::init_logger(
        settings.logging.path.clone(),
        settings.logging.level.as_deref(),
    )?;

    let repository = settings.persistence.path.clone().map(DoorStateRepository::new);
    let persisted = match &repository {
        Some(repository) => repository.load().await
            .map_err(|e| anyhow::anyhow!("Failed to load persisted state from {:?}: {}", repository.path(), e))?,
        None => None,
    };

    let accessory_settings = settings.accessory.clone();
    let dispatcher = Arc::new(LoggingDispatcher::new(
        accessory_settings.name.clone(),
        accessory_settings.send_latency(),
    ));
    let (surface, updates) = ChannelSurface::new();

    let accessory = Arc::new(GarageDoorAccessory::new(
        accessory_settings,
        dispatcher,
        Arc::new(surface),
        persisted,
    ));

    if let Some(repository) = &repository {
        repository.save(&accessory.state()).await?;
    }

    let event_handler = EventHandler::new(
        accessory.name().to_string(),
        updates,
        accessory.state(),
        repository,
    );

    Ok(AppContext {
        settings,
        accessory,
        event_handler,
        log_guard,
    })
}
