use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::errors::GarageDoorResult;
use crate::models::DoorAccessoryState;

/// Keeps the door/lock record in a JSON file between restarts.
#[derive(Debug, Clone)]
pub struct DoorStateRepository {
    path: PathBuf,
}

impl DoorStateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted record.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(state))` if a record was found
    /// * `Ok(None)` if nothing has been persisted yet
    /// * `Err(GarageDoorError)` if the file exists but cannot be read or parsed
    pub async fn load(&self) -> GarageDoorResult<Option<DoorAccessoryState>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No persisted door state at {:?}", self.path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_str(&contents)?;
        debug!("Loaded persisted door state: {:?}", state);
        Ok(Some(state))
    }

    /// Writes the record, creating parent directories as needed.
    pub async fn save(&self, state: &DoorAccessoryState) -> GarageDoorResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}
