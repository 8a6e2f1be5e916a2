use std::time::Duration;
use async_trait::async_trait;
use tracing::info;
use crate::errors::GarageDoorResult;
use crate::models::HexCommand;

/// The transport that drives the IR/RF hardware.
///
/// The core only needs to know when a payload has been sent; how it gets to the device is up to the implementation.
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// Sends a single hex payload to the device
    ///
    /// # Arguments
    ///
    /// * `command`: The payload to transmit
    ///
    /// # Returns
    ///
    /// * `Ok(())` once the transport has acknowledged the send
    /// * `Err(GarageDoorError)` if the payload could not be delivered
    async fn perform_send(&self, command: &HexCommand) -> GarageDoorResult<()>;
}

/// A dry-run transport that logs each payload instead of transmitting it.
#[derive(Debug, Clone, Default)]
pub struct LoggingDispatcher {
    /// Accessory name used as the log prefix
    name: String,
    /// Simulated time the transport takes to acknowledge a send
    latency: Duration,
}

impl LoggingDispatcher {
    pub fn new(name: impl Into<String>, latency: Duration) -> Self {
        Self {
            name: name.into(),
            latency,
        }
    }
}

#[async_trait]
impl CommandDispatcher for LoggingDispatcher {
    async fn perform_send(&self, command: &HexCommand) -> GarageDoorResult<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        info!("{} sendData (dry run): {}", self.name, command);
        Ok(())
    }
}
