use tokio::sync::mpsc;
use tracing::error;
use crate::models::CharacteristicUpdate;

/// The outbound side of the accessory: every characteristic the core changes is pushed through here.
///
/// `refresh` may run while the scheduler holds its slot lock, so implementations must not
/// block or call back into the accessory.
pub trait StateSurface: Send + Sync {
    fn refresh(&self, update: CharacteristicUpdate);
}

/// Forwards updates over an unbounded channel to the `EventHandler`.
#[derive(Debug, Clone)]
pub struct ChannelSurface {
    sender: mpsc::UnboundedSender<CharacteristicUpdate>,
}

impl ChannelSurface {
    /// Creates a surface and the receiver its updates arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CharacteristicUpdate>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl StateSurface for ChannelSurface {
    fn refresh(&self, update: CharacteristicUpdate) {
        if let Err(e) = self.sender.send(update) {
            error!("Failed to surface characteristic update: {:?}", e);
        }
    }
}
