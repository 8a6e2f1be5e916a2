pub mod dispatcher;
pub mod surface;

pub use dispatcher::{CommandDispatcher, LoggingDispatcher};
pub use surface::{ChannelSurface, StateSurface};
