pub mod idoor;
pub mod istates;
pub mod ievents;
pub mod icommand;

pub use idoor::*;
pub use istates::*;
pub use ievents::*;
pub use icommand::*;
