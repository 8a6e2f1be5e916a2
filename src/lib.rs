//! Garage door accessory: a timed, cancellable model of a remotely actuated garage door and its lock.
//!
//! The door's position is never measured. It is inferred from elapsed time after each command
//! and from an optional door-open sensor feed.

pub mod config;
pub mod controllers;
pub mod errors;
pub mod event_handling;
pub mod init;
pub mod models;
pub mod services;
pub mod state_management;
pub mod utils;
