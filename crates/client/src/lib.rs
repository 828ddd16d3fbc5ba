//! Headless combat client.
//!
//! Composition root pieces for the `combat` binary: configuration, logging,
//! and an autopilot that stands in for a human player.
pub mod autopilot;
pub mod config;
pub mod logging;

pub use autopilot::AutoPilot;
pub use config::ClientConfig;
