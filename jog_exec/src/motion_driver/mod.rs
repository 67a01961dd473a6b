//! # Motion Driver Module
//!
//! The motion driver owns the robot control handle and issues the joint
//! targets planned by JogCtrl. When live synchronisation is enabled it
//! periodically connects to the physical controller and replays the last
//! commanded position, so an attached arm catches up with the simulated one
//! without slowing the jog loop down on every step.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod driver;
#[cfg(test)]
pub(crate) mod mock;
mod params;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use driver::*;
pub use params::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default number of accepted steps between controller synchronisations.
pub const DEFAULT_UPDATE_INTERVAL: u32 = 12;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors in the parameter values themselves.
#[derive(Clone, Copy, Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("update_interval must be at least 1 when live sync is enabled")]
    ZeroUpdateInterval,
}

/// Errors which can occur while dispatching motion.
///
/// All of these are fatal: motion must not continue past a robot which has
/// rejected a target or a controller which cannot be reached.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to connect to the robot controller: {0}")]
    ConnectionFailed(String),

    #[error("Motion command failed: {0}")]
    MoveFailed(#[from] robot_if::ctrl::RobotError),
}
