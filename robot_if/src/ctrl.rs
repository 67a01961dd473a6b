//! # Robot control provider interface
//!
//! Defines the control surface offered by a robot station: issuing joint
//! moves, reading the current joints, and managing the link to a physical
//! controller.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Internal imports
use crate::kin::Joints;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Whether dispatched motions drive the simulation only or a live controller
/// as well.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Motions only drive the simulated station.
    Simulate,

    /// Motions are forwarded to the physical controller.
    RunOnRobot,
}

/// State of the link to the physical robot controller.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The controller is connected and ready to accept motions.
    Ready,

    /// No connection to the controller.
    NotConnected,

    /// The controller is connected but reporting problems.
    Problems,
}

/// Errors surfaced by a robot control provider.
#[derive(Debug, Error)]
pub enum RobotError {
    #[error("The robot controller is not connected: {0}")]
    NotConnected(String),

    #[error("The motion target was rejected by the controller: {0}")]
    TargetRejected(String),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Control capability offered by a robot station.
///
/// The trait is object safe so that an executable can hold the station as a
/// `Box<dyn RobotControl>` and hand it to whichever task drives the motions.
pub trait RobotControl: Send {
    /// Name of the robot under control.
    fn name(&self) -> &str;

    /// Current joint positions in radians.
    fn joints(&self) -> Joints;

    /// Command a joint space move to the target.
    fn move_joints(&mut self, target: &Joints) -> Result<(), RobotError>;

    /// Attempt one connection to the physical controller, returning the
    /// resulting status.
    ///
    /// # Notes
    /// - No retries are made and no timeout is applied, so the call may
    ///   block indefinitely on an unresponsive controller.
    fn connect(&mut self) -> ConnectionStatus;

    /// Status of the controller link and a human readable status message.
    fn connected_state(&self) -> (ConnectionStatus, String);

    /// The current run mode.
    fn run_mode(&self) -> RunMode;

    /// Set the run mode.
    fn set_run_mode(&mut self, mode: RunMode);
}
