//! # Jog Control Module
//!
//! This module plans the motion for a single jog step. A decoded movement
//! direction is turned into a Cartesian offset of the tool, the offset pose
//! is solved back into joint space, and the resulting joints are checked for
//! a posture change before any motion is allowed.
//!
//! The module implements [`util::module::State`]:
//! - `InitData`: [`InitData`], the parameter file name and kinematics handle
//! - `InputData`: [`InputData`], the direction and current joint positions
//! - `OutputData`: [`StepResult`], the outcome of planning the step

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use cmd::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default size of a single jog step in millimetres.
pub const DEFAULT_STEP_SIZE_MM: f64 = 10.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur during JogCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to load the parameter file: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Loaded parameters are invalid: {0}")]
    ParamsInvalid(ParamsError),
}

/// Errors which can occur during JogCtrl processing.
#[derive(Debug, thiserror::Error)]
pub enum JogCtrlError {
    #[error("The module must be initialised before it can plan a step")]
    NotInitialised,
}
