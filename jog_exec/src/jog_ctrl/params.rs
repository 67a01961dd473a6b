//! Parameters for the jog control module.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::DEFAULT_STEP_SIZE_MM;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for JogCtrl.
#[derive(Clone, Debug, Deserialize)]
pub struct Params {
    /// Size of the Cartesian step taken for a single key press.
    ///
    /// Units: millimetres
    pub step_size_mm: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors in the parameter values themselves.
#[derive(Clone, Copy, Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("step_size_mm must be positive, got {0}")]
    NonPositiveStepSize(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the loaded values are usable.
    pub fn are_valid(&self) -> Result<(), ParamsError> {
        if self.step_size_mm > 0.0 {
            Ok(())
        } else {
            Err(ParamsError::NonPositiveStepSize(self.step_size_mm))
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Params {
            step_size_mm: DEFAULT_STEP_SIZE_MM,
        }
    }
}
