//! Parameters for the motion driver module.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::{ParamsError, DEFAULT_UPDATE_INTERVAL};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the motion driver.
#[derive(Clone, Debug, Deserialize)]
pub struct Params {
    /// True to periodically synchronise an attached physical controller
    /// with the commanded position.
    pub live_sync_enabled: bool,

    /// Number of accepted steps between synchronisations.
    pub update_interval: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the loaded values are usable.
    pub fn are_valid(&self) -> Result<(), ParamsError> {
        if self.live_sync_enabled && self.update_interval == 0 {
            Err(ParamsError::ZeroUpdateInterval)
        } else {
            Ok(())
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Params {
            live_sync_enabled: false,
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }
}
