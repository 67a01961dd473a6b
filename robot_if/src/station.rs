//! # Simulated robot station
//!
//! [`SimStation`] stands in for a robot station: it owns the kinematic model
//! of the arm, tracks the commanded joint positions, and models the link to
//! the physical controller. The controller wire protocol is outside this
//! crate; whether a controller is attached comes from the station parameters.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{debug, trace};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

// Internal imports
use crate::ctrl::{ConnectionStatus, RobotControl, RobotError, RunMode};
use crate::kin::{Joints, KinProvider, OpwKin, Parameters};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters describing the robot station.
#[derive(Debug, Clone, Deserialize)]
pub struct StationParams {
    pub robot: RobotParams,
    pub controller: ControllerParams,
}

/// Parameters describing the arm in the station.
#[derive(Debug, Clone, Deserialize)]
pub struct RobotParams {
    /// Name of a built in robot model, for example `irb2400_10`. An empty
    /// string means no robot is loaded in the station.
    pub model: String,

    /// Joint positions at session start in radians.
    pub start_joints_rad: [f64; 6],

    /// Explicit OPW geometry, overriding `model` when given.
    pub opw: Option<OpwGeometry>,
}

/// Explicit OPW geometry for an arm not covered by the built in models.
///
/// Lengths in metres, angles in radians.
#[derive(Debug, Clone, Deserialize)]
pub struct OpwGeometry {
    pub a1: f64,
    pub a2: f64,
    pub b: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
    pub offsets_rad: [f64; 6],
    pub sign_corrections: [i8; 6],
}

/// Parameters describing the physical controller link.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerParams {
    /// True if a physical controller is attached to the station.
    pub attached: bool,

    /// Address of the controller, used in status reporting.
    pub address: String,
}

/// A simulated robot station.
pub struct SimStation {
    name: String,
    kin: Arc<OpwKin>,
    joints: Joints,
    run_mode: RunMode,
    controller_attached: bool,
    controller_address: String,
    connected: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised while building the station.
#[derive(Debug, Error)]
pub enum StationError {
    #[error("No robot is configured in the station")]
    NoRobotFound,

    #[error("Unknown robot model \"{0}\"")]
    UnknownModel(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimStation {
    /// Build the station from its parameters.
    ///
    /// Fails with [`StationError::NoRobotFound`] if the parameters do not
    /// select a robot.
    pub fn from_params(params: &StationParams) -> Result<Self, StationError> {
        let (name, geom) = match (&params.robot.opw, params.robot.model.as_str()) {
            (Some(geom), model) => {
                let name = if model.is_empty() { "custom" } else { model };
                (
                    name.to_string(),
                    Parameters {
                        a1: geom.a1,
                        a2: geom.a2,
                        b: geom.b,
                        c1: geom.c1,
                        c2: geom.c2,
                        c3: geom.c3,
                        c4: geom.c4,
                        offsets: geom.offsets_rad,
                        sign_corrections: geom.sign_corrections,
                        // Only six axis arms are modelled
                        dof: 6,
                    },
                )
            }
            (None, "") => return Err(StationError::NoRobotFound),
            (None, "irb2400_10") => ("irb2400_10".to_string(), Parameters::irb2400_10()),
            (None, "staubli_tx2_160l") => (
                "staubli_tx2_160l".to_string(),
                Parameters::staubli_tx2_160l(),
            ),
            (None, other) => return Err(StationError::UnknownModel(other.to_string())),
        };

        Ok(Self {
            name,
            kin: Arc::new(OpwKin::new(geom)),
            joints: params.robot.start_joints_rad,
            run_mode: RunMode::Simulate,
            controller_attached: params.controller.attached,
            controller_address: params.controller.address.clone(),
            connected: false,
        })
    }

    /// Get a shared handle on the station's kinematics.
    pub fn kin(&self) -> Arc<dyn KinProvider> {
        self.kin.clone()
    }
}

impl RobotControl for SimStation {
    fn name(&self) -> &str {
        &self.name
    }

    fn joints(&self) -> Joints {
        self.joints
    }

    fn move_joints(&mut self, target: &Joints) -> Result<(), RobotError> {
        // The simulated arm tracks demands instantly, there is no motion time
        trace!("Joint demand: {:?}", target);
        self.joints = *target;
        Ok(())
    }

    fn connect(&mut self) -> ConnectionStatus {
        self.connected = self.controller_attached;

        let (status, message) = self.connected_state();
        debug!("Controller connect attempt: {:?} ({})", status, message);
        status
    }

    fn connected_state(&self) -> (ConnectionStatus, String) {
        if self.connected {
            (
                ConnectionStatus::Ready,
                format!("Controller at {} ready", self.controller_address),
            )
        } else {
            (
                ConnectionStatus::NotConnected,
                format!("No controller responding at {}", self.controller_address),
            )
        }
    }

    fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    fn set_run_mode(&mut self, mode: RunMode) {
        debug!("Run mode set to {:?}", mode);
        self.run_mode = mode;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
