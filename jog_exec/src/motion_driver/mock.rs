//! Scripted robot control used by the unit tests.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::{Arc, Mutex};

use robot_if::ctrl::{ConnectionStatus, RobotControl, RobotError, RunMode};
use robot_if::kin::Joints;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Record of everything a [`MockRobot`] was asked to do.
#[derive(Default)]
pub struct RobotLog {
    pub moves: Vec<Joints>,
    pub connects: usize,
    pub mode_changes: Vec<RunMode>,
}

/// Robot control implementation with a scripted connection outcome.
pub struct MockRobot {
    pub log: Arc<Mutex<RobotLog>>,
    pub joints: Joints,
    pub run_mode: RunMode,
    pub connect_status: ConnectionStatus,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MockRobot {
    /// Create a mock whose connection attempts always yield the given
    /// status. Returns the mock and a handle onto its log.
    pub fn new(connect_status: ConnectionStatus) -> (Self, Arc<Mutex<RobotLog>>) {
        let log = Arc::new(Mutex::new(RobotLog::default()));

        let robot = MockRobot {
            log: log.clone(),
            joints: [0.0; 6],
            run_mode: RunMode::Simulate,
            connect_status,
        };

        (robot, log)
    }
}

impl RobotControl for MockRobot {
    fn name(&self) -> &str {
        "mock"
    }

    fn joints(&self) -> Joints {
        self.joints
    }

    fn move_joints(&mut self, target: &Joints) -> Result<(), RobotError> {
        self.joints = *target;
        self.log.lock().unwrap().moves.push(*target);
        Ok(())
    }

    fn connect(&mut self) -> ConnectionStatus {
        self.log.lock().unwrap().connects += 1;
        self.connect_status
    }

    fn connected_state(&self) -> (ConnectionStatus, String) {
        (self.connect_status, String::from("scripted status"))
    }

    fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    fn set_run_mode(&mut self, mode: RunMode) {
        self.run_mode = mode;
        self.log.lock().unwrap().mode_changes.push(mode);
    }
}
