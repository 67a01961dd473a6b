//! Implementation of the motion driver.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};

use super::{DispatchError, Params, ParamsError};
use robot_if::ctrl::{ConnectionStatus, RobotControl, RunMode};
use robot_if::kin::{fmt_joints_deg, Joints};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Dispatches planned joint targets to the robot.
pub struct MotionDriver {
    params: Params,

    robot: Box<dyn RobotControl>,

    /// Number of accepted steps since the last synchronisation.
    steps_since_sync: u32,

    /// The last target dispatched, replayed during synchronisation.
    last_target: Option<Joints>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionDriver {
    /// Create a new driver around the given robot handle.
    pub fn new(params: &Params, robot: Box<dyn RobotControl>) -> Result<Self, ParamsError> {
        params.are_valid()?;

        Ok(MotionDriver {
            params: params.clone(),
            robot,
            steps_since_sync: 0,
            last_target: None,
        })
    }

    /// Name of the robot being driven.
    pub fn robot_name(&self) -> &str {
        self.robot.name()
    }

    /// Current joint positions of the robot.
    ///
    /// Units: radians
    pub fn robot_joints(&self) -> Joints {
        self.robot.joints()
    }

    /// Issue one planned joint move.
    ///
    /// With live sync enabled the physical controller is synchronised once
    /// every `update_interval` accepted steps. Any error is fatal and the
    /// caller must stop issuing motion.
    pub fn dispatch(&mut self, target: &Joints) -> Result<(), DispatchError> {
        self.robot.move_joints(target)?;
        self.last_target = Some(*target);

        if self.params.live_sync_enabled {
            self.steps_since_sync += 1;

            if self.steps_since_sync >= self.params.update_interval {
                self.sync_controller()?;
                self.steps_since_sync = 0;
            }
        }

        Ok(())
    }

    /// Bring the physical controller in line with the last commanded
    /// position.
    ///
    /// A single connection attempt is made, with no retries. On success the
    /// run mode is switched to the real robot just long enough to replay the
    /// last target, then returned to simulation. Whether the arm has
    /// finished the motion is not verified.
    fn sync_controller(&mut self) -> Result<(), DispatchError> {
        // Connecting is only allowed from simulate mode
        if self.robot.run_mode() != RunMode::Simulate {
            debug!(
                "Skipping controller sync, run mode is {:?}",
                self.robot.run_mode()
            );
            return Ok(());
        }

        info!("Synchronising the controller with the commanded position");

        if self.robot.connect() != ConnectionStatus::Ready {
            let (_, message) = self.robot.connected_state();
            return Err(DispatchError::ConnectionFailed(message));
        }

        self.robot.set_run_mode(RunMode::RunOnRobot);

        if let Some(target) = self.last_target {
            self.robot.move_joints(&target)?;
            debug!("Replayed target {} on the robot", fmt_joints_deg(&target));
        }

        self.robot.set_run_mode(RunMode::Simulate);

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::super::mock::MockRobot;
    use super::*;

    fn driver(
        live_sync_enabled: bool,
        update_interval: u32,
        robot: MockRobot,
    ) -> MotionDriver {
        let params = Params {
            live_sync_enabled,
            update_interval,
        };

        MotionDriver::new(&params, Box::new(robot)).unwrap()
    }

    fn target(value: f64) -> Joints {
        [value; 6]
    }

    #[test]
    fn test_dispatch_without_live_sync() {
        let (robot, log) = MockRobot::new(ConnectionStatus::Ready);
        let mut driver = driver(false, 1, robot);

        for i in 0..25 {
            driver.dispatch(&target(i as f64)).unwrap();
        }

        let log = log.lock().unwrap();
        assert_eq!(log.moves.len(), 25);
        assert_eq!(log.connects, 0);
        assert!(log.mode_changes.is_empty());
    }

    #[test]
    fn test_sync_after_interval() {
        let (robot, log) = MockRobot::new(ConnectionStatus::Ready);
        let mut driver = driver(true, 3, robot);

        driver.dispatch(&target(0.1)).unwrap();
        driver.dispatch(&target(0.2)).unwrap();
        assert_eq!(log.lock().unwrap().connects, 0);

        // The third accepted step triggers the sync: one connection, the
        // last target replayed, and the mode restored to simulation
        driver.dispatch(&target(0.3)).unwrap();

        {
            let log = log.lock().unwrap();
            assert_eq!(log.connects, 1);
            assert_eq!(
                log.moves,
                vec![target(0.1), target(0.2), target(0.3), target(0.3)]
            );
            assert_eq!(
                log.mode_changes,
                vec![RunMode::RunOnRobot, RunMode::Simulate]
            );
        }

        // The counter restarts after a sync
        driver.dispatch(&target(0.4)).unwrap();
        driver.dispatch(&target(0.5)).unwrap();
        assert_eq!(log.lock().unwrap().connects, 1);
        driver.dispatch(&target(0.6)).unwrap();
        assert_eq!(log.lock().unwrap().connects, 2);
    }

    #[test]
    fn test_sync_connect_failure_is_fatal() {
        let (robot, log) = MockRobot::new(ConnectionStatus::NotConnected);
        let mut driver = driver(true, 2, robot);

        driver.dispatch(&target(0.1)).unwrap();

        let result = driver.dispatch(&target(0.2));

        match result {
            Err(DispatchError::ConnectionFailed(message)) => {
                assert_eq!(message, "scripted status")
            }
            other => panic!("expected a connection failure, got {:?}", other),
        }

        // The mode was never switched away from simulation
        let log = log.lock().unwrap();
        assert!(log.mode_changes.is_empty());
        assert_eq!(log.connects, 1);
        assert_eq!(log.moves.len(), 2);
    }

    #[test]
    fn test_sync_skipped_outside_simulate_mode() {
        let (mut robot, log) = MockRobot::new(ConnectionStatus::Ready);
        robot.run_mode = RunMode::RunOnRobot;
        let mut driver = driver(true, 2, robot);

        for i in 0..6 {
            driver.dispatch(&target(i as f64)).unwrap();
        }

        // No connection attempts were made, and no replays happened
        let log = log.lock().unwrap();
        assert_eq!(log.connects, 0);
        assert_eq!(log.moves.len(), 6);
        assert!(log.mode_changes.is_empty());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let (robot, _log) = MockRobot::new(ConnectionStatus::Ready);
        let params = Params {
            live_sync_enabled: true,
            update_interval: 0,
        };

        assert!(MotionDriver::new(&params, Box::new(robot)).is_err());
    }
}
