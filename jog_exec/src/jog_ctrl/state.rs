//! Implementation of the jog planning state machine.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::Arc;

use nalgebra::Translation3;

use super::*;
use robot_if::kin::{Joints, KinProvider, Posture};
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Jog control module state.
#[derive(Default)]
pub struct JogCtrl {
    params: Params,

    kin: Option<Arc<dyn KinProvider>>,

    report: StatusReport,
}

/// Data required to initialise the module.
pub struct InitData {
    /// Name of the parameter file to load, for example `jog_ctrl.toml`.
    pub params_file: &'static str,

    /// Kinematics provider for the arm being jogged.
    pub kin: Arc<dyn KinProvider>,
}

/// Input data for planning a single step.
pub struct InputData {
    /// The movement direction decoded from the last key press.
    pub direction: MoveDirection,

    /// Current joint positions of the arm.
    ///
    /// Units: radians
    pub current_joints: Joints,
}

/// Status report produced alongside each planned step.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusReport {
    /// Posture of the arm at the current joints, if classified this cycle.
    pub current_posture: Option<Posture>,

    /// Posture of the arm at the planned target joints, if a target was
    /// found this cycle.
    pub target_posture: Option<Posture>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Outcome of planning a single jog step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepResult {
    /// No movement was requested, nothing to plan. This is the normal
    /// outcome for a key with no jog binding.
    NoOp,

    /// The target pose has no complete joint solution, no motion may be
    /// issued for this step.
    Unreachable,

    /// The target is reachable without leaving the current posture.
    Reachable(Joints),

    /// The target is reachable, but only by changing posture. Motion may
    /// proceed, however a large joint movement is possible and the operator
    /// must be warned.
    PostureChange(Joints),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl StepResult {
    /// The joint target this step may move to, if any.
    pub fn target(&self) -> Option<Joints> {
        match self {
            StepResult::Reachable(joints) | StepResult::PostureChange(joints) => Some(*joints),
            _ => None,
        }
    }
}

impl JogCtrl {
    /// Build a planner directly from parameters, bypassing the file load.
    #[cfg(test)]
    pub(crate) fn with_params(params: Params, kin: Arc<dyn KinProvider>) -> Self {
        JogCtrl {
            params,
            kin: Some(kin),
            report: StatusReport::default(),
        }
    }
}

impl State for JogCtrl {
    type InitData = InitData;
    type InitError = InitError;

    type InputData = InputData;
    type OutputData = StepResult;
    type StatusReport = StatusReport;
    type ProcError = JogCtrlError;

    /// Initialise the module by loading the parameter file and taking the
    /// kinematics handle.
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), InitError> {
        self.params = match params::load(init_data.params_file) {
            Ok(p) => p,
            Err(e) => return Err(InitError::ParamLoadError(e)),
        };

        if let Err(e) = self.params.are_valid() {
            return Err(InitError::ParamsInvalid(e));
        }

        self.kin = Some(init_data.kin);

        Ok(())
    }

    /// Plan a single jog step.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), JogCtrlError> {
        self.report = StatusReport::default();

        // The zero direction is the idle case, skip the step without
        // touching the kinematics
        if input_data.direction.is_zero() {
            return Ok((StepResult::NoOp, self.report));
        }

        let kin = match &self.kin {
            Some(k) => k,
            None => return Err(JogCtrlError::NotInitialised),
        };

        // Pose and posture the arm is currently at
        let current_pose = kin.solve_fk(&input_data.current_joints);
        let current_posture = kin.posture(&input_data.current_joints);
        self.report.current_posture = Some(current_posture);

        // Offset the pose along the requested axis of the base frame. The
        // tool orientation is left untouched.
        let offset = input_data.direction.offset_m(self.params.step_size_mm);
        let target_pose = Translation3::from(offset) * current_pose;

        // Solve for joints reaching the target, seeded with the current
        // joints so the closest solution comes first
        let solutions = kin.solve_ik(&target_pose, &input_data.current_joints);

        let target_joints = match solutions.first() {
            Some(joints) => *joints,
            None => return Ok((StepResult::Unreachable, self.report)),
        };

        let target_posture = kin.posture(&target_joints);
        self.report.target_posture = Some(target_posture);

        if target_posture == current_posture {
            Ok((StepResult::Reachable(target_joints), self.report))
        } else {
            Ok((StepResult::PostureChange(target_joints), self.report))
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use nalgebra::Vector3;

    use super::*;
    use robot_if::kin::{Pose, Solutions};

    /// Kinematics provider with scripted responses.
    ///
    /// The forward pose and inverse solutions are fixed, and the posture is
    /// derived from the sign of the fifth joint so that tests can force a
    /// posture change just by choosing the scripted solution.
    struct MockKin {
        fk_pose: Pose,
        ik_solutions: Solutions,
        fk_calls: Mutex<u32>,
        ik_poses: Mutex<Vec<Pose>>,
    }

    impl MockKin {
        fn new(fk_pose: Pose, ik_solutions: Solutions) -> Self {
            MockKin {
                fk_pose,
                ik_solutions,
                fk_calls: Mutex::new(0),
                ik_poses: Mutex::new(Vec::new()),
            }
        }
    }

    impl KinProvider for MockKin {
        fn solve_fk(&self, _joints: &Joints) -> Pose {
            *self.fk_calls.lock().unwrap() += 1;
            self.fk_pose
        }

        fn solve_ik(&self, pose: &Pose, _seed: &Joints) -> Solutions {
            self.ik_poses.lock().unwrap().push(*pose);
            self.ik_solutions.clone()
        }

        fn posture(&self, joints: &Joints) -> Posture {
            Posture {
                rear: false,
                lower: false,
                flip: joints[4] < 0.0,
            }
        }
    }

    fn planner(kin: Arc<MockKin>) -> JogCtrl {
        JogCtrl::with_params(Params { step_size_mm: 10.0 }, kin)
    }

    const X_PLUS: MoveDirection = MoveDirection { x: 1, y: 0, z: 0 };

    #[test]
    fn test_zero_direction_is_noop() {
        let kin = Arc::new(MockKin::new(Pose::identity(), vec![[0.0; 6]]));
        let mut jog = planner(kin.clone());

        let (result, report) = jog
            .proc(&InputData {
                direction: MoveDirection::ZERO,
                current_joints: [0.1; 6],
            })
            .unwrap();

        assert_eq!(result, StepResult::NoOp);
        assert!(report.current_posture.is_none());
        assert!(report.target_posture.is_none());

        // The kinematics must not have been consulted at all
        assert_eq!(*kin.fk_calls.lock().unwrap(), 0);
        assert!(kin.ik_poses.lock().unwrap().is_empty());
    }

    #[test]
    fn test_step_premultiplies_the_current_pose() {
        let fk_pose = Pose::new(Vector3::new(0.5, 0.2, 0.3), Vector3::new(0.0, 1.2, 0.0));
        let kin = Arc::new(MockKin::new(fk_pose, vec![[0.0; 6]]));
        let mut jog = planner(kin.clone());

        let (result, _) = jog
            .proc(&InputData {
                direction: X_PLUS,
                current_joints: [0.0; 6],
            })
            .unwrap();

        assert!(matches!(result, StepResult::Reachable(_)));

        // The offset is applied in the base frame: the translation shifts by
        // one step along X while the orientation is unchanged
        let captured = kin.ik_poses.lock().unwrap();
        assert_eq!(captured.len(), 1);

        let expected_translation = fk_pose.translation.vector + Vector3::new(0.010, 0.0, 0.0);
        assert!((captured[0].translation.vector - expected_translation).norm() < 1e-12);
        assert!(captured[0].rotation.angle_to(&fk_pose.rotation) < 1e-12);
    }

    #[test]
    fn test_unreachable_when_no_solutions() {
        let kin = Arc::new(MockKin::new(Pose::identity(), Vec::new()));
        let mut jog = planner(kin);

        let (result, report) = jog
            .proc(&InputData {
                direction: X_PLUS,
                current_joints: [0.0; 6],
            })
            .unwrap();

        assert_eq!(result, StepResult::Unreachable);
        assert!(report.current_posture.is_some());
        assert!(report.target_posture.is_none());
        assert!(result.target().is_none());
    }

    #[test]
    fn test_posture_change_flagged() {
        let solution = [0.0, 0.0, 0.0, 0.0, -0.1, 0.0];
        let kin = Arc::new(MockKin::new(Pose::identity(), vec![solution]));
        let mut jog = planner(kin);

        let (result, report) = jog
            .proc(&InputData {
                direction: X_PLUS,
                current_joints: [0.0, 0.0, 0.0, 0.0, 0.1, 0.0],
            })
            .unwrap();

        assert_eq!(result, StepResult::PostureChange(solution));
        assert_eq!(result.target(), Some(solution));

        let current = report.current_posture.unwrap();
        let target = report.target_posture.unwrap();
        assert!(!current.flip);
        assert!(target.flip);
    }

    #[test]
    fn test_same_posture_is_reachable() {
        let solution = [0.0, 0.0, 0.0, 0.0, 0.2, 0.0];
        let kin = Arc::new(MockKin::new(Pose::identity(), vec![solution]));
        let mut jog = planner(kin);

        let (result, report) = jog
            .proc(&InputData {
                direction: X_PLUS,
                current_joints: [0.0, 0.0, 0.0, 0.0, 0.1, 0.0],
            })
            .unwrap();

        assert_eq!(result, StepResult::Reachable(solution));
        assert_eq!(report.current_posture.unwrap(), report.target_posture.unwrap());
    }

    #[test]
    fn test_proc_without_init() {
        let mut jog = JogCtrl::default();

        // The zero direction short circuits before the kinematics handle is
        // needed
        let (result, _) = jog
            .proc(&InputData {
                direction: MoveDirection::ZERO,
                current_joints: [0.0; 6],
            })
            .unwrap();
        assert_eq!(result, StepResult::NoOp);

        let error = jog.proc(&InputData {
            direction: X_PLUS,
            current_joints: [0.0; 6],
        });
        assert!(matches!(error, Err(JogCtrlError::NotInitialised)));
    }
}
