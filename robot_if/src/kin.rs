//! # Kinematics provider interface
//!
//! The jog planner consumes kinematics as an external capability: forward
//! kinematics, inverse kinematics and posture classification. The actual
//! solving is delegated to the `rs-opw-kinematics` crate, which covers the
//! common family of six axis industrial arms with a spherical wrist.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use nalgebra::Point3;
use rs_opw_kinematics::kinematic_traits::Kinematics;
use rs_opw_kinematics::kinematics_impl::OPWKinematics;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

// Re-exports
pub use rs_opw_kinematics::kinematic_traits::{Joints, Pose, Solutions};
pub use rs_opw_kinematics::parameters::opw_kinematics::Parameters;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Posture branch flags for a joint solution.
///
/// A six axis arm generally reaches a single Cartesian pose with several
/// distinct joint solutions. The flags label which branch a solution belongs
/// to, so that two solutions for nearby poses can be compared: a change of
/// branch between consecutive jog steps means a large joint motion even
/// though the Cartesian step was small.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Posture {
    /// Shoulder flag, set when the wrist centre lies behind the joint 1 axis.
    pub rear: bool,

    /// Elbow flag, set when joint 3 is below the straight elbow boundary.
    pub lower: bool,

    /// Wrist flag, set when joint 5 is negative.
    pub flip: bool,
}

/// Kinematics provider backed by the OPW analytical model.
pub struct OpwKin {
    kin: OPWKinematics,

    /// Geometry kept for posture classification
    geom: Parameters,

    /// Joint 3 angle separating the two elbow branches for this geometry
    elbow_boundary_rad: f64,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Kinematics capability consumed by the jog planner.
pub trait KinProvider: Send + Sync {
    /// Forward kinematics: joint angles (radians) to flange pose.
    fn solve_fk(&self, joints: &Joints) -> Pose;

    /// Inverse kinematics: flange pose to candidate joint solutions, ordered
    /// with the solution closest to `seed` first. An empty vector means the
    /// pose has no complete joint solution.
    fn solve_ik(&self, pose: &Pose, seed: &Joints) -> Solutions;

    /// Classify the posture branch of the given joint solution.
    fn posture(&self, joints: &Joints) -> Posture;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{},{},{}]",
            self.rear as u8, self.lower as u8, self.flip as u8
        )
    }
}

impl OpwKin {
    /// Create a provider for an arm with the given OPW geometry.
    pub fn new(geom: Parameters) -> Self {
        let kin = OPWKinematics::new(geom.clone());
        let elbow_boundary_rad = find_elbow_boundary(&kin, geom.c4);

        Self {
            kin,
            geom,
            elbow_boundary_rad,
        }
    }

    /// The joint 3 angle at which the elbow branch changes for this arm.
    pub fn elbow_boundary_rad(&self) -> f64 {
        self.elbow_boundary_rad
    }
}

impl KinProvider for OpwKin {
    fn solve_fk(&self, joints: &Joints) -> Pose {
        self.kin.forward(joints)
    }

    fn solve_ik(&self, pose: &Pose, seed: &Joints) -> Solutions {
        self.kin.inverse_continuing(pose, seed)
    }

    fn posture(&self, joints: &Joints) -> Posture {
        let wc = wrist_centre(&self.kin.forward(joints), self.geom.c4);

        // Joint 1 in the model's own sign and offset convention, compared
        // against the bearing of the wrist centre about the base axis
        let q1 = f64::from(self.geom.sign_corrections[0]) * joints[0] + self.geom.offsets[0];

        Posture {
            rear: (wc.y.atan2(wc.x) - q1).cos() < 0.0,
            lower: joints[2] < self.elbow_boundary_rad,
            flip: joints[4] < 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Format a joint vector in degrees for operator facing output.
pub fn fmt_joints_deg(joints: &Joints) -> String {
    let degs: Vec<String> = joints
        .iter()
        .map(|q| format!("{:.2}", q.to_degrees()))
        .collect();

    format!("[{}]", degs.join(", "))
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Find the joint 3 angle which maximises the wrist centre's distance from
/// the base origin, i.e. the straight elbow angle separating the two elbow
/// branches. Sampled rather than derived so that it holds for any joint
/// offset and sign convention.
fn find_elbow_boundary(kin: &OPWKinematics, c4: f64) -> f64 {
    const SAMPLES: usize = 3600;

    let mut best_reach = f64::MIN;
    let mut boundary = 0.0;

    for i in 0..SAMPLES {
        let q3 = -PI + 2.0 * PI * (i as f64) / (SAMPLES as f64);
        let wc = wrist_centre(&kin.forward(&[0.0, 0.0, q3, 0.0, 0.0, 0.0]), c4);
        let reach = wc.coords.norm();

        if reach > best_reach {
            best_reach = reach;
            boundary = q3;
        }
    }

    boundary
}

/// The wrist centre sits `c4` behind the flange along the approach axis.
fn wrist_centre(flange: &Pose, c4: f64) -> Point3<f64> {
    flange.transform_point(&Point3::new(0.0, 0.0, -c4))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion};

    /// ABB IRB 4600 60/2.05 geometry
    fn irb4600() -> OpwKin {
        OpwKin::new(Parameters {
            a1: 0.175,
            a2: -0.175,
            b: 0.000,
            c1: 0.495,
            c2: 0.900,
            c3: 0.960,
            c4: 0.135,
            offsets: [0.0, 0.0, -180.0_f64.to_radians(), 0.0, 0.0, 0.0],
            sign_corrections: [1; 6],
            dof: 6,
        })
    }

    #[test]
    fn test_fk_ik_round_trip() {
        let kin = irb4600();
        let joints: Joints = [0.0, 0.11, 0.22, 0.3, 0.1, 0.5];

        let pose = kin.solve_fk(&joints);
        let solutions = kin.solve_ik(&pose, &joints);
        assert!(!solutions.is_empty());

        // The best solution must reproduce the pose within solver tolerance
        let recovered = kin.solve_fk(&solutions[0]);
        let trans_err = (recovered.translation.vector - pose.translation.vector).norm();
        let rot_err = recovered.rotation.angle_to(&pose.rotation);
        assert!(trans_err < 1e-6, "translation error {}", trans_err);
        assert!(rot_err < 1e-6, "rotation error {}", rot_err);
    }

    #[test]
    fn test_ik_out_of_reach() {
        let kin = irb4600();

        // Several metres outside the working envelope
        let pose = Pose::from_parts(
            Translation3::new(5.0, 0.0, 3.0).into(),
            UnitQuaternion::identity(),
        );

        assert!(kin.solve_ik(&pose, &[0.0; 6]).is_empty());
    }

    #[test]
    fn test_posture_wrist_branches() {
        let kin = irb4600();
        let no_flip: Joints = [0.0, 0.11, 0.22, 0.3, 0.4, 0.5];
        let mut flip = no_flip;
        flip[4] = -no_flip[4];

        assert!(!kin.posture(&no_flip).flip);
        assert!(kin.posture(&flip).flip);
        assert_ne!(kin.posture(&no_flip), kin.posture(&flip));
    }

    #[test]
    fn test_posture_elbow_boundary() {
        let kin = irb4600();
        let boundary = kin.elbow_boundary_rad();
        assert!(boundary >= -PI && boundary < PI);

        let mut just_above: Joints = [0.0, 0.11, 0.0, 0.3, 0.4, 0.5];
        let mut just_below = just_above;
        just_above[2] = boundary + 0.1;
        just_below[2] = boundary - 0.1;

        assert!(!kin.posture(&just_above).lower);
        assert!(kin.posture(&just_below).lower);
    }

    #[test]
    fn test_posture_home_is_front() {
        let kin = irb4600();
        assert!(!kin.posture(&[0.0; 6]).rear);
    }

    #[test]
    fn test_fmt_joints_deg() {
        let joints: Joints = [0.0, PI, -PI / 2.0, 0.0, PI / 4.0, 0.0];
        assert_eq!(
            fmt_joints_deg(&joints),
            "[0.00, 180.00, -90.00, 0.00, 45.00, 0.00]"
        );
    }
}
