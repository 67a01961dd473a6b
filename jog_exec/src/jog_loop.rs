//! # Jog control loop
//!
//! Binds the key source, the jog planner and the motion driver together.
//! Two variants are provided:
//!
//! - [`run_single`] processes each key press to completion before reading
//!   the next one.
//! - [`run_threaded`] splits key handling and motion dispatch into two
//!   tasks. Targets are handed over with latest value wins semantics, so a
//!   burst of key presses collapses onto the newest target instead of
//!   queueing stale motion.
//!
//! Neither loop has a quit key. They end when the interrupt key is pressed
//! or a fatal dispatch error occurs.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::mpsc;
use std::thread;

use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};

use crate::jog_ctrl::{InputData, JogCtrl, MoveDirection, StepResult};
use crate::key_input::{KeyPress, KeySource};
use crate::motion_driver::{DispatchError, MotionDriver};
use robot_if::kin::{fmt_joints_deg, Joints};
use util::module::State;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Run the single threaded control loop.
///
/// Each key press is decoded, planned, and dispatched before the next press
/// is read. Returns on interrupt or on the first fatal error.
pub fn run_single<K: KeySource>(
    keys: &mut K,
    jog: &mut JogCtrl,
    driver: &mut MotionDriver,
) -> Result<(), Report> {
    loop {
        let key = keys.next_key().wrap_err("Failed to read from the console")?;

        if key == KeyPress::Interrupt {
            info!("Interrupted, exiting");
            return Ok(());
        }

        let input = InputData {
            direction: MoveDirection::from_key(key),
            current_joints: driver.robot_joints(),
        };

        if let Some(target) = plan_step(jog, &input) {
            driver
                .dispatch(&target)
                .wrap_err("Failed to dispatch the jog step")?;
        }
    }
}

/// Run the two task control loop.
///
/// The calling thread reads and plans key presses while a spawned motion
/// task owns the driver and dispatches targets. Only the newest pending
/// target is dispatched. Since the motion task owns the robot, the reader
/// tracks the joints it last commanded rather than querying the station.
pub fn run_threaded<K: KeySource>(
    keys: &mut K,
    jog: &mut JogCtrl,
    driver: MotionDriver,
) -> Result<(), Report> {
    let (target_tx, target_rx) = mpsc::channel::<Joints>();

    let mut current_joints = driver.robot_joints();

    let motion_handle = thread::spawn(move || motion_task(driver, target_rx));

    loop {
        let key = keys.next_key().wrap_err("Failed to read from the console")?;

        if key == KeyPress::Interrupt {
            info!("Interrupted, exiting");
            break;
        }

        let input = InputData {
            direction: MoveDirection::from_key(key),
            current_joints,
        };

        if let Some(target) = plan_step(jog, &input) {
            current_joints = target;

            // Send fails only once the motion task has stopped, the join
            // below surfaces its error
            if target_tx.send(target).is_err() {
                break;
            }
        }
    }

    // Closing the channel lets the motion task finish its backlog and stop
    drop(target_tx);

    match motion_handle.join() {
        Ok(result) => result.wrap_err("Motion task failed"),
        Err(_) => Err(eyre!("Motion task panicked")),
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Plan one step and log the outcome. Returns the joint target if motion
/// should be issued for this step.
fn plan_step(jog: &mut JogCtrl, input: &InputData) -> Option<Joints> {
    if !input.direction.is_zero() {
        info!("Jog {}", input.direction);
    }

    match jog.proc(input) {
        Ok((StepResult::NoOp, _)) => None,
        Ok((StepResult::Unreachable, _)) => {
            warn!("No joint solution, the target is out of reach or too close to a singularity");
            None
        }
        Ok((StepResult::PostureChange(target), report)) => {
            match (report.current_posture, report.target_posture) {
                (Some(current), Some(planned)) => warn!(
                    "Posture changing from {} to {}, expect a large joint motion",
                    current, planned
                ),
                _ => warn!("Posture changing, expect a large joint motion"),
            }
            debug!("Target joints: {}", fmt_joints_deg(&target));
            Some(target)
        }
        Ok((StepResult::Reachable(target), _)) => {
            debug!("Target joints: {}", fmt_joints_deg(&target));
            Some(target)
        }
        Err(e) => {
            warn!("Error during JogCtrl processing: {}", e);
            None
        }
    }
}

/// Motion task body: dispatch the newest available target until the channel
/// closes or dispatch fails.
fn motion_task(
    mut driver: MotionDriver,
    targets: mpsc::Receiver<Joints>,
) -> Result<(), DispatchError> {
    loop {
        // Block for a target, then drain the channel so stale intermediate
        // steps are overwritten rather than queued
        let mut target = match targets.recv() {
            Ok(t) => t,
            Err(_) => return Ok(()),
        };

        while let Ok(t) = targets.try_recv() {
            target = t;
        }

        driver.dispatch(&target)?;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
