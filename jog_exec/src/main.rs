//! # Keyboard Jog Executable
//!
//! Jogs a six axis arm from the keyboard. The arrow keys move the tool in X
//! and Y, while Q and A move it in Z. Each key press is one Cartesian step
//! of the tool in the robot's base frame: the step is planned through the
//! inverse kinematics, checked for a posture change, and only then issued to
//! the robot.
//!
//! With `live_sync_enabled` set in `motion_driver.toml` the physical
//! controller is periodically brought in line with the commanded position,
//! so the real arm can follow a jog session without slowing down the loop.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Result};
use log::info;
use serde::Deserialize;

// Internal
use jog_lib::jog_ctrl::{InitData, JogCtrl};
use jog_lib::jog_loop;
use jog_lib::key_input::ConsoleKeys;
use jog_lib::motion_driver::{self, MotionDriver};
use robot_if::ctrl::RobotControl;
use robot_if::station::{SimStation, StationParams};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Executable level parameters.
#[derive(Debug, Deserialize)]
struct ExecParams {
    /// True to run the two task loop, decoupling key input from motion
    /// dispatch.
    threaded: bool,
}

// ---------------------------------------------------------------------------
// MAIN
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("jog_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution
    info!("Keyboard Jog Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    info!("Initialising...");

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams =
        params::load("jog_exec.toml").wrap_err("Failed to load executable parameters")?;
    let station_params: StationParams =
        params::load("station.toml").wrap_err("Failed to load station parameters")?;
    let driver_params: motion_driver::Params =
        params::load("motion_driver.toml").wrap_err("Failed to load motion driver parameters")?;

    // ---- STATION INITIALISATION ----

    let station =
        SimStation::from_params(&station_params).wrap_err("Could not build the robot station")?;

    info!("Using robot: {}", station.name());

    // ---- MODULE INITIALISATION ----

    let mut jog = JogCtrl::default();
    jog.init(
        InitData {
            params_file: "jog_ctrl.toml",
            kin: station.kin(),
        },
        &session,
    )
    .wrap_err("Failed to initialise JogCtrl")?;

    let mut driver = MotionDriver::new(&driver_params, Box::new(station))
        .wrap_err("Failed to initialise the motion driver")?;

    info!("Initialisation complete");

    // ---- MAIN LOOP ----

    info!("Use the arrow keys to jog in X and Y, Q and A to jog in Z, Ctrl+C to exit");

    let mut keys = ConsoleKeys::new().wrap_err("Failed to take over the console")?;

    if exec_params.threaded {
        jog_loop::run_threaded(&mut keys, &mut jog, driver)?;
    } else {
        jog_loop::run_single(&mut keys, &mut jog, &mut driver)?;
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    Ok(())
}
