//! # Jog library
//!
//! This library provides the modules used by the jog executable, so that
//! integration tests can drive the control loop without going through the
//! binary itself.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Jog planning module, converts movement directions into joint targets.
pub mod jog_ctrl;

/// Control loops binding key input, planning, and motion dispatch together.
pub mod jog_loop;

/// Raw console key input.
pub mod key_input;

/// Motion dispatch module, issues joint moves and keeps a live controller
/// synchronised with the commanded position.
pub mod motion_driver;
