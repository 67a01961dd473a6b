//! # Robot interface crate.
//!
//! Provides the common robot vocabulary types and the provider traits
//! (kinematics and robot control) consumed by the executables.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Robot control provider interface
pub mod ctrl;

/// Kinematics provider interface
pub mod kin;

/// Simulated robot station
pub mod station;
