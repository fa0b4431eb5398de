//! Testing utilities for crabcaps
//!
//! Provides an in-memory camera provider so enumeration can be exercised
//! offline, including open failures and devices with missing frame-rate data.

pub mod simulated;

pub use simulated::{SimulatedCamera, SimulatedDevice, SimulatedProvider};
