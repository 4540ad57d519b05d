//! Quick Duel - a dial-timing duel against a CPU opponent
//!
//! Core modules:
//! - `sim`: Timing/scoring engine (dial, hit zones, CPU turns, phase orchestration)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences handed to the engine by the host
//! - `error`: Recoverable error types
//!
//! Rendering, audio and input plumbing live with the host application; it
//! reads the engine's observables every frame and never mutates them.

pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::DuelError;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Zone group size bounds
    pub const MIN_ZONE_COUNT: u8 = 1;
    pub const MAX_ZONE_COUNT: u8 = 4;
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let r = angle.rem_euclid(TAU);
    // rem_euclid can round tiny negatives up to exactly TAU
    if r >= TAU { 0.0 } else { r }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
