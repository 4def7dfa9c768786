//! Disc Combat - turn-based planar disc battles
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, turn order, AI aiming)
//! - `present`: One-way sync of simulation state to a renderer collaborator
//! - `input`: Pointer drag tracking for player throws
//! - `game`: Host-facing loop tying simulation, presentation and input together
//! - `tuning`: Data-driven game balance
//! - `platform`: Browser bridge (wasm32 only)

pub mod game;
pub mod input;
pub mod platform;
pub mod present;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use tuning::{Tuning, TuningError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Default playing field (world units, centred on the origin)
    pub const FIELD_WIDTH: f32 = 40.0;
    pub const FIELD_DEPTH: f32 = 40.0;

    /// Disc defaults
    pub const DISC_RADIUS: f32 = 1.5;
    pub const DISC_HEIGHT: f32 = 0.6;
    pub const DISC_HIT_POINTS: u32 = 3;
    pub const DISC_SKILL: u8 = 50;

    /// Skill levels are percentages
    pub const MAX_SKILL: u8 = 100;
}

/// Project a vector onto the ground plane (y = 0)
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance between two points measured on the ground plane
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(b - a).length()
}

/// Rotate a vector about the vertical (+Y) axis, right-handed
#[inline]
pub fn rotate_about_y(v: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_flatten_drops_height() {
        assert_eq!(flatten(Vec3::new(1.0, 5.0, -2.0)), Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_rotate_about_y_quarter_turn() {
        // +X rotated a quarter turn counter-clockwise (seen from above) lands on -Z
        let r = rotate_about_y(Vec3::X, FRAC_PI_2);
        assert!((r - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_planar_distance_ignores_y() {
        let d = planar_distance(Vec3::new(0.0, 3.0, 0.0), Vec3::new(3.0, -1.0, 4.0));
        assert!((d - 5.0).abs() < 1e-5);
    }
}
