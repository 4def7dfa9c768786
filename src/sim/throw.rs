//! Turning a pointer drag into a throw
//!
//! Screen coordinates grow right and down. Dragging toward the top of the
//! screen throws away from the camera; dragging right throws to the camera's
//! right. Speed follows a squared curve of the drag length.

use std::fmt;

use glam::{Vec2, Vec3};

use super::disc::{Disc, Team};
use crate::flatten;
use crate::tuning::Tuning;

/// Why a throw attempt was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowRejection {
    /// No such disc in this match
    UnknownDisc,
    /// The match has been decided
    MatchOver,
    /// Another disc holds the turn
    NotYourTurn,
    /// NPC discs are thrown by the AI
    NotPlayerControlled,
    /// This disc already threw this turn
    AlreadyThrown,
    /// The disc is out of the match
    Dead,
    /// The drag was shorter than the minimum
    DragTooShort,
}

impl fmt::Display for ThrowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ThrowRejection::UnknownDisc => "unknown disc",
            ThrowRejection::MatchOver => "match is over",
            ThrowRejection::NotYourTurn => "not this disc's turn",
            ThrowRejection::NotPlayerControlled => "disc is not player-controlled",
            ThrowRejection::AlreadyThrown => "disc already threw this turn",
            ThrowRejection::Dead => "disc is out",
            ThrowRejection::DragTooShort => "drag too short",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ThrowRejection {}

/// Maps a drag length to a launch speed and back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowCurve {
    pub base_speed: f32,
    pub normalizer: f32,
    pub min_speed: f32,
}

impl ThrowCurve {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            base_speed: tuning.base_speed,
            normalizer: tuning.drag_normalizer_px,
            min_speed: tuning.min_speed,
        }
    }

    /// `base · min(drag / normalizer, 1)²`, never below the minimum speed
    pub fn speed(&self, drag: f32) -> f32 {
        let t = (drag / self.normalizer).clamp(0.0, 1.0);
        (self.base_speed * t * t).max(self.min_speed)
    }

    /// Drag length that asks for `speed` (saturating at a full-length drag)
    pub fn drag_for_speed(&self, speed: f32) -> f32 {
        let t = (speed / self.base_speed).clamp(0.0, 1.0).sqrt();
        t * self.normalizer
    }
}

/// Ground-plane forward and right vectors of a camera looking along `forward`.
///
/// A camera looking straight down has no horizontal heading; world -Z is
/// used as forward then.
pub fn camera_basis(forward: Vec3) -> (Vec3, Vec3) {
    let forward = flatten(forward).try_normalize().unwrap_or(Vec3::NEG_Z);
    let right = forward.cross(Vec3::Y);
    (forward, right)
}

/// World direction (unit, planar) of a screen-space drag
pub fn drag_direction(delta: Vec2, camera_forward: Vec3) -> Vec3 {
    let (forward, right) = camera_basis(camera_forward);
    (right * delta.x - forward * delta.y)
        .try_normalize()
        .unwrap_or(forward)
}

/// Velocity for a drag from `down` to `up`, or a rejection if it is too short
pub fn drag_velocity(down: Vec2, up: Vec2, camera_forward: Vec3, tuning: &Tuning) -> Result<Vec3, ThrowRejection> {
    let delta = up - down;
    let length = delta.length();
    if length < tuning.min_drag_px {
        return Err(ThrowRejection::DragTooShort);
    }

    let speed = ThrowCurve::from_tuning(tuning).speed(length);
    Ok(drag_direction(delta, camera_forward) * speed)
}

/// Check a player may throw `discs[index]` now
pub fn check_player_throw(discs: &[Disc], active: Option<usize>, index: usize) -> Result<(), ThrowRejection> {
    let active = active.ok_or(ThrowRejection::MatchOver)?;
    let disc = discs.get(index).ok_or(ThrowRejection::UnknownDisc)?;
    if index != active {
        return Err(ThrowRejection::NotYourTurn);
    }
    if disc.team != Team::Player {
        return Err(ThrowRejection::NotPlayerControlled);
    }
    if disc.dead || disc.hit_points == 0 {
        return Err(ThrowRejection::Dead);
    }
    if disc.has_thrown {
        return Err(ThrowRejection::AlreadyThrown);
    }
    Ok(())
}
