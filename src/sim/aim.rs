//! NPC aiming
//!
//! An NPC throws at the nearest living player disc. Its direction wobbles
//! inside a cone that narrows with skill, and candidate directions whose path
//! runs through an obstacle are re-rolled a bounded number of times.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::disc::{Disc, DiscId, Team};
use super::throw::ThrowCurve;
use crate::tuning::Tuning;
use crate::{flatten, planar_distance, rotate_about_y};

/// What an NPC decided to do with its turn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimDecision {
    pub target: DiscId,
    /// Unit ground-plane direction
    pub direction: Vec3,
    pub speed: f32,
    /// Candidates sampled, including the chosen one
    pub attempts: u32,
    /// Every candidate was blocked; the last one was used anyway
    pub obstructed: bool,
}

impl AimDecision {
    pub fn velocity(&self) -> Vec3 {
        self.direction * self.speed
    }
}

/// Nearest living player disc to `discs[actor]`; ties go to the earlier disc
pub fn select_target(discs: &[Disc], actor: usize) -> Option<usize> {
    let origin = discs.get(actor)?.position;
    let mut best: Option<(usize, f32)> = None;

    for (i, disc) in discs.iter().enumerate() {
        if i == actor || disc.team != Team::Player || !disc.is_alive() {
            continue;
        }
        let dist = planar_distance(origin, disc.position);
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((i, dist));
        }
    }

    best.map(|(i, _)| i)
}

/// Half-angle of the aiming cone in degrees
#[inline]
pub fn deviation_degrees(skill_level: u8, max_cone_degrees: f32) -> f32 {
    let skill = skill_level.min(crate::consts::MAX_SKILL) as f32;
    (100.0 - skill) / 100.0 * max_cone_degrees
}

/// Launch speed that carries a disc roughly `distance` under per-frame
/// friction, pushed harder by skilled throwers and passed through the same
/// curve as player drags.
pub fn throw_speed(distance: f32, skill_level: u8, tuning: &Tuning) -> f32 {
    let reach = distance * (1.0 - tuning.friction);
    let skill = skill_level.min(crate::consts::MAX_SKILL) as f32 / 100.0;
    let desired = reach * (1.0 + skill * tuning.ai_overshoot);

    let curve = ThrowCurve::from_tuning(tuning);
    curve.speed(curve.drag_for_speed(desired))
}

/// Choose a throw for the NPC at `discs[actor]`.
///
/// Returns None when there is no living player to aim at.
pub fn aim<R: Rng>(
    discs: &[Disc],
    actor: usize,
    arena: &Arena,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<AimDecision> {
    let thrower = discs.get(actor)?;
    let target_index = select_target(discs, actor)?;
    let target = &discs[target_index];

    let origin = thrower.position;
    let distance = planar_distance(origin, target.position);
    let base = flatten(target.position - origin)
        .try_normalize()
        .unwrap_or(Vec3::NEG_Z);
    let deviation = deviation_degrees(thrower.skill_level, tuning.max_cone_degrees);

    let mut direction = base;
    let mut attempts = 0;
    let mut obstructed = true;

    while attempts < tuning.max_aim_attempts {
        attempts += 1;
        let angle = if deviation > 0.0 {
            rng.random_range(-deviation..=deviation)
        } else {
            0.0
        };
        direction = rotate_about_y(base, angle.to_radians());

        let reach = arena.travel_limit(origin, direction, thrower.radius, distance);
        let aim_point = origin + direction * reach;
        if arena.segment_clear(origin, aim_point, tuning.los_samples) {
            obstructed = false;
            break;
        }
        if deviation == 0.0 {
            // Every re-roll would give the same ray
            break;
        }
    }

    let speed = throw_speed(distance, thrower.skill_level, tuning);
    let decision = AimDecision {
        target: target.id,
        direction,
        speed,
        attempts,
        obstructed,
    };

    if obstructed {
        log::debug!(
            "{} found no clear line to {} in {} tries, throwing anyway",
            thrower.name,
            target.name,
            attempts
        );
    } else {
        log::debug!(
            "{} aims at {} (distance {:.1}, speed {:.2}, {} tries)",
            thrower.name,
            target.name,
            distance,
            speed,
            attempts
        );
    }

    Some(decision)
}
