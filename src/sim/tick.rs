//! Fixed-step physics
//!
//! One call advances the arena by one host frame. There is no delta time:
//! velocities are distances per frame, so simulation speed follows frame rate.

use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::collision::{PairContact, bounce_off_field, resolve_disc_box, resolve_disc_pair};
use super::disc::{Disc, DiscId, Team};
use crate::tuning::Tuning;

/// Something that happened during a physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A disc came to rest (`moving` went from true to false)
    Settled { disc: DiscId },
    /// The active thrower hit another disc
    Damaged {
        attacker: DiscId,
        target: DiscId,
        hit_points: u32,
    },
    /// A disc with no hit points settled and is now out of the match
    Died { disc: DiscId },
    /// A disc bounced off the field edge
    WallBounce { disc: DiscId },
    /// A disc hit an obstacle box
    ObstacleHit { disc: DiscId },
}

/// Advance every disc by one frame.
///
/// `active` is the disc whose turn it is; only it can deal damage.
pub fn step(
    discs: &mut [Disc],
    arena: &Arena,
    tuning: &Tuning,
    active: Option<DiscId>,
) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let half = arena.half_extents();

    // Integrate and resolve static geometry
    for disc in discs.iter_mut().filter(|d| d.moving) {
        disc.position += disc.velocity;

        if bounce_off_field(disc, half, tuning.wall_restitution).any() {
            events.push(SimEvent::WallBounce { disc: disc.id });
        }

        let mut hit_obstacle = false;
        for obstacle in &arena.obstacles {
            hit_obstacle |= resolve_disc_box(disc, obstacle, tuning.obstacle_restitution);
        }
        if hit_obstacle {
            events.push(SimEvent::ObstacleHit { disc: disc.id });
        }
    }

    // Disc-disc contacts, every unordered pair once
    for i in 0..discs.len() {
        let (head, tail) = discs.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if let Some(contact) = resolve_disc_pair(a, b, tuning.disc_restitution) {
                if let Some(event) = apply_contact_damage(a, b, contact, active, tuning.damage_per_hit) {
                    events.push(event);
                }
            }
        }
    }

    // Friction and settling
    for disc in discs.iter_mut().filter(|d| d.moving) {
        disc.velocity *= tuning.friction;
        disc.motion_frames += 1;

        let timed_out = tuning
            .settle_timeout_frames
            .is_some_and(|limit| disc.motion_frames >= limit);
        if timed_out {
            log::warn!(
                "{} still moving after {} frames, forcing it to settle",
                disc.name,
                disc.motion_frames
            );
        }

        if disc.velocity.length() < tuning.settle_epsilon || timed_out {
            let died = disc.settle();
            events.push(SimEvent::Settled { disc: disc.id });
            if died {
                log::info!("{} is out", disc.name);
                events.push(SimEvent::Died { disc: disc.id });
            }
        }
    }

    events
}

/// Apply the damage rule to a resolved pair.
///
/// Only the active thrower deals damage, only while closing, once per throw
/// unless it can rebound. NPCs never hurt each other.
fn apply_contact_damage(
    a: &mut Disc,
    b: &mut Disc,
    contact: PairContact,
    active: Option<DiscId>,
    amount: u32,
) -> Option<SimEvent> {
    let active = active?;
    if !contact.closing() || (a.team == Team::Npc && b.team == Team::Npc) {
        return None;
    }

    let (attacker, target) = if a.id == active {
        (a, b)
    } else if b.id == active {
        (b, a)
    } else {
        return None;
    };

    if attacker.has_caused_damage && !attacker.can_rebound_damage {
        return None;
    }
    if target.dead || target.hit_points == 0 {
        return None;
    }

    let hit_points = target.take_damage(amount);
    attacker.has_caused_damage = true;
    log::debug!(
        "{} hit {} ({} hp left)",
        attacker.name,
        target.name,
        hit_points
    );

    Some(SimEvent::Damaged {
        attacker: attacker.id,
        target: target.id,
        hit_points,
    })
}
