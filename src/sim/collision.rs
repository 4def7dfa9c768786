//! Collision detection and response for discs
//!
//! Everything happens in the ground plane: discs are circles, obstacles are
//! rectangle footprints, the field is an inward-facing rectangle.

use glam::{Vec2, Vec3};

use super::arena::Aabb;
use super::disc::Disc;
use crate::flatten;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec3,
    /// Unit surface normal, pointing out of the surface toward the disc
    pub normal: Vec3,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            penetration: 0.0,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Which field edges a disc crossed this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallBounce {
    pub x: bool,
    pub z: bool,
}

impl WallBounce {
    pub fn any(&self) -> bool {
        self.x || self.z
    }
}

/// Keep a disc inside the field.
///
/// The centre is clamped to the field inset by the radius; every axis that
/// was exceeded has its velocity component reflected and scaled by
/// `restitution`.
pub fn bounce_off_field(disc: &mut Disc, half_extents: Vec2, restitution: f32) -> WallBounce {
    let limit_x = (half_extents.x - disc.radius).max(0.0);
    let limit_z = (half_extents.y - disc.radius).max(0.0);
    let mut bounce = WallBounce::default();

    if disc.position.x.abs() > limit_x {
        disc.position.x = disc.position.x.clamp(-limit_x, limit_x);
        disc.velocity.x = -disc.velocity.x * restitution;
        bounce.x = true;
    }
    if disc.position.z.abs() > limit_z {
        disc.position.z = disc.position.z.clamp(-limit_z, limit_z);
        disc.velocity.z = -disc.velocity.z * restitution;
        bounce.z = true;
    }

    bounce
}

/// Check a disc against an obstacle footprint
pub fn disc_box_collision(center: Vec3, radius: f32, obstacle: &Aabb) -> CollisionResult {
    if obstacle.contains_xz(center) {
        // Tunnelled into the box - push out through the nearest face
        let faces = [
            (center.x - obstacle.min.x, Vec3::NEG_X),
            (obstacle.max.x - center.x, Vec3::X),
            (center.z - obstacle.min.z, Vec3::NEG_Z),
            (obstacle.max.z - center.z, Vec3::Z),
        ];
        let (depth, normal) = faces
            .into_iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .unwrap_or((0.0, Vec3::X));
        return CollisionResult {
            hit: true,
            point: center - normal * depth,
            normal,
            penetration: depth + radius,
        };
    }

    let closest = obstacle.closest_point_xz(center);
    let offset = flatten(center - closest);
    let dist = offset.length();

    if dist < radius && dist > 0.0 {
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    CollisionResult::miss()
}

/// Push a disc out of an obstacle and bounce it if it was moving into it.
/// Returns true on contact.
pub fn resolve_disc_box(disc: &mut Disc, obstacle: &Aabb, restitution: f32) -> bool {
    let result = disc_box_collision(disc.position, disc.radius, obstacle);
    if !result.hit {
        return false;
    }

    disc.position += result.normal * result.penetration;
    if disc.velocity.dot(result.normal) < 0.0 {
        disc.velocity = flatten(reflect_velocity(disc.velocity, result.normal)) * restitution;
    }
    true
}

/// Check two discs for overlap. The normal points from `a` toward `b`.
///
/// Coincident centres have no usable normal and report a miss.
pub fn disc_disc_collision(a_pos: Vec3, a_radius: f32, b_pos: Vec3, b_radius: f32) -> CollisionResult {
    let offset = flatten(b_pos - a_pos);
    let dist = offset.length();
    let reach = a_radius + b_radius;

    if dist >= reach || dist <= 0.0 {
        return CollisionResult::miss();
    }

    let normal = offset / dist;
    CollisionResult {
        hit: true,
        point: a_pos + normal * a_radius,
        normal,
        penetration: reach - dist,
    }
}

/// Outcome of resolving one overlapping pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContact {
    /// Speed at which the discs were approaching along the normal (0 if separating)
    pub closing_speed: f32,
}

impl PairContact {
    #[inline]
    pub fn closing(&self) -> bool {
        self.closing_speed > 0.0
    }
}

/// Separate two overlapping equal-mass discs and exchange normal momentum.
///
/// The positional correction is split evenly. When the discs are closing,
/// each receives an equal and opposite impulse of `(1 + e) / 2` times the
/// closing speed along the normal; `e = 1` swaps the normal components.
pub fn resolve_disc_pair(a: &mut Disc, b: &mut Disc, restitution: f32) -> Option<PairContact> {
    let result = disc_disc_collision(a.position, a.radius, b.position, b.radius);
    if !result.hit {
        return None;
    }

    let n = result.normal;
    let correction = n * (result.penetration * 0.5);
    a.position -= correction;
    b.position += correction;

    let closing_speed = (a.velocity - b.velocity).dot(n);
    if closing_speed > 0.0 {
        let impulse = n * (closing_speed * (1.0 + restitution) * 0.5);
        a.set_velocity(a.velocity - impulse);
        b.set_velocity(b.velocity + impulse);
        Some(PairContact { closing_speed })
    } else {
        Some(PairContact { closing_speed: 0.0 })
    }
}
