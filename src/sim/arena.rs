//! Static arena geometry
//!
//! The field is a rectangle centred on the origin in the xz plane. Walls and
//! obstacles are axis-aligned boxes taken from the scene; only their ground
//! footprint matters for collisions and line-of-sight.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{DISC_HEIGHT, FIELD_DEPTH, FIELD_WIDTH};

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box standing on the ground with the given footprint centre and half extents
    pub fn footprint(center_x: f32, center_z: f32, half_x: f32, half_z: f32, height: f32) -> Self {
        Self::new(
            Vec3::new(center_x - half_x, 0.0, center_z - half_z),
            Vec3::new(center_x + half_x, height, center_z + half_z),
        )
    }

    /// Ground-plane point inside the footprint (edges inclusive)
    #[inline]
    pub fn contains_xz(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.z && p.z <= self.max.z
    }

    /// Closest footprint point to `p`, at `p`'s height
    #[inline]
    pub fn closest_point_xz(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y,
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Whether the vertical extent overlaps `[lo, hi]`
    #[inline]
    pub fn spans_height(&self, lo: f32, hi: f32) -> bool {
        self.max.y > lo && self.min.y < hi
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Field bounds plus the obstacle boxes of one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Full field width (x extent)
    pub width: f32,
    /// Full field depth (z extent)
    pub depth: f32,
    pub obstacles: Vec<Aabb>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::open(FIELD_WIDTH, FIELD_DEPTH)
    }
}

impl Arena {
    /// Empty field without obstacles
    pub fn open(width: f32, depth: f32) -> Self {
        Self {
            width,
            depth,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacle(mut self, obstacle: Aabb) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    /// Build from scene geometry, keeping boxes that reach into the disc slab.
    ///
    /// Floors (entirely at or below y = 0) and overhead geometry never touch a
    /// disc and are dropped.
    pub fn from_bounds(width: f32, depth: f32, bounds: impl IntoIterator<Item = Aabb>) -> Self {
        let mut dropped = 0usize;
        let obstacles: Vec<Aabb> = bounds
            .into_iter()
            .filter(|b| {
                let keep = b.spans_height(0.0, DISC_HEIGHT);
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();
        log::debug!(
            "Arena {}x{}: {} obstacles ({} scene boxes outside the disc slab)",
            width,
            depth,
            obstacles.len(),
            dropped
        );
        Self {
            width,
            depth,
            obstacles,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.depth / 2.0)
    }

    /// True if the ground point lies inside any obstacle footprint
    pub fn blocked(&self, p: Vec3) -> bool {
        self.obstacles.iter().any(|o| o.contains_xz(p))
    }

    /// True if a disc of `radius` at `p` would touch an obstacle or leave the field
    pub fn disc_overlaps(&self, p: Vec3, radius: f32) -> bool {
        let half = self.half_extents();
        if p.x.abs() + radius > half.x || p.z.abs() + radius > half.y {
            return true;
        }
        self.obstacles.iter().any(|o| {
            let closest = o.closest_point_xz(p);
            crate::flatten(p - closest).length_squared() < radius * radius
        })
    }

    /// How far a disc centre of `radius` can travel from `origin` along the
    /// unit direction `dir` before reaching the field edge, capped at `max_len`
    pub fn travel_limit(&self, origin: Vec3, dir: Vec3, radius: f32, max_len: f32) -> f32 {
        let half = self.half_extents();
        let limit = Vec2::new((half.x - radius).max(0.0), (half.y - radius).max(0.0));
        let mut reach = max_len;
        for (p, d, l) in [(origin.x, dir.x, limit.x), (origin.z, dir.z, limit.y)] {
            if d > 0.0 {
                reach = reach.min((l - p) / d);
            } else if d < 0.0 {
                reach = reach.min((-l - p) / d);
            }
        }
        reach.max(0.0)
    }

    /// Line-of-sight along the ground: `samples + 1` evenly spaced points from
    /// `from` to `to` (both ends included) must all be outside every obstacle.
    pub fn segment_clear(&self, from: Vec3, to: Vec3, samples: u32) -> bool {
        let samples = samples.max(1);
        (0..=samples).all(|i| {
            let t = i as f32 / samples as f32;
            !self.blocked(from.lerp(to, t))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_new_orders_corners() {
        let b = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_closest_point_clamps_to_footprint() {
        let b = Aabb::footprint(0.0, 0.0, 1.0, 1.0, 2.0);
        let p = b.closest_point_xz(Vec3::new(5.0, 0.3, 0.5));
        assert_eq!(p, Vec3::new(1.0, 0.3, 0.5));
    }

    #[test]
    fn test_from_bounds_drops_floor_and_ceiling() {
        let floor = Aabb::new(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(20.0, 0.0, 20.0));
        let ceiling = Aabb::new(Vec3::new(-5.0, 10.0, -5.0), Vec3::new(5.0, 11.0, 5.0));
        let pillar = Aabb::footprint(3.0, 3.0, 1.0, 1.0, 4.0);
        let arena = Arena::from_bounds(40.0, 40.0, [floor, ceiling, pillar]);
        assert_eq!(arena.obstacles, vec![pillar]);
    }

    #[test]
    fn test_travel_limit_stops_at_field_edge() {
        let arena = Arena::open(40.0, 40.0);
        // Centre may reach x = 18.5 with radius 1.5
        let reach = arena.travel_limit(Vec3::new(10.0, 0.3, 0.0), Vec3::X, 1.5, 30.0);
        assert!((reach - 8.5).abs() < 1e-5);
        // Short rays are untouched
        assert_eq!(arena.travel_limit(Vec3::ZERO, Vec3::NEG_Z, 1.5, 5.0), 5.0);
        // Diagonal: z hits its edge first
        let dir = Vec3::new(1.0, 0.0, 1.0).normalize();
        let reach = arena.travel_limit(Vec3::new(0.0, 0.0, 10.0), dir, 1.5, 100.0);
        let end = Vec3::new(0.0, 0.0, 10.0) + dir * reach;
        assert!((end.z - 18.5).abs() < 1e-4);
        assert!(!arena.disc_overlaps(end - dir * 1e-3, 1.5));
    }

    #[test]
    fn test_segment_clear() {
        let arena = Arena::default().with_obstacle(Aabb::footprint(0.0, -10.0, 1.0, 1.0, 2.0));
        let from = Vec3::new(0.0, 0.3, 0.0);
        assert!(!arena.segment_clear(from, Vec3::new(0.0, 0.3, -20.0), 20));
        assert!(arena.segment_clear(from, Vec3::new(10.0, 0.3, -20.0), 20));
    }

    #[test]
    fn test_disc_overlaps_field_edge_and_obstacle() {
        let arena = Arena::default().with_obstacle(Aabb::footprint(5.0, 5.0, 1.0, 1.0, 2.0));
        assert!(arena.disc_overlaps(Vec3::new(19.0, 0.3, 0.0), 1.5));
        assert!(arena.disc_overlaps(Vec3::new(5.0, 0.3, 7.0), 1.5));
        assert!(!arena.disc_overlaps(Vec3::new(0.0, 0.3, 0.0), 1.5));
    }
}
