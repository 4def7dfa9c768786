//! Disc entities: the combatants of a match

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable identifier of a disc within a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscId(pub u32);

/// Which side controls a disc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    /// Thrown by a human through pointer drags
    Player,
    /// Thrown by the aiming AI
    Npc,
}

/// Setup parameters for a new disc
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscSpec {
    pub name: String,
    pub team: Team,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_hit_points")]
    pub hit_points: u32,
    #[serde(default = "default_skill")]
    pub skill_level: u8,
    #[serde(default)]
    pub can_rebound_damage: bool,
    /// Fixed ground position (x, z); random placement when absent
    #[serde(default)]
    pub position: Option<(f32, f32)>,
}

fn default_radius() -> f32 {
    DISC_RADIUS
}

fn default_height() -> f32 {
    DISC_HEIGHT
}

fn default_hit_points() -> u32 {
    DISC_HIT_POINTS
}

fn default_skill() -> u8 {
    DISC_SKILL
}

impl DiscSpec {
    pub fn new(name: impl Into<String>, team: Team) -> Self {
        Self {
            name: name.into(),
            team,
            radius: DISC_RADIUS,
            height: DISC_HEIGHT,
            hit_points: DISC_HIT_POINTS,
            skill_level: DISC_SKILL,
            can_rebound_damage: false,
            position: None,
        }
    }

    pub fn at(mut self, x: f32, z: f32) -> Self {
        self.position = Some((x, z));
        self
    }

    pub fn with_hit_points(mut self, hit_points: u32) -> Self {
        self.hit_points = hit_points;
        self
    }

    pub fn with_skill(mut self, skill_level: u8) -> Self {
        self.skill_level = skill_level;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }
}

/// A combat disc.
///
/// Velocity always lies in the ground plane; `position.y` stays at half the
/// disc height. Hit points are unsigned so they can never go negative, and
/// `dead` is only ever switched on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disc {
    pub id: DiscId,
    pub name: String,
    pub team: Team,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    /// Cosmetic only; collisions use the radius
    pub height: f32,
    pub hit_points: u32,
    /// 0-100, higher throws straighter
    pub skill_level: u8,
    pub moving: bool,
    pub has_thrown: bool,
    pub dead: bool,
    /// Already dealt damage this turn (reset on throw and on turn handoff)
    pub has_caused_damage: bool,
    /// May deal damage more than once per throw
    pub can_rebound_damage: bool,
    /// Frames spent in motion since the last throw (for the optional settle timeout)
    #[serde(skip)]
    pub(crate) motion_frames: u32,
}

impl Disc {
    pub fn new(id: DiscId, spec: &DiscSpec, x: f32, z: f32) -> Self {
        Self {
            id,
            name: spec.name.clone(),
            team: spec.team,
            position: Vec3::new(x, spec.height / 2.0, z),
            velocity: Vec3::ZERO,
            radius: spec.radius,
            height: spec.height,
            hit_points: spec.hit_points,
            skill_level: spec.skill_level.min(MAX_SKILL),
            moving: false,
            has_thrown: false,
            dead: false,
            has_caused_damage: false,
            can_rebound_damage: spec.can_rebound_damage,
            motion_frames: 0,
        }
    }

    /// Still takes part in the turn order
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hit_points > 0 && !self.dead
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        self.team == Team::Player
    }

    /// Set a new planar velocity; any vertical component is discarded
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = crate::flatten(velocity);
        if self.velocity != Vec3::ZERO {
            self.moving = true;
        }
    }

    /// Launch this disc as the turn's throw
    pub fn commit_throw(&mut self, velocity: Vec3) {
        self.set_velocity(velocity);
        self.moving = true;
        self.has_thrown = true;
        self.has_caused_damage = false;
        self.motion_frames = 0;
    }

    /// Remove hit points, saturating at zero. Returns the remaining hit points.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hit_points = self.hit_points.saturating_sub(amount);
        self.hit_points
    }

    /// Snap to rest. Returns true if this settle also killed the disc.
    ///
    /// `has_caused_damage` survives: other discs may still be sliding into
    /// this one before the turn is handed on.
    pub fn settle(&mut self) -> bool {
        self.velocity = Vec3::ZERO;
        self.moving = false;
        self.motion_frames = 0;
        if self.hit_points == 0 && !self.dead {
            self.dead = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(hit_points: u32) -> Disc {
        let spec = DiscSpec::new("test", Team::Npc).with_hit_points(hit_points);
        Disc::new(DiscId(1), &spec, 0.0, 0.0)
    }

    #[test]
    fn test_new_disc_rests_at_half_height() {
        let d = disc(3);
        assert_eq!(d.position.y, DISC_HEIGHT / 2.0);
        assert_eq!(d.velocity, Vec3::ZERO);
        assert!(d.is_alive());
        assert!(!d.moving);
    }

    #[test]
    fn test_skill_is_clamped() {
        let spec = DiscSpec::new("ace", Team::Npc).with_skill(250);
        let d = Disc::new(DiscId(1), &spec, 0.0, 0.0);
        assert_eq!(d.skill_level, 100);
    }

    #[test]
    fn test_velocity_stays_planar() {
        let mut d = disc(3);
        d.set_velocity(Vec3::new(1.0, 4.0, -1.0));
        assert_eq!(d.velocity.y, 0.0);
        assert!(d.moving);
    }

    #[test]
    fn test_damage_saturates_at_zero() {
        let mut d = disc(1);
        assert_eq!(d.take_damage(5), 0);
        assert_eq!(d.take_damage(1), 0);
    }

    #[test]
    fn test_death_only_on_settle_and_sticks() {
        let mut d = disc(1);
        d.commit_throw(Vec3::X);
        d.take_damage(1);
        assert!(!d.dead, "death waits for the disc to settle");
        assert!(d.settle());
        assert!(d.dead);
        // Settling again does not report a second death
        assert!(!d.settle());
        assert!(d.dead);
    }

    #[test]
    fn test_roster_json_fills_defaults() {
        let specs: Vec<DiscSpec> = serde_json::from_str(
            r#"[{"name": "Ace", "team": "Player"}, {"name": "Boss", "team": "Npc", "skill_level": 90, "position": [1.0, -4.0]}]"#,
        )
        .unwrap();
        assert_eq!(specs[0].radius, DISC_RADIUS);
        assert_eq!(specs[0].hit_points, DISC_HIT_POINTS);
        assert_eq!(specs[0].position, None);
        assert_eq!(specs[1].skill_level, 90);
        assert_eq!(specs[1].position, Some((1.0, -4.0)));
    }
}
