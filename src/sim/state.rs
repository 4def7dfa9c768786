//! Match state
//!
//! `MatchState` owns everything the simulation needs for one match. It is
//! created by the host, driven one frame at a time, and dropped at teardown.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::aim::{self, AimDecision};
use super::arena::Arena;
use super::disc::{Disc, DiscId, DiscSpec, Team};
use super::throw::{self, ThrowRejection};
use super::tick::{self, SimEvent};
use super::turn::{MatchOutcome, TurnManager, TurnPhase};
use crate::tuning::Tuning;

/// Complete state of one match
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub arena: Arena,
    /// Discs in turn order
    pub discs: Vec<Disc>,
    pub turn: TurnManager,
    /// Simulation frame counter
    pub frame_count: u64,
    /// Most recent NPC decision
    pub last_aim: Option<AimDecision>,
    rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl MatchState {
    /// Create an empty match with the given seed
    pub fn new(seed: u64, tuning: Tuning, arena: Arena) -> Self {
        Self {
            seed,
            tuning,
            arena,
            discs: Vec::new(),
            turn: TurnManager::new(),
            frame_count: 0,
            last_aim: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Create a match, place every disc and hand out the first turn
    pub fn scenario(seed: u64, tuning: Tuning, arena: Arena, roster: &[DiscSpec]) -> Self {
        let mut state = Self::new(seed, tuning, arena);
        for spec in roster {
            state.spawn_disc(spec);
        }
        state.start();
        state
    }

    /// Allocate a new entity ID
    pub fn next_disc_id(&mut self) -> DiscId {
        let id = DiscId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a disc, placing it randomly in its team's half unless its `DiscSpec`
    /// fixes a position.
    pub fn spawn_disc(&mut self, spec: &DiscSpec) -> DiscId {
        let id = self.next_disc_id();
        let (x, z) = match spec.position {
            Some((x, z)) => {
                let at = Vec3::new(x, spec.height / 2.0, z);
                if !self.spot_is_free(at, spec.radius) {
                    log::warn!("{} placed at ({}, {}) overlapping the arena or another disc", spec.name, x, z);
                }
                (x, z)
            }
            None => self.find_spawn_point(spec),
        };

        let disc = Disc::new(id, spec, x, z);
        log::debug!("Spawned {} ({:?}) at ({:.1}, {:.1})", disc.name, disc.team, x, z);
        self.discs.push(disc);
        id
    }

    fn spot_is_free(&self, at: Vec3, radius: f32) -> bool {
        !self.arena.disc_overlaps(at, radius)
            && self
                .discs
                .iter()
                .all(|d| crate::planar_distance(d.position, at) >= d.radius + radius)
    }

    /// Team spawn zone as (min, max) corners in x/z
    fn spawn_zone(&self, team: Team, radius: f32) -> (Vec2, Vec2) {
        let half = self.arena.half_extents();
        let x = (half.x - radius).max(0.0);
        let far = (half.y - radius).max(0.0);
        let near = radius.min(far);
        match team {
            Team::Player => (Vec2::new(-x, near), Vec2::new(x, far)),
            Team::Npc => (Vec2::new(-x, -far), Vec2::new(x, -near)),
        }
    }

    fn find_spawn_point(&mut self, spec: &DiscSpec) -> (f32, f32) {
        let (lo, hi) = self.spawn_zone(spec.team, spec.radius);
        let y = spec.height / 2.0;

        for _ in 0..self.tuning.max_placement_attempts {
            let x = self.rng.random_range(lo.x..=hi.x);
            let z = self.rng.random_range(lo.y..=hi.y);
            if self.spot_is_free(Vec3::new(x, y, z), spec.radius) {
                return (x, z);
            }
        }

        // Fallback: first free cell scanning the zone on a disc-sized grid
        let step = (spec.radius * 2.0).max(0.1);
        let mut z = lo.y;
        while z <= hi.y {
            let mut x = lo.x;
            while x <= hi.x {
                if self.spot_is_free(Vec3::new(x, y, z), spec.radius) {
                    log::warn!(
                        "No random spot for {} after {} attempts, using ({:.1}, {:.1})",
                        spec.name,
                        self.tuning.max_placement_attempts,
                        x,
                        z
                    );
                    return (x, z);
                }
                x += step;
            }
            z += step;
        }

        let center = (lo + hi) * 0.5;
        log::warn!(
            "No free spot for {} anywhere in its zone, placing at zone centre ({:.1}, {:.1})",
            spec.name,
            center.x,
            center.y
        );
        (center.x, center.y)
    }

    /// Hand out the first turn
    pub fn start(&mut self) {
        self.turn = TurnManager::new();
        match self.turn.start(&mut self.discs) {
            Some(index) => self.begin_turn(index),
            None => log::warn!("Match decided before the first turn: {:?}", self.turn.outcome()),
        }
    }

    pub fn disc(&self, id: DiscId) -> Option<&Disc> {
        self.discs.iter().find(|d| d.id == id)
    }

    pub fn index_of(&self, id: DiscId) -> Option<usize> {
        self.discs.iter().position(|d| d.id == id)
    }

    /// Disc holding the turn
    pub fn active_disc(&self) -> Option<&Disc> {
        self.turn.active_index().and_then(|i| self.discs.get(i))
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase()
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.turn.outcome()
    }

    /// Nothing in the arena is moving
    pub fn is_quiet(&self) -> bool {
        self.discs.iter().all(|d| !d.moving)
    }

    /// Whether a player may start a drag on this disc right now
    pub fn can_throw(&self, id: DiscId) -> Result<(), ThrowRejection> {
        let index = self.index_of(id).ok_or(ThrowRejection::UnknownDisc)?;
        throw::check_player_throw(&self.discs, self.turn.active_index(), index)?;
        if self.turn.phase() != TurnPhase::Idle {
            return Err(ThrowRejection::AlreadyThrown);
        }
        Ok(())
    }

    /// Commit a player drag from `down` to `up` (screen pixels).
    ///
    /// Returns the launch velocity. A rejected throw changes nothing.
    pub fn throw_from_drag(
        &mut self,
        id: DiscId,
        down: Vec2,
        up: Vec2,
        camera_forward: Vec3,
    ) -> Result<Vec3, ThrowRejection> {
        self.can_throw(id)?;
        let velocity = throw::drag_velocity(down, up, camera_forward, &self.tuning)?;
        let index = self.index_of(id).ok_or(ThrowRejection::UnknownDisc)?;
        self.commit_throw(index, velocity);
        Ok(velocity)
    }

    fn commit_throw(&mut self, index: usize, velocity: Vec3) {
        let disc = &mut self.discs[index];
        disc.commit_throw(velocity);
        log::debug!("{} throws at speed {:.2}", disc.name, velocity.length());
        self.turn.on_throw(disc.id);
    }

    fn begin_turn(&mut self, index: usize) {
        let disc = &self.discs[index];
        log::debug!("{}'s turn ({:?})", disc.name, disc.team);
        if disc.team == Team::Npc {
            self.run_ai(index);
        }
    }

    /// Aim and throw for the NPC at `index`
    fn run_ai(&mut self, index: usize) {
        match aim::aim(&self.discs, index, &self.arena, &self.tuning, &mut self.rng) {
            Some(decision) => {
                self.last_aim = Some(decision);
                self.commit_throw(index, decision.velocity());
            }
            None => {
                // Unreachable while the turn manager checks for a decided match
                log::warn!("{} has no target to aim at", self.discs[index].name);
            }
        }
    }

    /// Advance the match by one frame.
    ///
    /// Runs physics, passes its events to the turn order and lets an NPC
    /// throw straight away when the turn reaches it.
    pub fn frame(&mut self) -> Vec<SimEvent> {
        if self.turn.is_over() {
            return Vec::new();
        }

        self.turn.begin_frame();
        let active = self.active_disc().map(|d| d.id);
        let events = tick::step(&mut self.discs, &self.arena, &self.tuning, active);
        self.frame_count += 1;

        if let Some(index) = self.turn.handle_events(&events, &mut self.discs) {
            self.begin_turn(index);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOK_NORTH: Vec3 = Vec3::new(0.0, -0.7, -0.7);

    fn duel() -> Vec<DiscSpec> {
        vec![
            DiscSpec::new("hero", Team::Player).at(0.0, 10.0),
            DiscSpec::new("brute", Team::Npc).at(0.0, -10.0),
        ]
    }

    #[test]
    fn test_scenario_starts_with_first_disc() {
        let state = MatchState::scenario(1, Tuning::default(), Arena::default(), &duel());
        assert_eq!(state.active_disc().map(|d| d.name.as_str()), Some("hero"));
        assert_eq!(state.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_random_placement_does_not_overlap() {
        let arena = Arena::default().with_obstacle(crate::sim::arena::Aabb::footprint(0.0, 8.0, 4.0, 2.0, 2.0));
        let mut roster = Vec::new();
        for i in 0..6 {
            roster.push(DiscSpec::new(format!("p{i}"), Team::Player));
            roster.push(DiscSpec::new(format!("n{i}"), Team::Npc));
        }
        let state = MatchState::scenario(99, Tuning::default(), arena, &roster);

        for (i, a) in state.discs.iter().enumerate() {
            assert!(!state.arena.disc_overlaps(a.position, a.radius));
            match a.team {
                Team::Player => assert!(a.position.z > 0.0),
                Team::Npc => assert!(a.position.z < 0.0),
            }
            for b in &state.discs[i + 1..] {
                assert!(crate::planar_distance(a.position, b.position) >= a.radius + b.radius);
            }
        }
    }

    #[test]
    fn test_placement_is_deterministic_per_seed() {
        let roster = vec![DiscSpec::new("a", Team::Player), DiscSpec::new("b", Team::Npc)];
        let one = MatchState::scenario(5, Tuning::default(), Arena::default(), &roster);
        let two = MatchState::scenario(5, Tuning::default(), Arena::default(), &roster);
        for (a, b) in one.discs.iter().zip(&two.discs) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn test_crowded_zone_falls_back() {
        let tuning = Tuning {
            max_placement_attempts: 1,
            ..Default::default()
        };
        let roster: Vec<DiscSpec> = (0..40)
            .map(|i| DiscSpec::new(format!("p{i}"), Team::Player))
            .collect();
        let mut state = MatchState::new(3, tuning, Arena::open(12.0, 12.0));
        for spec in &roster {
            state.spawn_disc(spec);
        }
        assert_eq!(state.discs.len(), 40);
        assert!(state.discs.iter().all(|d| d.position.is_finite()));
    }

    #[test]
    fn test_short_drag_is_a_no_op() {
        let mut state = MatchState::scenario(1, Tuning::default(), Arena::default(), &duel());
        let hero = state.discs[0].id;
        let result = state.throw_from_drag(hero, Vec2::new(100.0, 100.0), Vec2::new(101.0, 100.0), LOOK_NORTH);
        assert_eq!(result, Err(ThrowRejection::DragTooShort));
        assert!(!state.discs[0].has_thrown);
        assert!(!state.discs[0].moving);
        assert_eq!(state.discs[0].velocity, Vec3::ZERO);
        assert_eq!(state.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_throw_guards() {
        let mut state = MatchState::scenario(1, Tuning::default(), Arena::default(), &duel());
        let hero = state.discs[0].id;
        let brute = state.discs[1].id;
        let (down, up) = (Vec2::new(0.0, 0.0), Vec2::new(0.0, -100.0));

        assert_eq!(state.throw_from_drag(brute, down, up, LOOK_NORTH), Err(ThrowRejection::NotYourTurn));
        assert!(state.throw_from_drag(hero, down, up, LOOK_NORTH).is_ok());
        assert_eq!(state.throw_from_drag(hero, down, up, LOOK_NORTH), Err(ThrowRejection::AlreadyThrown));
        assert_eq!(state.throw_from_drag(DiscId(99), down, up, LOOK_NORTH), Err(ThrowRejection::UnknownDisc));
    }

    #[test]
    fn test_commit_sets_flags_and_arms_turn() {
        let mut state = MatchState::scenario(1, Tuning::default(), Arena::default(), &duel());
        let hero = state.discs[0].id;
        state.discs[0].has_caused_damage = true;
        let v = state
            .throw_from_drag(hero, Vec2::ZERO, Vec2::new(0.0, -150.0), LOOK_NORTH)
            .unwrap();
        let disc = &state.discs[0];
        assert_eq!(disc.velocity, v);
        assert!(v.z < 0.0 && v.y == 0.0);
        assert!(disc.moving && disc.has_thrown && !disc.has_caused_damage);
        assert_eq!(state.phase(), TurnPhase::Thrown);
        state.frame();
        assert_eq!(state.phase(), TurnPhase::Settling);
    }

    #[test]
    fn test_npc_throws_immediately_on_handoff() {
        let mut state = MatchState::scenario(4, Tuning::default(), Arena::default(), &duel());
        let hero = state.discs[0].id;
        state
            .throw_from_drag(hero, Vec2::ZERO, Vec2::new(60.0, 0.0), LOOK_NORTH)
            .unwrap();
        for _ in 0..20_000 {
            state.frame();
            if state.active_disc().map(|d| d.id) != Some(hero) {
                break;
            }
        }

        // The handoff frame already launched the NPC
        let brute = &state.discs[1];
        assert_eq!(state.active_disc().map(|d| d.id), Some(brute.id));
        assert!(brute.has_thrown && brute.moving);
        assert_eq!(state.phase(), TurnPhase::Thrown);
        assert_eq!(state.last_aim.map(|a| a.target), Some(hero));
    }

    #[test]
    fn test_one_hit_per_throw_while_arena_settles() {
        // Narrow field so the struck disc keeps bouncing back into the thrower
        let roster = vec![
            DiscSpec::new("hero", Team::Player).at(0.0, 4.0),
            DiscSpec::new("brute", Team::Npc).at(0.0, 0.9).with_hit_points(5),
        ];
        let mut state = MatchState::scenario(2, Tuning::default(), Arena::open(40.0, 16.0), &roster);
        let hero = state.discs[0].id;
        assert!(!state.discs[0].can_rebound_damage);
        state
            .throw_from_drag(hero, Vec2::ZERO, Vec2::new(0.0, -200.0), LOOK_NORTH)
            .unwrap();

        let mut hits = 0;
        let mut handed_on = false;
        for _ in 0..20_000 {
            let events = state.frame();
            hits += events
                .iter()
                .filter(|e| matches!(e, SimEvent::Damaged { attacker, .. } if *attacker == hero))
                .count();
            if state.active_disc().map(|d| d.id) != Some(hero) {
                handed_on = true;
                break;
            }
        }

        assert!(handed_on);
        assert_eq!(hits, 1);
        assert_eq!(state.discs[1].hit_points, 4);
    }

    #[test]
    fn test_full_match_terminates() {
        let roster = vec![
            DiscSpec::new("hero", Team::Player).at(0.0, 6.0).with_hit_points(1),
            DiscSpec::new("sniper", Team::Npc).at(0.0, -6.0).with_skill(100),
        ];
        let mut state = MatchState::scenario(11, Tuning::default(), Arena::default(), &roster);
        // Hero throws wide; the perfect NPC then knocks it out
        let hero = state.discs[0].id;
        state
            .throw_from_drag(hero, Vec2::ZERO, Vec2::new(40.0, 0.0), LOOK_NORTH)
            .unwrap();
        for _ in 0..50_000 {
            state.frame();
            if state.outcome().is_some() {
                break;
            }
            if state.phase() == TurnPhase::Idle {
                // Player turn again: keep throwing sideways
                let hero = state.discs[0].id;
                let _ = state.throw_from_drag(hero, Vec2::ZERO, Vec2::new(-40.0, 0.0), LOOK_NORTH);
            }
        }
        assert_eq!(state.outcome(), Some(MatchOutcome::NpcVictory));
        assert!(state.discs[0].dead);
        // No more frames run once decided
        let frames = state.frame_count;
        assert!(state.frame().is_empty());
        assert_eq!(state.frame_count, frames);
    }
}
