//! Host-facing game loop
//!
//! `Game` wires a `MatchState` to a renderer: it builds the arena from the
//! renderer's static scene, keeps one proxy per disc, forwards pointer input
//! and pushes positions after every frame.

use glam::{Vec2, Vec3};

use crate::input::DragTracker;
use crate::present::{Presenter, ProxyTable, SceneQuery};
use crate::sim::arena::Arena;
use crate::sim::disc::{DiscId, DiscSpec, Team};
use crate::sim::state::MatchState;
use crate::sim::throw::ThrowRejection;
use crate::sim::tick::SimEvent;
use crate::sim::turn::MatchOutcome;
use crate::tuning::Tuning;

/// Two player discs against a weak and a sharp NPC
pub fn default_roster() -> Vec<DiscSpec> {
    vec![
        DiscSpec::new("Ace", Team::Player),
        DiscSpec::new("Blaze", Team::Player),
        DiscSpec::new("Grunt", Team::Npc).with_skill(40),
        DiscSpec::new("Sniper", Team::Npc).with_skill(85),
    ]
}

pub struct Game<R: Presenter + SceneQuery> {
    state: MatchState,
    proxies: ProxyTable,
    drag: DragTracker,
    renderer: R,
}

impl<R: Presenter + SceneQuery> Game<R> {
    pub fn new(mut renderer: R, seed: u64, tuning: Tuning, width: f32, depth: f32, roster: &[DiscSpec]) -> Self {
        let arena = Arena::from_bounds(width, depth, renderer.static_bounds());
        let state = MatchState::scenario(seed, tuning, arena, roster);

        let mut proxies = ProxyTable::new();
        proxies.attach(&mut renderer, &state.discs);
        proxies.sync(&mut renderer, &state.discs);

        log::info!(
            "Match ready: seed {}, {} discs, {} obstacles",
            seed,
            state.discs.len(),
            state.arena.obstacles.len()
        );

        Self {
            state,
            proxies,
            drag: DragTracker::new(),
            renderer,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn proxies(&self) -> &ProxyTable {
        &self.proxies
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.state.outcome()
    }

    /// Run one simulation frame and push positions to the renderer
    pub fn frame(&mut self) -> Vec<SimEvent> {
        let events = self.state.frame();
        self.proxies.sync(&mut self.renderer, &self.state.discs);
        events
    }

    /// Pointer pressed. Returns the disc a drag started on, if any.
    pub fn pointer_down(&mut self, screen: Vec2) -> Option<DiscId> {
        let picked = self
            .renderer
            .pick(screen)
            .and_then(|proxy| self.proxies.disc_for(proxy));
        if self.drag.pointer_down(&self.state, picked, screen) {
            picked
        } else {
            None
        }
    }

    pub fn pointer_move(&mut self, screen: Vec2) {
        self.drag.pointer_move(screen);
    }

    pub fn pointer_up(&mut self, screen: Option<Vec2>) -> Option<Result<Vec3, ThrowRejection>> {
        let camera_forward = self.renderer.camera_forward();
        self.drag.pointer_up(&mut self.state, screen, camera_forward)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Release every renderer object. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.drag.cancel();
        if !self.proxies.is_empty() {
            log::debug!("Tearing down {} proxies", self.proxies.len());
        }
        self.proxies.teardown(&mut self.renderer);
    }
}

impl<R: Presenter + SceneQuery> Drop for Game<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
