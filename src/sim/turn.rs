//! Turn order
//!
//! Turns cycle through the disc list in order, skipping the fallen. A turn
//! ends once the thrown disc has settled and nothing else in the arena is
//! still sliding.

use serde::{Deserialize, Serialize};

use super::disc::{Disc, DiscId, Team};
use super::tick::SimEvent;

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Every NPC is out
    PlayerVictory,
    /// Every player disc is out
    NpcVictory,
    /// Nobody is left standing
    Draw,
}

/// Where the current turn is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the active disc's throw
    Idle,
    /// Velocity assigned, physics not yet run
    Thrown,
    /// Discs are sliding
    Settling,
    /// Handing the turn to the next living disc
    Advancing,
    /// No further turns
    Over(MatchOutcome),
}

/// Cyclic turn order over the living discs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnManager {
    index: usize,
    phase: TurnPhase,
    /// Disc whose throw the current turn is waiting on
    awaiting: Option<DiscId>,
    /// The awaited disc has come to rest
    thrower_settled: bool,
    /// Completed turns
    pub turns_taken: u32,
}

impl Default for TurnManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnManager {
    pub fn new() -> Self {
        Self {
            index: 0,
            phase: TurnPhase::Idle,
            awaiting: None,
            thrower_settled: false,
            turns_taken: 0,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Index of the disc holding the turn (None once the match is over)
    pub fn active_index(&self) -> Option<usize> {
        match self.phase {
            TurnPhase::Over(_) => None,
            _ => Some(self.index),
        }
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        match self.phase {
            TurnPhase::Over(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Decide whether the match is finished
    pub fn evaluate(discs: &[Disc]) -> Option<MatchOutcome> {
        let living = |team: Team| discs.iter().any(|d| d.team == team && d.is_alive());
        match (living(Team::Player), living(Team::Npc)) {
            (true, true) => None,
            (true, false) => Some(MatchOutcome::PlayerVictory),
            (false, true) => Some(MatchOutcome::NpcVictory),
            (false, false) => Some(MatchOutcome::Draw),
        }
    }

    /// Hand the first turn to the first living disc in list order.
    /// Returns the active index, or None if the match is already decided.
    pub fn start(&mut self, discs: &mut [Disc]) -> Option<usize> {
        self.index = discs.len().saturating_sub(1);
        self.turns_taken = 0;
        self.advance_inner(discs, false)
    }

    /// The active disc committed a throw
    pub fn on_throw(&mut self, disc: DiscId) {
        self.phase = TurnPhase::Thrown;
        self.awaiting = Some(disc);
        self.thrower_settled = false;
    }

    /// Mark the start of a physics frame
    pub fn begin_frame(&mut self) {
        if self.phase == TurnPhase::Thrown {
            self.phase = TurnPhase::Settling;
        }
    }

    /// Consume a frame's events. Returns the new active index when the turn
    /// was handed on.
    ///
    /// The turn is held until the thrower has settled and every other disc
    /// has stopped too, not just the thrower. Discs it struck can still slide
    /// back into it meanwhile, so its damage latch lives until `advance`.
    pub fn handle_events(&mut self, events: &[SimEvent], discs: &mut [Disc]) -> Option<usize> {
        if !matches!(self.phase, TurnPhase::Thrown | TurnPhase::Settling) {
            return None;
        }
        let awaiting = self.awaiting?;

        let mut any_settled = false;
        for event in events {
            if let SimEvent::Settled { disc } = *event {
                any_settled = true;
                if disc == awaiting {
                    self.thrower_settled = true;
                }
            }
        }

        if any_settled && self.thrower_settled && discs.iter().all(|d| !d.moving) {
            return self.advance(discs);
        }
        None
    }

    /// Hand the turn to the next living disc after the current one.
    /// Returns the new active index, or None if the match ended.
    pub fn advance(&mut self, discs: &mut [Disc]) -> Option<usize> {
        self.advance_inner(discs, true)
    }

    fn advance_inner(&mut self, discs: &mut [Disc], completed_turn: bool) -> Option<usize> {
        if self.is_over() {
            return None;
        }
        self.phase = TurnPhase::Advancing;
        self.awaiting = None;
        self.thrower_settled = false;
        if completed_turn {
            self.turns_taken += 1;
        }
        for disc in discs.iter_mut() {
            disc.has_caused_damage = false;
        }

        if let Some(outcome) = Self::evaluate(discs) {
            log::info!("Match over after {} turns: {:?}", self.turns_taken, outcome);
            self.phase = TurnPhase::Over(outcome);
            return None;
        }

        // evaluate() guarantees a living disc exists, so the walk terminates
        let n = discs.len();
        let next = (1..=n)
            .map(|step| (self.index + step) % n)
            .find(|&i| discs[i].is_alive())?;

        self.index = next;
        discs[next].has_thrown = false;
        self.phase = TurnPhase::Idle;
        log::debug!("Turn {}: {}", self.turns_taken + 1, discs[next].name);
        Some(next)
    }
}
