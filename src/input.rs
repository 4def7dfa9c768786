//! Pointer drag tracking
//!
//! A drag starts on a disc that may throw, follows the pointer and commits a
//! throw on release.

use glam::{Vec2, Vec3};

use crate::sim::disc::DiscId;
use crate::sim::state::MatchState;
use crate::sim::throw::ThrowRejection;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    disc: DiscId,
    down: Vec2,
    last: Vec2,
}

/// Drag state between pointer-down and pointer-up
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    drag: Option<Drag>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Disc being dragged
    pub fn disc(&self) -> Option<DiscId> {
        self.drag.map(|d| d.disc)
    }

    /// Start a drag on the picked disc. Returns whether a drag began.
    pub fn pointer_down(&mut self, state: &MatchState, picked: Option<DiscId>, screen: Vec2) -> bool {
        let Some(disc) = picked else {
            return false;
        };
        if let Err(reason) = state.can_throw(disc) {
            log::debug!("Ignoring drag on {:?}: {}", disc, reason);
            return false;
        }
        self.drag = Some(Drag {
            disc,
            down: screen,
            last: screen,
        });
        true
    }

    pub fn pointer_move(&mut self, screen: Vec2) {
        if let Some(drag) = &mut self.drag {
            drag.last = screen;
        }
    }

    /// Finish the drag, releasing at `screen` or the last move position.
    ///
    /// Returns None when no drag was in progress.
    pub fn pointer_up(
        &mut self,
        state: &mut MatchState,
        screen: Option<Vec2>,
        camera_forward: Vec3,
    ) -> Option<Result<Vec3, ThrowRejection>> {
        let drag = self.drag.take()?;
        let release = screen.unwrap_or(drag.last);
        let result = state.throw_from_drag(drag.disc, drag.down, release, camera_forward);
        if let Err(reason) = &result {
            log::debug!("Throw cancelled: {}", reason);
        }
        Some(result)
    }

    pub fn cancel(&mut self) {
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::Arena;
    use crate::sim::disc::{DiscSpec, Team};
    use crate::sim::turn::TurnPhase;
    use crate::tuning::Tuning;

    const LOOK_NORTH: Vec3 = Vec3::new(0.0, -0.7, -0.7);

    fn state() -> MatchState {
        let roster = vec![
            DiscSpec::new("hero", Team::Player).at(0.0, 10.0),
            DiscSpec::new("brute", Team::Npc).at(0.0, -10.0),
        ];
        MatchState::scenario(1, Tuning::default(), Arena::default(), &roster)
    }

    #[test]
    fn test_drag_commits_on_release() {
        let mut state = state();
        let hero = state.discs[0].id;
        let mut drag = DragTracker::new();

        assert!(drag.pointer_down(&state, Some(hero), Vec2::new(300.0, 400.0)));
        drag.pointer_move(Vec2::new(300.0, 250.0));
        let velocity = drag.pointer_up(&mut state, None, LOOK_NORTH).unwrap().unwrap();

        assert!(velocity.z < 0.0);
        assert!(!drag.is_dragging());
        assert_eq!(state.phase(), TurnPhase::Thrown);
    }

    #[test]
    fn test_down_on_npc_or_nothing_is_ignored() {
        let state = state();
        let brute = state.discs[1].id;
        let mut drag = DragTracker::new();
        assert!(!drag.pointer_down(&state, Some(brute), Vec2::ZERO));
        assert!(!drag.pointer_down(&state, None, Vec2::ZERO));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_tiny_drag_cancels() {
        let mut state = state();
        let hero = state.discs[0].id;
        let mut drag = DragTracker::new();
        drag.pointer_down(&state, Some(hero), Vec2::new(10.0, 10.0));
        let result = drag.pointer_up(&mut state, Some(Vec2::new(11.0, 10.0)), LOOK_NORTH);
        assert_eq!(result, Some(Err(ThrowRejection::DragTooShort)));
        assert!(!state.discs[0].has_thrown);
        assert_eq!(state.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_cancel_resets() {
        let mut state = state();
        let hero = state.discs[0].id;
        let mut drag = DragTracker::new();
        drag.pointer_down(&state, Some(hero), Vec2::ZERO);
        drag.cancel();
        assert!(!drag.is_dragging());
        assert_eq!(drag.pointer_up(&mut state, Some(Vec2::new(0.0, -100.0)), LOOK_NORTH), None);
        assert!(!state.discs[0].has_thrown);
    }
}
