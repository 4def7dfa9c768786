//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering:
//! - One fixed physics step per frame
//! - Seeded RNG only
//! - Stable iteration order (disc list order)
//! - No renderer or platform dependencies

pub mod aim;
pub mod arena;
pub mod collision;
pub mod disc;
pub mod state;
pub mod throw;
pub mod tick;
pub mod turn;

pub use aim::{AimDecision, aim, select_target};
pub use arena::{Aabb, Arena};
pub use collision::{CollisionResult, reflect_velocity, resolve_disc_pair};
pub use disc::{Disc, DiscId, DiscSpec, Team};
pub use state::MatchState;
pub use throw::{ThrowCurve, ThrowRejection, drag_velocity};
pub use tick::{SimEvent, step};
pub use turn::{MatchOutcome, TurnManager, TurnPhase};
