//! Disc Combat entry point
//!
//! Native builds play one headless match with simple auto-aimed player
//! throws and log the result. The browser build starts from
//! `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
use disc_combat::{
    Game, Tuning,
    game::default_roster,
    present::HeadlessRenderer,
    sim::{SimEvent, Team, TurnPhase},
};

/// Give up on a match that has not finished after this many frames
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 200_000;

/// Screen-space length of the demo player's drags
#[cfg(not(target_arch = "wasm32"))]
const DRAG_PX: f32 = 150.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use disc_combat::consts::{FIELD_DEPTH, FIELD_WIDTH};
    use glam::Vec2;

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    log::info!("Disc Combat (native) starting, seed {}", seed);

    let mut game = Game::new(
        HeadlessRenderer::new(),
        seed,
        Tuning::load(),
        FIELD_WIDTH,
        FIELD_DEPTH,
        &default_roster(),
    );

    let mut frames = 0u64;
    let mut hits = 0u32;
    while game.outcome().is_none() && frames < MAX_FRAMES {
        if game.state().phase() == TurnPhase::Idle
            && let Some((disc, delta)) = auto_drag(&game)
        {
            let proxy = game.proxies().proxy_for(disc);
            game.renderer_mut().pick_target = proxy;
            let start = Vec2::new(400.0, 300.0);
            game.pointer_down(start);
            if let Some(Err(reason)) = game.pointer_up(Some(start + delta)) {
                log::warn!("Demo throw rejected: {}", reason);
            }
        }

        hits += game
            .frame()
            .iter()
            .filter(|e| matches!(e, SimEvent::Damaged { .. }))
            .count() as u32;
        frames += 1;
    }

    match game.outcome() {
        Some(outcome) => log::info!(
            "{:?} after {} turns, {} frames, {} hits",
            outcome,
            game.state().turn.turns_taken,
            frames,
            hits
        ),
        None => log::warn!("No result after {} frames", frames),
    }
    game.teardown();
}

/// Drag that throws the active player disc at the nearest NPC.
///
/// The demo camera looks along -Z, so screen x maps to world x and screen y
/// to world z.
#[cfg(not(target_arch = "wasm32"))]
fn auto_drag(game: &Game<HeadlessRenderer>) -> Option<(disc_combat::sim::DiscId, glam::Vec2)> {
    let state = game.state();
    let active = state.active_disc().filter(|d| d.team == Team::Player)?;
    let target = state
        .discs
        .iter()
        .filter(|d| d.team == Team::Npc && d.is_alive())
        .min_by(|a, b| {
            let da = disc_combat::planar_distance(active.position, a.position);
            let db = disc_combat::planar_distance(active.position, b.position);
            da.total_cmp(&db)
        })?;
    let dir = disc_combat::flatten(target.position - active.position).try_normalize()?;
    Some((active.id, glam::Vec2::new(dir.x, dir.z) * DRAG_PX))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main
}
