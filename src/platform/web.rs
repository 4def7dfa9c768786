//! Browser bridge
//!
//! The page provides a `discRenderer` object with the scene functions below.
//! `WebGame` is driven from `requestAnimationFrame` and pointer listeners.

use glam::{Vec2, Vec3};
use wasm_bindgen::prelude::*;

use crate::game::{Game, default_roster};
use crate::present::{Presenter, ProxyHandle, ProxySpec, SceneQuery};
use crate::sim::arena::Aabb;
use crate::sim::disc::{DiscSpec, Team};
use crate::sim::turn::MatchOutcome;
use crate::tuning::Tuning;

mod js {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(js_namespace = discRenderer)]
    extern "C" {
        #[wasm_bindgen(js_name = createProxy)]
        pub fn create_proxy(name: &str, player: bool, x: f32, y: f32, z: f32, radius: f32, height: f32) -> u32;

        #[wasm_bindgen(js_name = setPosition)]
        pub fn set_position(handle: u32, x: f32, y: f32, z: f32);

        pub fn dispose(handle: u32);

        /// Flat `[min.x, min.y, min.z, max.x, max.y, max.z, ...]`
        #[wasm_bindgen(js_name = staticBounds)]
        pub fn static_bounds() -> js_sys::Float32Array;

        #[wasm_bindgen(js_name = cameraForward)]
        pub fn camera_forward() -> js_sys::Float32Array;

        /// Proxy handle under the pointer, or -1
        pub fn pick(x: f32, y: f32) -> i32;
    }
}

/// Renderer collaborator backed by the page's `discRenderer`
pub struct JsRenderer;

impl Presenter for JsRenderer {
    fn create_proxy(&mut self, spec: &ProxySpec) -> ProxyHandle {
        let p = spec.position;
        ProxyHandle(js::create_proxy(
            &spec.name,
            spec.team == Team::Player,
            p.x,
            p.y,
            p.z,
            spec.radius,
            spec.height,
        ))
    }

    fn set_position(&mut self, proxy: ProxyHandle, position: Vec3) {
        js::set_position(proxy.0, position.x, position.y, position.z);
    }

    fn dispose(&mut self, proxy: ProxyHandle) {
        js::dispose(proxy.0);
    }
}

impl SceneQuery for JsRenderer {
    fn static_bounds(&self) -> Vec<Aabb> {
        let flat = js::static_bounds().to_vec();
        if flat.len() % 6 != 0 {
            log::warn!("staticBounds returned {} floats, ignoring the trailing partial box", flat.len());
        }
        flat.chunks_exact(6)
            .map(|c| Aabb::new(Vec3::new(c[0], c[1], c[2]), Vec3::new(c[3], c[4], c[5])))
            .collect()
    }

    fn camera_forward(&self) -> Vec3 {
        match js::camera_forward().to_vec().as_slice() {
            [x, y, z, ..] => Vec3::new(*x, *y, *z),
            _ => Vec3::NEG_Z,
        }
    }

    fn pick(&self, screen: Vec2) -> Option<ProxyHandle> {
        u32::try_from(js::pick(screen.x, screen.y)).ok().map(ProxyHandle)
    }
}

/// A match running in the browser
#[wasm_bindgen]
pub struct WebGame {
    game: Game<JsRenderer>,
}

impl WebGame {
    fn build(seed: u32, width: f32, depth: f32, roster: &[DiscSpec]) -> WebGame {
        WebGame {
            game: Game::new(JsRenderer, seed as u64, Tuning::load(), width, depth, roster),
        }
    }
}

#[wasm_bindgen]
impl WebGame {
    /// Match with the default roster
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, width: f32, depth: f32) -> WebGame {
        Self::build(seed, width, depth, &default_roster())
    }

    /// Match with a roster given as a JSON array of disc specs
    pub fn with_roster(seed: u32, width: f32, depth: f32, roster_json: &str) -> Result<WebGame, JsValue> {
        let roster: Vec<DiscSpec> =
            serde_json::from_str(roster_json).map_err(|e| JsValue::from_str(&format!("invalid roster: {e}")))?;
        Ok(Self::build(seed, width, depth, &roster))
    }

    /// Run one frame; returns whether the match has ended
    pub fn frame(&mut self) -> bool {
        self.game.frame();
        self.game.outcome().is_some()
    }

    /// Returns whether a drag started
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.game.pointer_down(Vec2::new(x, y)).is_some()
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.game.pointer_move(Vec2::new(x, y));
    }

    /// Returns whether a throw was committed
    pub fn pointer_up(&mut self, x: f32, y: f32) -> bool {
        matches!(self.game.pointer_up(Some(Vec2::new(x, y))), Some(Ok(_)))
    }

    pub fn cancel_drag(&mut self) {
        self.game.cancel_drag();
    }

    /// Name of the disc holding the turn
    pub fn active_disc(&self) -> Option<String> {
        self.game.state().active_disc().map(|d| d.name.clone())
    }

    /// "player", "npc" or "draw" once decided
    pub fn outcome(&self) -> Option<String> {
        self.game.outcome().map(|o| {
            match o {
                MatchOutcome::PlayerVictory => "player",
                MatchOutcome::NpcVictory => "npc",
                MatchOutcome::Draw => "draw",
            }
            .to_string()
        })
    }

    /// Release every scene object
    pub fn dispose(&mut self) {
        self.game.teardown();
    }
}

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Disc Combat (web) loaded");
}
