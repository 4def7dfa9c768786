//! Game balance and physics tuning
//!
//! Persisted separately in LocalStorage on the web; native builds use defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physics, throw and AI parameters for a match.
///
/// Velocities are in world units per frame: the simulation integrates one
/// fixed step per host animation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Velocity multiplier applied every frame
    pub friction: f32,
    /// Below this speed a disc snaps to rest
    pub settle_epsilon: f32,
    /// Fraction of normal velocity kept after hitting the field edge
    pub wall_restitution: f32,
    /// Fraction of velocity kept after hitting an obstacle box
    pub obstacle_restitution: f32,
    /// Disc-disc restitution (1.0 = elastic exchange)
    pub disc_restitution: f32,
    /// Hit points removed per damaging contact
    pub damage_per_hit: u32,
    /// Force-settle after this many frames of motion (None = wait forever)
    pub settle_timeout_frames: Option<u32>,

    // === Player throws ===
    /// Drags shorter than this (pixels) are cancelled
    pub min_drag_px: f32,
    /// Drag length (pixels) that yields full speed
    pub drag_normalizer_px: f32,
    /// Speed of a full-length drag
    pub base_speed: f32,
    /// Any committed throw moves at least this fast
    pub min_speed: f32,

    // === AI ===
    /// Deviation cone half-angle at skill 0 (degrees)
    pub max_cone_degrees: f32,
    /// Points tested along a candidate path
    pub los_samples: u32,
    /// Candidate directions tried before falling back
    pub max_aim_attempts: u32,
    /// Extra launch speed at skill 100, as a fraction of the reach speed
    pub ai_overshoot: f32,

    // === Setup ===
    /// Random placement attempts per disc before the fallback spot is used
    pub max_placement_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            friction: 0.98,
            settle_epsilon: 0.01,
            wall_restitution: 0.8,
            obstacle_restitution: 0.8,
            disc_restitution: 1.0,
            damage_per_hit: 1,
            settle_timeout_frames: None,

            min_drag_px: 2.0,
            drag_normalizer_px: 200.0,
            base_speed: 1.2,
            min_speed: 0.05,

            max_cone_degrees: 30.0,
            los_samples: 20,
            max_aim_attempts: 10,
            ai_overshoot: 0.5,

            max_placement_attempts: 50,
        }
    }
}

/// Reasons a tuning set cannot drive a match
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// JSON could not be decoded
    Parse(String),
    /// A field is outside its valid range
    OutOfRange { field: &'static str, value: f32 },
    /// A count that must be at least one is zero
    ZeroCount(&'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(msg) => write!(f, "invalid tuning JSON: {msg}"),
            TuningError::OutOfRange { field, value } => {
                write!(f, "tuning field `{field}` out of range: {value}")
            }
            TuningError::ZeroCount(field) => write!(f, "tuning field `{field}` must be at least 1"),
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "disc_combat_tuning";

    /// Parse and validate a JSON tuning document (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> String {
        // Plain data with no maps or non-finite keys; serialisation cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Check every parameter is in a range the simulation can work with.
    ///
    /// A friction of exactly 1.0 is allowed but never settles; pair it with
    /// `settle_timeout_frames`.
    pub fn validate(&self) -> Result<(), TuningError> {
        unit_interval("friction", self.friction)?;
        unit_interval("wall_restitution", self.wall_restitution)?;
        unit_interval("obstacle_restitution", self.obstacle_restitution)?;
        unit_interval("disc_restitution", self.disc_restitution)?;
        positive("settle_epsilon", self.settle_epsilon)?;
        positive("min_drag_px", self.min_drag_px)?;
        positive("drag_normalizer_px", self.drag_normalizer_px)?;
        positive("base_speed", self.base_speed)?;
        positive("min_speed", self.min_speed)?;
        if self.min_speed <= self.settle_epsilon {
            // A minimum throw must be able to move at all
            return Err(TuningError::OutOfRange {
                field: "min_speed",
                value: self.min_speed,
            });
        }
        if !(0.0..=180.0).contains(&self.max_cone_degrees) {
            return Err(TuningError::OutOfRange {
                field: "max_cone_degrees",
                value: self.max_cone_degrees,
            });
        }
        if self.ai_overshoot < 0.0 || self.ai_overshoot.is_nan() {
            return Err(TuningError::OutOfRange {
                field: "ai_overshoot",
                value: self.ai_overshoot,
            });
        }
        if self.los_samples == 0 {
            return Err(TuningError::ZeroCount("los_samples"));
        }
        if self.max_aim_attempts == 0 {
            return Err(TuningError::ZeroCount("max_aim_attempts"));
        }
        if self.max_placement_attempts == 0 {
            return Err(TuningError::ZeroCount("max_placement_attempts"));
        }
        Ok(())
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("Tuning saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange { field, value })
    }
}
