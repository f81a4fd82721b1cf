//! Math Slice - arithmetic learning mini-games
//!
//! Core modules:
//! - `sim`: Deterministic game logic (slice loop, card deck, card matching)
//! - `quiz`: Levels, questions and quiz session scoring
//! - `progress`: Level unlocking at the pass threshold
//! - `settings`: Player preferences (theme, reduced motion)
//! - `persistence`: Injected key/value storage with JSON helpers
//! - `platform`: Input events and browser storage
//! - `tuning`: Data-driven game balance
//! - `web`: wasm-bindgen wrappers for the browser page (wasm only)

pub mod persistence;
pub mod platform;
pub mod progress;
pub mod quiz;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use progress::Progress;
pub use quiz::{Level, Question, QuizSession};
pub use settings::{Settings, Theme};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display refresh at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions (arena-local units, y grows downward)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Objects further than this outside the arena are dropped
    pub const ARENA_MARGIN: f32 = 80.0;

    /// Lives at round start (and the upper bound)
    pub const MAX_LIVES: u8 = 4;

    /// Scoring hits closer together than this extend the combo
    pub const COMBO_WINDOW_MS: f64 = 600.0;
    /// Combo multiplier steps up every this many quick hits
    pub const COMBO_STEP: u32 = 3;

    /// Gesture samples older than this are pruned
    pub const GESTURE_WINDOW_MS: f64 = 200.0;

    /// Object radii
    pub const TARGET_RADIUS: f32 = 34.0;
    pub const HAZARD_RADIUS: f32 = 30.0;

    /// Alpha lost per second once an object has been sliced
    pub const FADE_RATE: f32 = 3.0;
    /// Faded objects below this alpha are removed
    pub const VISIBILITY_THRESHOLD: f32 = 0.05;

    /// Card-match flip-back delay
    pub const CARD_REVEAL_MS: f64 = 700.0;

    /// Deck size bounds for the card-matching variant
    pub const MIN_DECK_SIZE: usize = 4;
    pub const MAX_DECK_SIZE: usize = 12;
    pub const DEFAULT_DECK_SIZE: usize = 10;
    /// Targets outside +/- this are clamped before deck construction
    pub const MAX_TARGET_MAGNITUDE: i64 = 10_000;

    /// Percentage needed to pass a level
    pub const PASS_PERCENT: u32 = 70;
}

/// Shortest distance from `p` to the segment `a`-`b`
///
/// Projects `p` onto the segment and clamps the projection parameter to
/// [0, 1]. A degenerate segment collapses to point distance.
#[inline]
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < 0.0001 {
        return (p - a).length();
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    let closest = a + seg * t;
    (p - closest).length()
}
