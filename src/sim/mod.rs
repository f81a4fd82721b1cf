//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, persistence or platform dependencies

pub mod cards;
pub mod clock;
pub mod collision;
pub mod deck;
pub mod effects;
pub mod gesture;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use cards::{CardMatch, CardPhase};
pub use collision::{Hit, resolve_segment};
pub use deck::{Card, Combination, Deck, build_deck};
pub use gesture::{GestureSample, GestureSegment, GestureTracker};
pub use spawn::Spawner;
pub use state::{
    ActiveModifiers, EntityIds, GameEvent, HitState, Modifier, MovingObject, ObjectKind, Outcome,
    RenderSnapshot, RoundPhase, RoundState, SliceGame, TargetCategory,
};
pub use tick::{TickInput, tick};
