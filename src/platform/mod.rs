//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (queued, consumed once per tick)
//! - Storage (LocalStorage on web)

pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod storage;

pub use input::{Control, InputQueue, PointerEvent};
