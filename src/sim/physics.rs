//! Ballistic motion for moving objects

use super::state::{MovingObject, ObjectKind};
use crate::consts::*;
use crate::tuning::SliceTuning;

/// Advance every object by `dt` seconds of simulation time
///
/// `dt` should already include any time scaling. Untouched targets get a
/// small sideways wobble keyed to their age; touched objects fade instead.
pub fn integrate(objects: &mut [MovingObject], dt: f32, now_ms: f64, tuning: &SliceTuning) {
    for obj in objects.iter_mut() {
        obj.pos += obj.vel * dt;
        obj.vel.y += tuning.gravity * dt;

        if obj.is_touched() {
            obj.alpha = (obj.alpha - FADE_RATE * dt).max(0.0);
            continue;
        }

        if obj.kind == ObjectKind::Target {
            let age_secs = ((now_ms - obj.spawn_ms) / 1000.0) as f32;
            let wobble = (age_secs * tuning.wobble_frequency).sin() * tuning.wobble_amplitude;
            obj.pos.x += wobble * dt;
        }
    }
}

/// Whether an object has left the arena (with margin)
///
/// The bottom edge only counts once the object is falling, since everything
/// spawns below the arena on its way up.
pub fn out_of_bounds(obj: &MovingObject) -> bool {
    let p = obj.pos;
    p.x < -ARENA_MARGIN
        || p.x > ARENA_WIDTH + ARENA_MARGIN
        || (p.y > ARENA_HEIGHT + ARENA_MARGIN && obj.vel.y > 0.0)
}

/// Mark departed and faded objects dead and drop them
///
/// Returns how many objects were removed.
pub fn cull(objects: &mut Vec<MovingObject>) -> usize {
    for obj in objects.iter_mut() {
        if out_of_bounds(obj) || obj.alpha < VISIBILITY_THRESHOLD {
            obj.alive = false;
        }
    }
    let before = objects.len();
    objects.retain(|o| o.alive);
    before - objects.len()
}
