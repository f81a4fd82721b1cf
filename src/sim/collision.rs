//! Swipe hit-testing
//!
//! A swipe segment touches an object when the object's center lies within
//! its radius of the segment. Each object can be touched once; touched
//! objects are skipped so a swipe never double-scores.

use glam::Vec2;

use super::gesture::GestureSegment;
use super::state::{MovingObject, ObjectKind, TargetCategory};
use crate::point_segment_distance;

/// A first touch produced by a swipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: u32,
    pub kind: ObjectKind,
    pub category: Option<TargetCategory>,
    /// Base points (before combo)
    pub points: u32,
    /// Where the object was when sliced
    pub pos: Vec2,
}

/// Check whether a circle intersects the segment
#[inline]
pub fn segment_touches(segment: &GestureSegment, center: Vec2, radius: f32) -> bool {
    point_segment_distance(center, segment.from.pos, segment.to.pos) <= radius
}

/// Test every untouched object against one swipe segment
///
/// Objects are visited in order and marked touched on first contact. Testing
/// stops after the first hazard, since a hazard suspends scoring.
pub fn resolve_segment(segment: &GestureSegment, objects: &mut [MovingObject]) -> Vec<Hit> {
    let mut hits = Vec::new();

    for obj in objects.iter_mut() {
        if obj.is_touched() || !obj.alive {
            continue;
        }
        if !segment_touches(segment, obj.pos, obj.radius) {
            continue;
        }
        if !obj.touch() {
            continue;
        }

        hits.push(Hit {
            id: obj.id,
            kind: obj.kind,
            category: obj.category,
            points: obj.points,
            pos: obj.pos,
        });

        if obj.kind == ObjectKind::Hazard {
            log::trace!("Hazard {} sliced, stopping segment", obj.id);
            break;
        }
    }

    hits
}

/// Whether any untouched hazard lies on the segment (used by the autopilot)
pub fn segment_crosses_hazard(segment: &GestureSegment, objects: &[MovingObject]) -> bool {
    objects.iter().any(|o| {
        o.kind == ObjectKind::Hazard && !o.is_touched() && segment_touches(segment, o.pos, o.radius)
    })
}
