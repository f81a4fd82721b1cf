//! Swipe path tracking
//!
//! Pointer-down anchors a path, moves extend it, pointer-up releases the
//! anchor. Samples older than the gesture window are pruned every tick so
//! stale segments can never slice anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::GESTURE_WINDOW_MS;

/// One timestamped pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    pub pos: Vec2,
    pub t_ms: f64,
}

/// The motion between two consecutive samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSegment {
    pub from: GestureSample,
    pub to: GestureSample,
}

/// Active swipe path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GestureTracker {
    /// Path buffer (oldest first)
    samples: Vec<GestureSample>,
    /// Pointer currently held down
    active: bool,
}

impl GestureTracker {
    /// Pointer down: start a fresh path
    pub fn begin(&mut self, pos: Vec2, t_ms: f64) {
        self.samples.clear();
        self.samples.push(GestureSample { pos, t_ms });
        self.active = true;
    }

    /// Pointer move: append a sample and return the new segment
    ///
    /// Moves without a held pointer are ignored.
    pub fn extend(&mut self, pos: Vec2, t_ms: f64) -> Option<GestureSegment> {
        if !self.active {
            return None;
        }
        let sample = GestureSample { pos, t_ms };
        let segment = self.samples.last().map(|&from| GestureSegment { from, to: sample });
        self.samples.push(sample);
        segment
    }

    /// Pointer up: release the anchor, keep the trail until it ages out
    pub fn end(&mut self) {
        self.active = false;
    }

    /// Drop samples older than the gesture window
    ///
    /// A held pointer keeps its latest sample as the anchor for the next
    /// move, however old it is.
    pub fn prune(&mut self, now_ms: f64) {
        let cutoff = now_ms - GESTURE_WINDOW_MS;
        let anchor = if self.active { self.samples.pop() } else { None };
        self.samples.retain(|s| s.t_ms >= cutoff);
        self.samples.extend(anchor);
    }

    /// Forget the path entirely
    pub fn clear(&mut self) {
        self.samples.clear();
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Two most recent samples, if any
    pub fn latest_segment(&self) -> Option<GestureSegment> {
        match self.samples.as_slice() {
            [.., from, to] => Some(GestureSegment { from: *from, to: *to }),
            _ => None,
        }
    }

    /// Trail points for rendering (oldest first)
    pub fn trail(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.samples.iter().map(|s| s.pos)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_requires_anchor() {
        let mut g = GestureTracker::default();
        assert!(g.extend(Vec2::new(1.0, 1.0), 0.0).is_none());
        assert!(g.is_empty());

        g.begin(Vec2::ZERO, 0.0);
        let seg = g.extend(Vec2::new(10.0, 0.0), 16.0).unwrap();
        assert_eq!(seg.from.pos, Vec2::ZERO);
        assert_eq!(seg.to.pos, Vec2::new(10.0, 0.0));
        assert_eq!(g.latest_segment(), Some(seg));
    }

    #[test]
    fn test_release_stops_extension_but_keeps_trail() {
        let mut g = GestureTracker::default();
        g.begin(Vec2::ZERO, 0.0);
        g.extend(Vec2::new(5.0, 5.0), 10.0);
        g.end();
        assert!(!g.is_active());
        assert!(g.extend(Vec2::new(9.0, 9.0), 20.0).is_none());
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_prune_drops_stale_samples() {
        let mut g = GestureTracker::default();
        g.begin(Vec2::ZERO, 0.0);
        g.extend(Vec2::new(5.0, 0.0), 100.0);
        g.extend(Vec2::new(10.0, 0.0), 250.0);

        g.prune(300.0);
        assert_eq!(g.len(), 2);
        assert!(g.latest_segment().is_some());

        g.prune(460.0);
        assert_eq!(g.len(), 0);
        assert!(g.latest_segment().is_none());
    }

    #[test]
    fn test_prune_keeps_anchor_of_held_pointer() {
        let mut g = GestureTracker::default();
        g.begin(Vec2::ZERO, 0.0);
        g.extend(Vec2::new(5.0, 0.0), 10.0);

        g.prune(1_000.0);
        assert_eq!(g.len(), 1);
        assert!(g.latest_segment().is_none());

        let seg = g.extend(Vec2::new(50.0, 0.0), 1_016.0).unwrap();
        assert_eq!(seg.from.pos, Vec2::new(5.0, 0.0));

        // Released paths age out completely
        g.end();
        g.prune(2_000.0);
        assert!(g.is_empty());
    }
}
