//! Input events
//!
//! Event callbacks only push into an `InputQueue`; the game loop drains it
//! once per tick, so callback order never races the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pointer or touch event in arena-local coordinates
///
/// Samples are stamped with the round clock when the tick consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// External round control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Pause,
    Resume,
}

/// Buffer between event callbacks and the simulation
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pointer: Vec<PointerEvent>,
    control: Option<Control>,
    recovery_answer: Option<String>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.pointer.push(PointerEvent::Down(Vec2::new(x, y)));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.push(PointerEvent::Move(Vec2::new(x, y)));
    }

    pub fn pointer_up(&mut self) {
        self.pointer.push(PointerEvent::Up);
    }

    /// Latest control request wins
    pub fn control(&mut self, control: Control) {
        self.control = Some(control);
    }

    pub fn answer(&mut self, answer: impl Into<String>) {
        self.recovery_answer = Some(answer.into());
    }

    pub fn is_empty(&self) -> bool {
        self.pointer.is_empty() && self.control.is_none() && self.recovery_answer.is_none()
    }

    /// Take everything queued so far as one tick's input
    pub fn drain(&mut self) -> crate::sim::TickInput {
        crate::sim::TickInput {
            pointer: std::mem::take(&mut self.pointer),
            control: self.control.take(),
            recovery_answer: self.recovery_answer.take(),
            idle_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut q = InputQueue::new();
        q.pointer_down(1.0, 2.0);
        q.pointer_move(3.0, 4.0);
        q.pointer_up();
        q.control(Control::Pause);
        q.control(Control::Resume);
        q.answer("7");

        let input = q.drain();
        assert_eq!(input.pointer.len(), 3);
        assert_eq!(input.pointer[0], PointerEvent::Down(Vec2::new(1.0, 2.0)));
        assert_eq!(input.control, Some(Control::Resume));
        assert_eq!(input.recovery_answer.as_deref(), Some("7"));
        assert!(q.is_empty());
    }
}
