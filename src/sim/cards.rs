//! Card-matching variant
//!
//! The player flips two cards looking for the pair that combines to the
//! question's answer. After the second flip the board locks; the pair is
//! resolved at a deadline checked each tick, so pausing also holds the
//! pending flip-back.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::deck::{Combination, Deck, build_deck};
use crate::consts::CARD_REVEAL_MS;

/// Card game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardPhase {
    /// Waiting for flips
    Choosing,
    /// Two cards face up, resolving at the deadline
    Revealing,
    Paused,
    /// Correct pair found
    Solved { moves: u32 },
}

/// A pair flip awaiting resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct PendingReveal {
    deadline_ms: f64,
    correct: bool,
}

/// Card-matching session for one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardMatch {
    pub deck: Deck,
    /// Face-up card indices (at most two)
    pub flipped: Vec<usize>,
    pub moves: u32,
    pub phase: CardPhase,
    now_ms: f64,
    pending: Option<PendingReveal>,
    paused_from: Option<CardPhase>,
}

impl CardMatch {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            flipped: Vec::with_capacity(2),
            moves: 0,
            phase: CardPhase::Choosing,
            now_ms: 0.0,
            pending: None,
            paused_from: None,
        }
    }

    /// Deal a fresh deck for `target`
    pub fn deal(target: f64, size: usize, combination: Combination, rng: &mut impl Rng) -> Self {
        Self::new(build_deck(target, size, combination, rng))
    }

    /// Flip card `index` face up
    ///
    /// Ignored (returns false) while locked, paused or solved, for repeated
    /// or out-of-range cards.
    pub fn flip(&mut self, index: usize) -> bool {
        if self.phase != CardPhase::Choosing
            || index >= self.deck.len()
            || self.flipped.contains(&index)
            || self.flipped.len() >= 2
        {
            return false;
        }

        self.flipped.push(index);
        if let &[a, b] = self.flipped.as_slice() {
            self.moves += 1;
            self.phase = CardPhase::Revealing;
            self.pending = Some(PendingReveal {
                deadline_ms: self.now_ms + CARD_REVEAL_MS,
                correct: self.deck.check(a, b),
            });
        }
        true
    }

    /// Advance the session clock by `dt_ms`
    ///
    /// Returns the move count once, on the tick the deck is solved.
    pub fn tick(&mut self, dt_ms: f64) -> Option<u32> {
        if self.phase == CardPhase::Paused || matches!(self.phase, CardPhase::Solved { .. }) {
            return None;
        }
        self.now_ms += dt_ms;

        let pending = self.pending?;
        if self.now_ms < pending.deadline_ms {
            return None;
        }
        self.pending = None;

        if pending.correct {
            self.phase = CardPhase::Solved { moves: self.moves };
            log::info!("Card deck solved in {} moves", self.moves);
            Some(self.moves)
        } else {
            self.flipped.clear();
            self.phase = CardPhase::Choosing;
            None
        }
    }

    pub fn pause(&mut self) {
        if matches!(self.phase, CardPhase::Choosing | CardPhase::Revealing) {
            self.paused_from = Some(self.phase);
            self.phase = CardPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == CardPhase::Paused {
            self.phase = self.paused_from.take().unwrap_or(CardPhase::Choosing);
        }
    }

    pub fn is_locked(&self) -> bool {
        self.phase != CardPhase::Choosing
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.phase, CardPhase::Solved { .. })
    }

    pub fn is_face_up(&self, index: usize) -> bool {
        self.flipped.contains(&index) || self.is_solved()
    }
}
