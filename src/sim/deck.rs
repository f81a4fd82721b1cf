//! Card deck generation with a unique solution
//!
//! A deck holds exactly one pair of cards that combines to the target. Every
//! distractor is drawn so it cannot complete a second pair with anything
//! already in the deck, then the whole deck is shuffled.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Random draws before falling back to a deterministic scan
const MAX_DRAWS: u32 = 1_000;
/// Distractor headroom beyond the target (matches the card game's feel)
const DISTRACTOR_PAD: i64 = 20;
/// Minimum distractor range upper bound
const MIN_DISTRACTOR_MAX: i64 = 50;
/// Extra spread used by signed decks
const SIGNED_SPAN: i64 = 30;

/// How two cards combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Combination {
    /// Plain addition
    #[default]
    Sum,
    /// Subtraction framed as adding a negative number
    SignedSum,
}

/// One card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub value: i64,
}

/// A shuffled deck with one solving pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub target: i64,
    pub combination: Combination,
    pub cards: Vec<Card>,
}

impl Deck {
    /// Whether cards `a` and `b` solve the deck
    pub fn check(&self, a: usize, b: usize) -> bool {
        if a == b {
            return false;
        }
        match (self.cards.get(a), self.cards.get(b)) {
            (Some(x), Some(y)) => x.value + y.value == self.target,
            _ => false,
        }
    }

    /// Indices of the solving pair
    pub fn solution(&self) -> Option<(usize, usize)> {
        let n = self.cards.len();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .find(|&(i, j)| self.check(i, j))
    }

    /// Number of index pairs that solve the deck (1 for a valid deck)
    pub fn count_solutions(&self) -> usize {
        let n = self.cards.len();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.check(i, j))
            .count()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Bring an arbitrary target into the supported range
///
/// Non-finite values become 0; everything is rounded and clamped.
pub fn sanitize_target(raw: f64) -> i64 {
    if !raw.is_finite() {
        log::warn!("Non-finite deck target {raw}, using 0");
        return 0;
    }
    let limit = MAX_TARGET_MAGNITUDE as f64;
    if raw.abs() > limit {
        log::warn!("Deck target {raw} out of range, clamping");
    }
    raw.round().clamp(-limit, limit) as i64
}

fn sanitize_size(size: usize) -> usize {
    let clamped = size.clamp(MIN_DECK_SIZE, MAX_DECK_SIZE);
    if clamped != size {
        log::warn!("Deck size {size} out of range, using {clamped}");
    }
    clamped
}

/// Range of values the correct first card is drawn from
fn pair_range(target: i64, combination: Combination) -> (i64, i64) {
    match combination {
        Combination::Sum => (target.min(0), target.max(0)),
        Combination::SignedSum => {
            let base = target.max(0);
            (base, base + SIGNED_SPAN)
        }
    }
}

/// Range of values distractors are drawn from
fn distractor_range(target: i64, combination: Combination) -> (i64, i64) {
    match combination {
        Combination::Sum if target >= 0 => (0, (target + DISTRACTOR_PAD).max(MIN_DISTRACTOR_MAX)),
        Combination::Sum => ((target - DISTRACTOR_PAD).min(-MIN_DISTRACTOR_MAX), 0),
        Combination::SignedSum => (target.min(0) - SIGNED_SPAN, target.max(0) + SIGNED_SPAN),
    }
}

/// Whether `candidate` can join the deck without creating a second answer
fn acceptable(candidate: i64, values: &[i64], target: i64) -> bool {
    !values.iter().any(|&v| v == candidate || v + candidate == target)
}

/// Build a deck of `size` cards for `target`
pub fn build_deck(target: f64, size: usize, combination: Combination, rng: &mut impl Rng) -> Deck {
    let target = sanitize_target(target);
    let size = sanitize_size(size);

    let (lo, hi) = pair_range(target, combination);
    let first = rng.random_range(lo..=hi);
    let mut values = vec![first, target - first];

    let (lo, hi) = distractor_range(target, combination);
    while values.len() < size {
        let mut drawn = None;
        for _ in 0..MAX_DRAWS {
            let n = rng.random_range(lo..=hi);
            if acceptable(n, &values, target) {
                drawn = Some(n);
                break;
            }
        }
        // The range always holds more than 2 * MAX_DECK_SIZE values, so the
        // scan cannot come up empty
        let n = drawn.or_else(|| (lo..=hi).find(|&n| acceptable(n, &values, target)));
        match n {
            Some(n) => values.push(n),
            None => {
                log::warn!("Distractor range exhausted for target {target}");
                break;
            }
        }
    }

    values.shuffle(rng);
    let cards = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| Card { id: i as u32, value })
        .collect();

    Deck {
        target,
        combination,
        cards,
    }
}
