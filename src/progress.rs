//! Level progression
//!
//! Tracks which levels are unlocked and the best percentage per level.
//! Persisted through an injected `KeyValueStore`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::PASS_PERCENT;
use crate::persistence::{self, KeyValueStore, PersistError};
use crate::quiz::{Level, QuizSession};

/// Player progress across levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Unlocked levels (Easy is always present)
    pub unlocked: Vec<Level>,
    /// Best percentage achieved per level
    #[serde(default)]
    pub best_percent: BTreeMap<Level, u32>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Storage key
    const STORAGE_KEY: &'static str = "math_slice_unlocked_v1";

    /// Fresh progress with only Easy unlocked
    pub fn new() -> Self {
        Self {
            unlocked: vec![Level::Easy],
            best_percent: BTreeMap::new(),
        }
    }

    pub fn is_unlocked(&self, level: Level) -> bool {
        level == Level::Easy || self.unlocked.contains(&level)
    }

    /// Record a finished level
    ///
    /// Returns the level newly unlocked by this result, if any.
    pub fn record_result(&mut self, level: Level, percent: u32) -> Option<Level> {
        let best = self.best_percent.entry(level).or_insert(0);
        *best = (*best).max(percent);

        if percent < PASS_PERCENT {
            return None;
        }
        let next = level.next()?;
        if self.is_unlocked(next) {
            return None;
        }
        self.unlocked.push(next);
        self.unlocked.sort();
        log::info!("Unlocked {} ({}% on {})", next.as_str(), percent, level.as_str());
        Some(next)
    }

    /// Record a completed quiz session
    pub fn record_session(&mut self, session: &QuizSession) -> Option<Level> {
        if !session.is_complete() {
            return None;
        }
        self.record_result(session.level, session.percent())
    }

    /// Highest unlocked level
    pub fn highest_unlocked(&self) -> Level {
        Level::ALL
            .into_iter()
            .rev()
            .find(|l| self.is_unlocked(*l))
            .unwrap_or(Level::Easy)
    }

    /// Load progress from the store (defaults on missing/corrupt data)
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut progress: Self = persistence::load_or_default(store, Self::STORAGE_KEY);
        if !progress.unlocked.contains(&Level::Easy) {
            progress.unlocked.insert(0, Level::Easy);
        }
        progress
    }

    /// Save progress to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistError> {
        persistence::save(store, Self::STORAGE_KEY, self)?;
        log::info!("Progress saved ({} levels unlocked)", self.unlocked.len());
        Ok(())
    }
}
