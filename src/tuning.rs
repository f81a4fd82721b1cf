//! Data-driven game balance
//!
//! Everything that shapes how a slice round feels lives here so it can be
//! tweaked from JSON without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::sim::state::{Outcome, TargetCategory};

/// Spawn parameters for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierParams {
    /// Score at which this tier starts
    pub min_score: u64,
    /// Time between spawns (ms)
    pub spawn_interval_ms: f64,
    /// Probability a spawn is a hazard
    pub hazard_chance: f32,
    /// Maximum objects alive at once
    pub max_objects: usize,
    /// Upward launch speed range (units/s)
    pub launch_speed: (f32, f32),
    /// Maximum horizontal launch speed (units/s)
    pub drift_speed: f32,
}

/// Spawn probabilities for the special target sub-kinds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialOdds {
    pub special_a: f32,
    pub special_b: f32,
    pub special_c: f32,
}

/// Point values per target category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointTable {
    pub low: u32,
    pub mid: u32,
    pub high: u32,
    pub special_a: u32,
    pub special_b: u32,
    pub special_c: u32,
}

impl PointTable {
    pub fn points_for(&self, category: TargetCategory) -> u32 {
        match category {
            TargetCategory::Low => self.low,
            TargetCategory::Mid => self.mid,
            TargetCategory::High => self.high,
            TargetCategory::SpecialA => self.special_a,
            TargetCategory::SpecialB => self.special_b,
            TargetCategory::SpecialC => self.special_c,
        }
    }
}

/// Balance for a slice round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceTuning {
    /// Difficulty tiers ordered by `min_score`
    pub tiers: Vec<TierParams>,
    /// Round length in seconds
    pub round_seconds: u32,
    /// What running out the clock counts as
    pub expiry_outcome: Outcome,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Simulation time scale while speed reduction is active
    pub slow_time_scale: f32,
    /// Modifier duration granted by a special hit (ms)
    pub modifier_duration_ms: f64,
    /// Frenzy: spawn interval multiplier
    pub frenzy_interval_scale: f64,
    /// Frenzy: extra concurrent objects
    pub frenzy_extra_objects: usize,
    /// Hazard boost: added hazard probability
    pub hazard_boost: f32,
    /// Upper bound on hazard probability after boosts
    pub hazard_chance_cap: f32,
    /// Chance of a bonus second spawn on the same tick
    pub bonus_spawn_chance: f32,
    /// Special target odds
    pub specials: SpecialOdds,
    /// Share of Mid and High among ordinary targets (rest are Low)
    pub mid_chance: f32,
    pub high_chance: f32,
    /// Category scoring
    pub points: PointTable,
    /// Horizontal wobble of untouched targets
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
}

impl Default for SliceTuning {
    fn default() -> Self {
        Self {
            tiers: vec![
                TierParams {
                    min_score: 0,
                    spawn_interval_ms: 900.0,
                    hazard_chance: 0.12,
                    max_objects: 4,
                    launch_speed: (520.0, 600.0),
                    drift_speed: 60.0,
                },
                TierParams {
                    min_score: 40,
                    spawn_interval_ms: 760.0,
                    hazard_chance: 0.16,
                    max_objects: 5,
                    launch_speed: (540.0, 620.0),
                    drift_speed: 80.0,
                },
                TierParams {
                    min_score: 120,
                    spawn_interval_ms: 620.0,
                    hazard_chance: 0.20,
                    max_objects: 6,
                    launch_speed: (560.0, 640.0),
                    drift_speed: 100.0,
                },
                TierParams {
                    min_score: 250,
                    spawn_interval_ms: 500.0,
                    hazard_chance: 0.25,
                    max_objects: 7,
                    launch_speed: (580.0, 660.0),
                    drift_speed: 120.0,
                },
            ],
            round_seconds: 60,
            expiry_outcome: Outcome::Success,
            gravity: 420.0,
            slow_time_scale: 0.45,
            modifier_duration_ms: 10_000.0,
            frenzy_interval_scale: 0.6,
            frenzy_extra_objects: 3,
            hazard_boost: 0.15,
            hazard_chance_cap: 0.6,
            bonus_spawn_chance: 0.12,
            specials: SpecialOdds {
                special_a: 0.03,
                special_b: 0.03,
                special_c: 0.02,
            },
            mid_chance: 0.35,
            high_chance: 0.15,
            points: PointTable {
                low: 1,
                mid: 2,
                high: 3,
                special_a: 5,
                special_b: 5,
                special_c: 8,
            },
            wobble_amplitude: 24.0,
            wobble_frequency: 4.0,
        }
    }
}

impl SliceTuning {
    /// Parse tuning from JSON, falling back to defaults on bad input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<SliceTuning>(json) {
            Ok(tuning) if !tuning.tiers.is_empty() => tuning,
            Ok(_) => {
                log::warn!("Tuning has no tiers, using defaults");
                Self::default()
            }
            Err(e) => {
                log::warn!("Invalid tuning JSON ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Difficulty tier index for a score
    pub fn tier_for_score(&self, score: u64) -> usize {
        self.tiers
            .iter()
            .rposition(|t| score >= t.min_score)
            .unwrap_or(0)
    }

    /// Spawn parameters for a score
    pub fn tier_params(&self, score: u64) -> TierParams {
        self.tiers
            .get(self.tier_for_score(score))
            .copied()
            .unwrap_or_else(|| Self::default().tiers[0])
    }
}
