//! Timed object spawning
//!
//! Cadence, hazard odds and the concurrency cap come from the tier table for
//! the current score, then get scaled by active modifiers. Hitting the cap
//! simply skips the spawn.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EntityIds, Modifier, MovingObject, ObjectKind, RoundState, TargetCategory};
use crate::consts::*;
use crate::tuning::{SliceTuning, TierParams};

/// Horizontal inset for spawn positions
const SPAWN_INSET: f32 = 100.0;

/// Spawn parameters after modifiers are applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub interval_ms: f64,
    pub hazard_chance: f32,
    pub max_objects: usize,
    pub tier: TierParams,
}

impl SpawnPlan {
    pub fn for_round(round: &RoundState, tuning: &SliceTuning) -> Self {
        let tier = tuning.tier_params(round.score);
        let mut plan = Self {
            interval_ms: tier.spawn_interval_ms,
            hazard_chance: tier.hazard_chance,
            max_objects: tier.max_objects,
            tier,
        };

        if round.modifiers.is_active(Modifier::SpawnAcceleration) {
            plan.interval_ms *= tuning.frenzy_interval_scale;
            plan.max_objects += tuning.frenzy_extra_objects;
        }
        if round.modifiers.is_active(Modifier::HazardBoost) {
            plan.hazard_chance = (plan.hazard_chance + tuning.hazard_boost).min(tuning.hazard_chance_cap);
        }
        plan
    }
}

/// Spawn cadence tracker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Round clock time of the last spawn (ms)
    pub last_spawn_ms: f64,
}

impl Spawner {
    /// Emit new objects if the interval has elapsed and the cap allows
    ///
    /// Returns the `(id, kind)` of every object spawned this call.
    pub fn update(
        &mut self,
        now_ms: f64,
        round: &RoundState,
        tuning: &SliceTuning,
        rng: &mut impl Rng,
        objects: &mut Vec<MovingObject>,
        ids: &mut EntityIds,
    ) -> Vec<(u32, ObjectKind)> {
        let plan = SpawnPlan::for_round(round, tuning);
        let mut spawned = Vec::new();

        if now_ms - self.last_spawn_ms < plan.interval_ms {
            return spawned;
        }
        if objects.len() >= plan.max_objects {
            log::trace!("Spawn skipped, {} objects at cap", objects.len());
            return spawned;
        }

        self.last_spawn_ms = now_ms;
        let bonus = rng.random::<f32>() < tuning.bonus_spawn_chance;
        let count = if bonus { 2 } else { 1 };

        for _ in 0..count {
            if objects.len() >= plan.max_objects {
                break;
            }
            let id = ids.allocate();
            let obj = spawn_object(id, now_ms, &plan, tuning, rng);
            spawned.push((obj.id, obj.kind));
            objects.push(obj);
        }

        spawned
    }
}

/// Build one object launched upward from below the arena
pub fn spawn_object(id: u32, now_ms: f64, plan: &SpawnPlan, tuning: &SliceTuning, rng: &mut impl Rng) -> MovingObject {
    let x = rng.random_range(SPAWN_INSET..ARENA_WIDTH - SPAWN_INSET);
    let pos = Vec2::new(x, ARENA_HEIGHT + TARGET_RADIUS);

    // Drift toward the middle so objects stay on screen
    let toward_center = if x < ARENA_WIDTH / 2.0 { 1.0 } else { -1.0 };
    let drift = rng.random::<f32>() * plan.tier.drift_speed * toward_center;
    let (lo, hi) = plan.tier.launch_speed;
    let launch = if hi > lo { rng.random_range(lo..hi) } else { lo };
    let vel = Vec2::new(drift, -launch);

    if rng.random::<f32>() < plan.hazard_chance {
        return MovingObject::hazard(id, pos, vel, now_ms);
    }

    let category = roll_category(tuning, rng);
    MovingObject::target(id, category, tuning.points.points_for(category), pos, vel, now_ms)
}

/// Pick a target category; specials are rare
pub fn roll_category(tuning: &SliceTuning, rng: &mut impl Rng) -> TargetCategory {
    let s = tuning.specials;
    let roll = rng.random::<f32>();
    if roll < s.special_a {
        return TargetCategory::SpecialA;
    }
    if roll < s.special_a + s.special_b {
        return TargetCategory::SpecialB;
    }
    if roll < s.special_a + s.special_b + s.special_c {
        return TargetCategory::SpecialC;
    }

    let roll = rng.random::<f32>();
    if roll < tuning.high_chance {
        TargetCategory::High
    } else if roll < tuning.high_chance + tuning.mid_chance {
        TargetCategory::Mid
    } else {
        TargetCategory::Low
    }
}
