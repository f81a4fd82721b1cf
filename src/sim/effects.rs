//! Scoring, combos and timed modifiers

use super::state::{ActiveModifiers, Modifier, RoundState, TargetCategory};
use crate::consts::{COMBO_STEP, COMBO_WINDOW_MS};

impl ActiveModifiers {
    /// Start (or refresh) a modifier. Durations do not stack.
    pub fn activate(&mut self, modifier: Modifier, duration_ms: f64) {
        let slot = self.slot_mut(modifier);
        *slot = duration_ms;
    }

    /// Count down all timers by wall-clock time
    pub fn tick(&mut self, dt_ms: f64) {
        self.slow_ms = (self.slow_ms - dt_ms).max(0.0);
        self.frenzy_ms = (self.frenzy_ms - dt_ms).max(0.0);
        self.hazard_boost_ms = (self.hazard_boost_ms - dt_ms).max(0.0);
    }

    pub fn is_active(&self, modifier: Modifier) -> bool {
        self.remaining_ms(modifier) > 0.0
    }

    pub fn remaining_ms(&self, modifier: Modifier) -> f64 {
        match modifier {
            Modifier::SpeedReduction => self.slow_ms,
            Modifier::SpawnAcceleration => self.frenzy_ms,
            Modifier::HazardBoost => self.hazard_boost_ms,
        }
    }

    /// Currently active modifiers
    pub fn active(&self) -> impl Iterator<Item = Modifier> + '_ {
        [
            Modifier::SpeedReduction,
            Modifier::SpawnAcceleration,
            Modifier::HazardBoost,
        ]
        .into_iter()
        .filter(|m| self.is_active(*m))
    }

    /// Simulation time multiplier
    pub fn time_scale(&self, slow_scale: f32) -> f32 {
        if self.is_active(Modifier::SpeedReduction) {
            slow_scale
        } else {
            1.0
        }
    }

    fn slot_mut(&mut self, modifier: Modifier) -> &mut f64 {
        match modifier {
            Modifier::SpeedReduction => &mut self.slow_ms,
            Modifier::SpawnAcceleration => &mut self.frenzy_ms,
            Modifier::HazardBoost => &mut self.hazard_boost_ms,
        }
    }
}

/// Combo multiplier: steps up every `COMBO_STEP` quick hits
#[inline]
pub fn combo_multiplier(combo: u32) -> u32 {
    1 + combo.saturating_sub(1) / COMBO_STEP
}

/// Apply a scoring hit and return the points awarded
///
/// A hit within the combo window of the previous one extends the combo;
/// otherwise the combo restarts at 1.
pub fn award_hit(round: &mut RoundState, base_points: u32, now_ms: f64) -> u32 {
    let quick = round
        .last_hit_ms
        .is_some_and(|last| now_ms - last < COMBO_WINDOW_MS);
    round.combo = if quick { round.combo + 1 } else { 1 };
    round.last_hit_ms = Some(now_ms);

    let awarded = base_points * combo_multiplier(round.combo);
    round.score += awarded as u64;
    awarded
}

/// Grant the modifier carried by a special target, if any
pub fn apply_special(round: &mut RoundState, category: TargetCategory, duration_ms: f64) -> Option<Modifier> {
    let modifier = category.modifier()?;
    round.modifiers.activate(modifier, duration_ms);
    log::debug!("Modifier {:?} active for {}ms", modifier, duration_ms);
    Some(modifier)
}

/// Drop the combo display once the window has lapsed
pub fn decay_combo(round: &mut RoundState, now_ms: f64) {
    if round
        .last_hit_ms
        .is_some_and(|last| now_ms - last >= COMBO_WINDOW_MS)
    {
        round.combo = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_combo_multiplier_steps() {
        assert_eq!(combo_multiplier(1), 1);
        assert_eq!(combo_multiplier(3), 1);
        assert_eq!(combo_multiplier(4), 2);
        assert_eq!(combo_multiplier(6), 2);
        assert_eq!(combo_multiplier(7), 3);
    }

    #[test]
    fn test_fourth_quick_hit_doubles() {
        let mut round = RoundState::new(60);
        let base = 3;
        let mut last = 0;
        for i in 0..4 {
            last = award_hit(&mut round, base, i as f64 * 500.0);
        }
        assert_eq!(round.combo, 4);
        assert_eq!(last, base * 2);
        assert_eq!(round.score, (3 + 3 + 3 + 6) as u64);
    }

    #[test]
    fn test_slow_gap_resets_combo() {
        let mut round = RoundState::new(60);
        award_hit(&mut round, 1, 0.0);
        award_hit(&mut round, 1, 100.0);
        assert_eq!(round.combo, 2);
        award_hit(&mut round, 1, 800.0);
        assert_eq!(round.combo, 1);
    }

    #[test]
    fn test_decay_combo() {
        let mut round = RoundState::new(60);
        award_hit(&mut round, 1, 0.0);
        decay_combo(&mut round, 300.0);
        assert_eq!(round.combo, 1);
        decay_combo(&mut round, 600.0);
        assert_eq!(round.combo, 0);
    }

    #[test]
    fn test_modifier_refresh_not_stack() {
        let mut m = ActiveModifiers::default();
        m.activate(Modifier::SpeedReduction, 10_000.0);
        m.tick(4_000.0);
        assert_eq!(m.remaining_ms(Modifier::SpeedReduction), 6_000.0);

        m.activate(Modifier::SpeedReduction, 10_000.0);
        assert_eq!(m.remaining_ms(Modifier::SpeedReduction), 10_000.0);

        m.tick(10_000.0);
        assert!(!m.is_active(Modifier::SpeedReduction));
        assert_eq!(m.active().count(), 0);
    }

    #[test]
    fn test_modifiers_are_independent() {
        let mut m = ActiveModifiers::default();
        m.activate(Modifier::SpawnAcceleration, 1_000.0);
        m.activate(Modifier::HazardBoost, 3_000.0);
        m.tick(2_000.0);
        assert!(!m.is_active(Modifier::SpawnAcceleration));
        assert!(m.is_active(Modifier::HazardBoost));
        assert_eq!(m.time_scale(0.45), 1.0);
    }

    #[test]
    fn test_apply_special() {
        let mut round = RoundState::new(60);
        assert_eq!(apply_special(&mut round, TargetCategory::Mid, 10_000.0), None);
        assert_eq!(
            apply_special(&mut round, TargetCategory::SpecialA, 10_000.0),
            Some(Modifier::SpeedReduction)
        );
        assert_eq!(round.modifiers.time_scale(0.45), 0.45);
    }

    proptest! {
        #[test]
        fn awarded_points_non_decreasing_for_quick_hits(
            base in 1u32..10,
            gaps in proptest::collection::vec(0.0f64..599.0, 1..40)
        ) {
            let mut round = RoundState::new(60);
            let mut now = 0.0;
            let mut prev = award_hit(&mut round, base, now);
            for gap in gaps {
                now += gap;
                let awarded = award_hit(&mut round, base, now);
                prop_assert!(awarded >= prev, "{} < {}", awarded, prev);
                prev = awarded;
            }
        }
    }
}
