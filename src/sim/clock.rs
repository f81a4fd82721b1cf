//! Round countdown

use serde::{Deserialize, Serialize};

use super::state::{Outcome, RoundPhase, RoundState};

/// Turns running wall-clock time into whole-second countdown steps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionClock {
    /// Running time not yet counted as a full second (ms)
    carry_ms: f64,
}

impl SessionClock {
    /// Advance by `dt_ms` of running time
    ///
    /// Returns the expiry outcome when the countdown reaches zero. Does
    /// nothing unless the round is running.
    pub fn advance(&mut self, round: &mut RoundState, dt_ms: f64, expiry: Outcome) -> Option<Outcome> {
        if round.phase != RoundPhase::Running {
            return None;
        }

        self.carry_ms += dt_ms;
        while self.carry_ms >= 1000.0 && round.time_remaining > 0 {
            self.carry_ms -= 1000.0;
            round.time_remaining -= 1;
        }

        (round.time_remaining == 0).then_some(expiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_whole_seconds() {
        let mut clock = SessionClock::default();
        let mut round = RoundState::new(3);
        assert_eq!(clock.advance(&mut round, 999.0, Outcome::Success), None);
        assert_eq!(round.time_remaining, 3);
        assert_eq!(clock.advance(&mut round, 1.0, Outcome::Success), None);
        assert_eq!(round.time_remaining, 2);
    }

    #[test]
    fn test_frozen_unless_running() {
        let mut clock = SessionClock::default();
        let mut round = RoundState::new(3);
        round.phase = RoundPhase::Paused;
        assert_eq!(clock.advance(&mut round, 5000.0, Outcome::Success), None);
        round.phase = RoundPhase::AwaitingRecovery;
        assert_eq!(clock.advance(&mut round, 5000.0, Outcome::Success), None);
        assert_eq!(round.time_remaining, 3);
    }

    #[test]
    fn test_expiry_reports_configured_outcome() {
        let mut clock = SessionClock::default();
        let mut round = RoundState::new(1);
        assert_eq!(clock.advance(&mut round, 1000.0, Outcome::Fail), Some(Outcome::Fail));
        assert_eq!(round.time_remaining, 0);
    }
}
