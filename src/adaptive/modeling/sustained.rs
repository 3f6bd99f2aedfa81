use crate::adaptive::modeling::history::AffectHistory;
use crate::adaptive::types::EngagementState;

/// Converts the most recent unbroken streak of a state into seconds.
///
/// Only the newest `window` observations are inspected and a single mismatch
/// ends the streak, so one flickering sample resets the duration to zero.
#[derive(Debug, Clone)]
pub struct SustainedStateTracker {
    window: usize,
    sample_interval_secs: f64,
}

impl SustainedStateTracker {
    pub fn new(window: usize, sample_interval_secs: f64) -> Self {
        Self {
            window,
            sample_interval_secs,
        }
    }

    pub fn streak(&self, history: &AffectHistory, state: EngagementState) -> usize {
        history
            .iter()
            .rev()
            .take(self.window)
            .take_while(|observation| observation.state == state)
            .count()
    }

    pub fn sustained_seconds(&self, history: &AffectHistory, state: EngagementState) -> f64 {
        self.streak(history, state) as f64 * self.sample_interval_secs
    }
}

impl Default for SustainedStateTracker {
    fn default() -> Self {
        Self::new(30, 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptive::types::AffectObservation;

    fn history_of(states: &[EngagementState]) -> AffectHistory {
        let mut history = AffectHistory::with_capacity(100);
        for (i, state) in states.iter().enumerate() {
            let mut observation = AffectObservation::fallback(i as u64);
            observation.state = *state;
            history.push(observation);
        }
        history
    }

    #[test]
    fn test_empty_history_is_zero() {
        let tracker = SustainedStateTracker::default();
        let history = AffectHistory::default();
        assert_eq!(tracker.sustained_seconds(&history, EngagementState::Bored), 0.0);
    }

    #[test]
    fn test_streak_stops_at_first_mismatch() {
        use EngagementState::*;
        let tracker = SustainedStateTracker::default();
        let history = history_of(&[
            Frustrated, Frustrated, Confused, Frustrated, Frustrated, Frustrated, Frustrated,
            Frustrated,
        ]);
        assert_eq!(tracker.sustained_seconds(&history, Frustrated), 10.0);
        assert_eq!(tracker.sustained_seconds(&history, Confused), 0.0);
    }

    #[test]
    fn test_window_caps_streak() {
        let tracker = SustainedStateTracker::default();
        let history = history_of(&[EngagementState::Sad; 45]);
        assert_eq!(tracker.streak(&history, EngagementState::Sad), 30);
        assert_eq!(tracker.sustained_seconds(&history, EngagementState::Sad), 60.0);
    }
}
