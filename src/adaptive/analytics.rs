use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::adaptive::types::{Difficulty, EngagementState};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyTally {
    pub attempted: u64,
    pub solved: u64,
}

impl DifficultyTally {
    pub fn accuracy_percent(&self) -> f64 {
        percent(self.solved, self.attempted)
    }
}

/// Running per-learner aggregate of attempt outcomes and the engagement state
/// observed when each attempt was submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerAnalytics {
    pub tasks_attempted: u64,
    pub tasks_solved: u64,
    pub total_time_secs: f64,
    pub state_distribution: BTreeMap<EngagementState, u64>,
    pub by_difficulty: BTreeMap<Difficulty, DifficultyTally>,
}

impl LearnerAnalytics {
    pub fn record(
        &mut self,
        correct: bool,
        time_taken_secs: f64,
        state: EngagementState,
        difficulty: Difficulty,
    ) {
        self.tasks_attempted += 1;
        if correct {
            self.tasks_solved += 1;
        }
        if time_taken_secs.is_finite() && time_taken_secs > 0.0 {
            self.total_time_secs += time_taken_secs;
        }
        *self.state_distribution.entry(state).or_insert(0) += 1;

        let tally = self.by_difficulty.entry(difficulty).or_default();
        tally.attempted += 1;
        if correct {
            tally.solved += 1;
        }
    }

    pub fn accuracy_percent(&self) -> f64 {
        percent(self.tasks_solved, self.tasks_attempted)
    }

    pub fn average_time_per_task(&self) -> f64 {
        if self.tasks_attempted == 0 {
            return 0.0;
        }
        self.total_time_secs / self.tasks_attempted as f64
    }

    pub fn difficulty_accuracy(&self) -> BTreeMap<Difficulty, f64> {
        self.by_difficulty
            .iter()
            .map(|(difficulty, tally)| (*difficulty, tally.accuracy_percent()))
            .collect()
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_analytics() {
        let analytics = LearnerAnalytics::default();
        assert_eq!(analytics.accuracy_percent(), 0.0);
        assert_eq!(analytics.average_time_per_task(), 0.0);
    }

    #[test]
    fn test_record_accumulates() {
        let mut analytics = LearnerAnalytics::default();
        analytics.record(true, 30.0, EngagementState::Focused, Difficulty::Easy);
        analytics.record(false, 90.0, EngagementState::Frustrated, Difficulty::Hard);
        analytics.record(true, 60.0, EngagementState::Focused, Difficulty::Hard);

        assert_eq!(analytics.tasks_attempted, 3);
        assert_eq!(analytics.tasks_solved, 2);
        assert_eq!(analytics.accuracy_percent(), 66.67);
        assert_eq!(analytics.average_time_per_task(), 60.0);
        assert_eq!(analytics.state_distribution[&EngagementState::Focused], 2);

        let by_difficulty = analytics.difficulty_accuracy();
        assert_eq!(by_difficulty[&Difficulty::Easy], 100.0);
        assert_eq!(by_difficulty[&Difficulty::Hard], 50.0);
    }
}
