use serde::{Deserialize, Serialize};

use crate::adaptive::config::ScoringParams;
use crate::adaptive::types::Difficulty;

pub struct ScoringEngine {
    params: ScoringParams,
}

impl ScoringEngine {
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    pub fn base_xp(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Medium => self.params.medium_xp,
            Difficulty::Hard => self.params.hard_xp,
            Difficulty::Easy | Difficulty::Unknown => self.params.easy_xp,
        }
    }

    /// One bonus point is lost per started step of solving time. Negative or
    /// non-finite times count as instant.
    pub fn time_bonus(&self, time_taken_secs: f64) -> u32 {
        let time = if time_taken_secs.is_finite() {
            time_taken_secs.max(0.0)
        } else {
            0.0
        };
        let steps = (time / self.params.time_bonus_step_secs).floor();
        let bonus = f64::from(self.params.max_time_bonus) - steps;
        if bonus <= 0.0 {
            0
        } else {
            bonus as u32
        }
    }

    pub fn score(
        &self,
        difficulty: Difficulty,
        hints_used: usize,
        time_taken_secs: f64,
        correct: bool,
    ) -> u32 {
        if !correct {
            return 0;
        }
        let base = i64::from(self.base_xp(difficulty));
        let penalty = i64::try_from(hints_used)
            .unwrap_or(i64::MAX)
            .saturating_mul(i64::from(self.params.hint_penalty));
        let bonus = i64::from(self.time_bonus(time_taken_secs));
        let raw = base.saturating_sub(penalty).saturating_add(bonus);
        let awarded = raw.max(i64::from(self.params.min_correct_xp));
        u32::try_from(awarded).unwrap_or(u32::MAX)
    }

    pub fn level(&self, total_xp: u64) -> u32 {
        level_for(total_xp, self.params.xp_per_level)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringParams::default())
    }
}

pub fn level_for(total_xp: u64, xp_per_level: u64) -> u32 {
    let level = total_xp / xp_per_level.max(1) + 1;
    u32::try_from(level).unwrap_or(u32::MAX)
}

pub fn check_answer(answer: &str, expected: &str) -> bool {
    answer.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Long-lived XP total mirrored outside a session, with its derived level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub total_xp: u64,
    pub level: u32,
    #[serde(skip, default = "default_xp_per_level")]
    xp_per_level: u64,
}

fn default_xp_per_level() -> u64 {
    ScoringParams::default().xp_per_level
}

impl UserProgress {
    pub fn new(xp_per_level: u64) -> Self {
        Self {
            total_xp: 0,
            level: level_for(0, xp_per_level),
            xp_per_level,
        }
    }

    /// Returns true when the level changed.
    pub fn add_xp(&mut self, delta: u32) -> bool {
        self.total_xp = self.total_xp.saturating_add(u64::from(delta));
        let level = level_for(self.total_xp, self.xp_per_level);
        let leveled_up = level != self.level;
        self.level = level;
        leveled_up
    }
}

impl Default for UserProgress {
    fn default() -> Self {
        Self::new(default_xp_per_level())
    }
}
