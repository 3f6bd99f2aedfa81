use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintGate {
    pub min_sustained_secs: f64,
    pub required_hint_count: usize,
}

impl HintGate {
    pub const fn new(min_sustained_secs: f64, required_hint_count: usize) -> Self {
        Self {
            min_sustained_secs,
            required_hint_count,
        }
    }

    pub fn is_open(&self, sustained_secs: f64, hint_count: usize) -> bool {
        sustained_secs >= self.min_sustained_secs && hint_count == self.required_hint_count
    }
}

/// Sustained-duration gates for each engagement state. Frustrated and confused
/// gates are ordered by hint level, first entry delivers level 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyThresholds {
    pub frustrated: Vec<HintGate>,
    pub confused: Vec<HintGate>,
    pub sad: HintGate,
    pub bored_min_sustained_secs: f64,
    pub bonus_xp: u32,
    pub encourage_after_secs: f64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            frustrated: vec![
                HintGate::new(15.0, 0),
                HintGate::new(30.0, 1),
                HintGate::new(45.0, 2),
            ],
            confused: vec![HintGate::new(20.0, 0), HintGate::new(45.0, 1)],
            sad: HintGate::new(10.0, 0),
            bored_min_sustained_secs: 20.0,
            bonus_xp: 50,
            encourage_after_secs: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringParams {
    pub easy_xp: u32,
    pub medium_xp: u32,
    pub hard_xp: u32,
    pub hint_penalty: u32,
    pub max_time_bonus: u32,
    pub time_bonus_step_secs: f64,
    pub min_correct_xp: u32,
    pub xp_per_level: u64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            easy_xp: 10,
            medium_xp: 15,
            hard_xp: 25,
            hint_penalty: 2,
            max_time_bonus: 5,
            time_bonus_step_secs: 30.0,
            min_correct_xp: 5,
            xp_per_level: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub history_capacity: usize,
    pub sustained_window: usize,
    pub sample_interval_secs: f64,
    pub recent_observation_count: usize,
    pub policy: PolicyThresholds,
    pub scoring: ScoringParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            sustained_window: 30,
            sample_interval_secs: 2.0,
            recent_observation_count: 10,
            policy: PolicyThresholds::default(),
            scoring: ScoringParams::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ADAPTIVE_HISTORY_CAPACITY") {
            config.history_capacity = val
                .parse()
                .ok()
                .filter(|v: &usize| *v > 0)
                .unwrap_or(config.history_capacity);
        }
        if let Ok(val) = std::env::var("ADAPTIVE_SUSTAINED_WINDOW") {
            config.sustained_window = val
                .parse()
                .ok()
                .filter(|v: &usize| *v > 0)
                .unwrap_or(config.sustained_window);
        }
        if let Ok(val) = std::env::var("ADAPTIVE_SAMPLE_INTERVAL_SECS") {
            config.sample_interval_secs = val
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite() && *v > 0.0)
                .unwrap_or(config.sample_interval_secs);
        }
        if let Ok(val) = std::env::var("ADAPTIVE_BONUS_XP") {
            config.policy.bonus_xp = val.parse().unwrap_or(config.policy.bonus_xp);
        }

        config
    }
}
