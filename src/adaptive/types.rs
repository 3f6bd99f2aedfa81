use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

// ========== Affect ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 7] = [
        Self::Angry,
        Self::Disgust,
        Self::Fear,
        Self::Happy,
        Self::Sad,
        Self::Surprise,
        Self::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Angry => "angry",
            Self::Disgust => "disgust",
            Self::Fear => "fear",
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Surprise => "surprise",
            Self::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "angry" => Some(Self::Angry),
            "disgust" => Some(Self::Disgust),
            "fear" => Some(Self::Fear),
            "happy" => Some(Self::Happy),
            "sad" => Some(Self::Sad),
            "surprise" => Some(Self::Surprise),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independent per-label signals from the affect classifier. Labels that were
/// never reported read as 0.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, serde_json::Value>")]
pub struct RawEmotionScores(BTreeMap<EmotionLabel, f64>);

impl RawEmotionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: EmotionLabel, score: f64) -> Self {
        self.set(label, score);
        self
    }

    /// Non-finite scores are dropped so they read back as an absent signal.
    pub fn set(&mut self, label: EmotionLabel, score: f64) {
        if score.is_finite() {
            self.0.insert(label, score);
        } else {
            self.0.remove(&label);
        }
    }

    pub fn get(&self, label: EmotionLabel) -> f64 {
        self.0.get(&label).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest-scoring reported label; ties go to the label listed first in
    /// [`EmotionLabel::ALL`]. An empty map reports neutral.
    pub fn dominant(&self) -> EmotionLabel {
        let mut best: Option<(EmotionLabel, f64)> = None;
        for label in EmotionLabel::ALL {
            let Some(&score) = self.0.get(&label) else {
                continue;
            };
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((label, score)),
            }
        }
        best.map(|(label, _)| label).unwrap_or(EmotionLabel::Neutral)
    }

    pub fn confidence(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.get(self.dominant())
    }
}

/// Null or non-numeric entries are dropped rather than rejecting the whole map.
impl From<HashMap<String, serde_json::Value>> for RawEmotionScores {
    fn from(raw: HashMap<String, serde_json::Value>) -> Self {
        let mut scores = Self::new();
        for (key, value) in raw {
            let (Some(label), Some(score)) = (EmotionLabel::parse(&key), value.as_f64()) else {
                continue;
            };
            scores.set(label, score);
        }
        scores
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum EngagementState {
    #[default]
    Focused,
    Bored,
    Frustrated,
    Confused,
    Happy,
    Sad,
}

impl EngagementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Focused => "focused",
            Self::Bored => "bored",
            Self::Frustrated => "frustrated",
            Self::Confused => "confused",
            Self::Happy => "happy",
            Self::Sad => "sad",
        }
    }

}

impl fmt::Display for EngagementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectObservation {
    pub state: EngagementState,
    pub raw_scores: RawEmotionScores,
    pub sequence: u64,
    pub dominant: EmotionLabel,
}

impl AffectObservation {
    pub fn from_scores(scores: RawEmotionScores, elapsed_seconds: f64, sequence: u64) -> Self {
        let state = crate::adaptive::modeling::affect::classify(&scores, elapsed_seconds);
        Self {
            state,
            dominant: scores.dominant(),
            raw_scores: scores,
            sequence,
        }
    }

    /// Stand-in recorded when the upstream classifier produced nothing usable.
    pub fn fallback(sequence: u64) -> Self {
        Self {
            state: EngagementState::Focused,
            raw_scores: RawEmotionScores::new(),
            sequence,
            dominant: EmotionLabel::Neutral,
        }
    }

    pub fn confidence(&self) -> f64 {
        self.raw_scores.confidence()
    }
}

// ========== Interventions ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HintLevel(u8);

impl HintLevel {
    pub const FIRST: HintLevel = HintLevel(1);
    pub const SECOND: HintLevel = HintLevel(2);
    pub const THIRD: HintLevel = HintLevel(3);

    pub fn new(level: u8) -> Option<Self> {
        (1..=3).contains(&level).then_some(Self(level))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HintLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("hint level out of range: {value}"))
    }
}

impl From<HintLevel> for u8 {
    fn from(level: HintLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionRecord {
    pub task_id: String,
    pub hint_level: HintLevel,
    pub delivered_at_sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    NoAction,
    Encourage {
        message: String,
    },
    BonusChallenge {
        content: String,
        message: String,
        xp_bonus: u32,
    },
    DeliverHint {
        level: HintLevel,
        text: String,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        common_mistakes: Option<Vec<String>>,
    },
}

impl Action {
    pub fn hint_level(&self) -> Option<HintLevel> {
        match self {
            Self::DeliverHint { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// Same name the `action` tag carries on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoAction => "no_action",
            Self::Encourage { .. } => "encourage",
            Self::BonusChallenge { .. } => "bonus_challenge",
            Self::DeliverHint { .. } => "deliver_hint",
        }
    }
}

// ========== Tasks ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
#[derive(Default)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unknown,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// A generated practice task. Field names follow the content generator's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub example_input: String,
    #[serde(default)]
    pub example_output: String,
    #[serde(default)]
    pub hint_level_1: String,
    #[serde(default)]
    pub hint_level_2: String,
    #[serde(default)]
    pub hint_level_3: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub bonus_challenge: String,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
    #[serde(default)]
    pub time_complexity: String,
    #[serde(default)]
    pub space_complexity: String,
}

impl Task {
    pub fn new(id: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            id: id.into(),
            topic: String::new(),
            difficulty,
            question: String::new(),
            example_input: String::new(),
            example_output: String::new(),
            hint_level_1: String::new(),
            hint_level_2: String::new(),
            hint_level_3: String::new(),
            explanation: String::new(),
            bonus_challenge: String::new(),
            common_mistakes: Vec::new(),
            time_complexity: String::new(),
            space_complexity: String::new(),
        }
    }

    pub fn hint(&self, level: HintLevel) -> &str {
        match level.get() {
            1 => &self.hint_level_1,
            2 => &self.hint_level_2,
            _ => &self.hint_level_3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttempt {
    pub task_id: String,
    pub correct: bool,
    pub time_taken_seconds: f64,
    pub xp_earned: u32,
    pub sequence: u64,
    #[serde(default)]
    pub difficulty: Difficulty,
}
