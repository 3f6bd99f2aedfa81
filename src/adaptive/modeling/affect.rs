use crate::adaptive::types::{EmotionLabel, EngagementState, RawEmotionScores};

const FOCUSED_NEUTRAL: f64 = 0.5;
const FOCUSED_MAX_ELAPSED_SECS: f64 = 120.0;
const BORED_NEUTRAL: f64 = 0.4;
const BORED_MIN_ELAPSED_SECS: f64 = 180.0;
const BORED_STRONG_NEUTRAL: f64 = 0.7;
const BORED_STRONG_MIN_ELAPSED_SECS: f64 = 60.0;
const FRUSTRATED_SIGNAL: f64 = 0.3;
const CONFUSED_FEAR: f64 = 0.2;
const CONFUSED_SURPRISE: f64 = 0.3;
const HAPPY_SIGNAL: f64 = 0.5;
const SAD_SIGNAL: f64 = 0.4;

/// Maps raw classifier scores plus time on task to a coarse engagement state.
///
/// Rules overlap, so they are checked in a fixed order and the first match
/// wins. Total over any input: absent labels read as 0.0 and anything that
/// matches no rule falls through to focused.
pub fn classify(scores: &RawEmotionScores, elapsed_seconds: f64) -> EngagementState {
    let neutral = scores.get(EmotionLabel::Neutral);

    if neutral > FOCUSED_NEUTRAL && elapsed_seconds < FOCUSED_MAX_ELAPSED_SECS {
        return EngagementState::Focused;
    }

    if (neutral > BORED_NEUTRAL && elapsed_seconds > BORED_MIN_ELAPSED_SECS)
        || (neutral > BORED_STRONG_NEUTRAL && elapsed_seconds > BORED_STRONG_MIN_ELAPSED_SECS)
    {
        return EngagementState::Bored;
    }

    if scores.get(EmotionLabel::Angry) > FRUSTRATED_SIGNAL
        || scores.get(EmotionLabel::Disgust) > FRUSTRATED_SIGNAL
    {
        return EngagementState::Frustrated;
    }

    if scores.get(EmotionLabel::Fear) > CONFUSED_FEAR
        || scores.get(EmotionLabel::Surprise) > CONFUSED_SURPRISE
    {
        return EngagementState::Confused;
    }

    if scores.get(EmotionLabel::Happy) > HAPPY_SIGNAL {
        return EngagementState::Happy;
    }

    if scores.get(EmotionLabel::Sad) > SAD_SIGNAL {
        return EngagementState::Sad;
    }

    EngagementState::Focused
}
