//! Property-Based Tests for the adaptive core
//!
//! - Classification is total and falls back to focused below every threshold
//! - Hint levels for a task only ever grow as a 1, 2, 3 prefix
//! - Scoring never awards XP for wrong answers and never less than 5 for right ones
//! - Session history never exceeds its capacity and keeps arrival order

mod common;

use proptest::prelude::*;

use affect_tutor::adaptive::modeling::{classify, AffectHistory};
use affect_tutor::adaptive::scoring::{level_for, ScoringEngine};
use affect_tutor::adaptive::{
    AffectObservation, Difficulty, EmotionLabel, EngagementState, RawEmotionScores,
};

use common::{engine, TASK_ID};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_label() -> impl Strategy<Value = EmotionLabel> {
    proptest::sample::select(EmotionLabel::ALL.to_vec())
}

fn arb_scores() -> impl Strategy<Value = RawEmotionScores> {
    proptest::collection::vec((arb_label(), 0.0f64..=1.0f64), 0..7).prop_map(|pairs| {
        pairs
            .into_iter()
            .fold(RawEmotionScores::new(), |acc, (label, score)| acc.with(label, score))
    })
}

fn arb_quiet_scores() -> impl Strategy<Value = RawEmotionScores> {
    (
        0.0f64..=0.3,
        0.0f64..=0.3,
        0.0f64..=0.2,
        0.0f64..=0.5,
        0.0f64..=0.4,
        0.0f64..=0.3,
        0.0f64..=0.4,
    )
        .prop_map(|(angry, disgust, fear, happy, sad, surprise, neutral)| {
            RawEmotionScores::new()
                .with(EmotionLabel::Angry, angry)
                .with(EmotionLabel::Disgust, disgust)
                .with(EmotionLabel::Fear, fear)
                .with(EmotionLabel::Happy, happy)
                .with(EmotionLabel::Sad, sad)
                .with(EmotionLabel::Surprise, surprise)
                .with(EmotionLabel::Neutral, neutral)
        })
}

fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
        Just(Difficulty::Unknown),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn classify_defaults_to_focused_below_thresholds(
        scores in arb_quiet_scores(),
        elapsed in 0.0f64..10_000.0,
    ) {
        prop_assert_eq!(classify(&scores, elapsed), EngagementState::Focused);
    }

    #[test]
    fn classify_is_total(scores in arb_scores(), elapsed in 0.0f64..10_000.0) {
        let state = classify(&scores, elapsed);
        prop_assert!(matches!(
            state,
            EngagementState::Focused
                | EngagementState::Bored
                | EngagementState::Frustrated
                | EngagementState::Confused
                | EngagementState::Happy
                | EngagementState::Sad
        ));
    }

    #[test]
    fn hint_levels_form_increasing_prefix(
        stream in proptest::collection::vec((arb_scores(), 0.0f64..400.0), 1..120),
    ) {
        let engine = engine();
        let session = engine.create_session();
        for (scores, elapsed) in stream {
            engine.process_observation(&session, TASK_ID, scores, elapsed);
        }
        let snapshot = engine.store().snapshot(&session).unwrap();
        let levels: Vec<u8> = snapshot
            .hints_for_task(TASK_ID)
            .iter()
            .map(|r| r.hint_level.get())
            .collect();
        let expected: Vec<u8> = (1..=levels.len() as u8).collect();
        prop_assert!(levels.len() <= 3);
        prop_assert_eq!(levels, expected);
    }

    #[test]
    fn scoring_bounds(
        difficulty in arb_difficulty(),
        hints in 0usize..10,
        time in 0.0f64..1_000.0,
        correct in any::<bool>(),
    ) {
        let scoring = ScoringEngine::default();
        let xp = scoring.score(difficulty, hints, time, correct);
        if correct {
            prop_assert!(xp >= 5);
            prop_assert!(xp <= 30);
        } else {
            prop_assert_eq!(xp, 0);
        }
    }

    #[test]
    fn level_is_monotonic(total in 0u64..1_000_000, delta in 0u64..10_000) {
        prop_assert!(level_for(total + delta, 100) >= level_for(total, 100));
    }

    #[test]
    fn history_is_bounded_and_ordered(capacity in 1usize..50, pushes in 0u64..200) {
        let mut history = AffectHistory::with_capacity(capacity);
        for seq in 0..pushes {
            history.push(AffectObservation::fallback(seq));
        }
        prop_assert!(history.len() <= capacity);
        let sequences: Vec<u64> = history.iter().map(|o| o.sequence).collect();
        let start = pushes.saturating_sub(capacity as u64);
        prop_assert_eq!(sequences, (start..pushes).collect::<Vec<u64>>());
    }
}
