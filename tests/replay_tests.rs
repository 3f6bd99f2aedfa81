use std::io::Write;

use affect_tutor::adaptive::{EngagementState, EngineConfig, HintLevel};
use affect_tutor::replay::{load_script, run_script, ReplayError, StepOutcome};

const SCRIPT: &str = r#"{
    "tasks": [{
        "id": "q1",
        "topic": "arrays",
        "difficulty": "medium",
        "question": "Sum the array.",
        "example_output": "6",
        "hint_level_1": "Loop over it.",
        "hint_level_2": "Keep a running total.",
        "hint_level_3": "total += x for each x.",
        "explanation": "Linear scan.",
        "bonus_challenge": "Sum only the even entries.",
        "common_mistakes": ["Starting total at 1"]
    }],
    "steps": [
        {"observe": {"taskId": "q1", "scores": {"angry": 0.7}, "elapsedSeconds": 40}},
        {"observe": {"taskId": "q1", "scores": {"angry": 0.7}, "elapsedSeconds": 42}},
        {"observe": {"taskId": "q1", "scores": {"angry": 0.7, "sad": null}, "elapsedSeconds": 44}},
        {"observe": {"taskId": "q1", "scores": {"angry": 0.7}, "elapsedSeconds": 46}},
        {"observe": {"taskId": "q1", "scores": {"angry": 0.7}, "elapsedSeconds": 48}},
        {"observe": {"taskId": "q1", "scores": {"angry": 0.7}, "elapsedSeconds": 50}},
        {"observe": {"taskId": "q1", "scores": {"angry": 0.7}, "elapsedSeconds": 52}},
        {"observe": {"taskId": "q1", "scores": {"angry": 0.7}, "elapsedSeconds": 54}},
        {"fallback": {"taskId": "q1"}},
        {"submit": {"taskId": "q1", "answer": "6", "timeTakenSeconds": 65}}
    ]
}"#;

fn write_script(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write script");
    file
}

#[tokio::test]
async fn replay_script_from_disk() {
    let file = write_script(SCRIPT);
    let script = load_script(file.path()).await.expect("script should load");
    let report = run_script(script, EngineConfig::default()).expect("replay should succeed");

    assert_eq!(report.outcomes.len(), 10);
    match &report.outcomes[2] {
        StepOutcome::Observe(outcome) => assert_eq!(outcome.state, EngagementState::Frustrated),
        other => panic!("expected observation outcome, got {other:?}"),
    }
    match &report.outcomes[7] {
        StepOutcome::Observe(outcome) => {
            assert_eq!(outcome.action.hint_level(), Some(HintLevel::FIRST));
        }
        other => panic!("expected observation outcome, got {other:?}"),
    }
    match &report.outcomes[9] {
        StepOutcome::Submit(outcome) => {
            assert!(outcome.correct);
            assert_eq!(outcome.xp_earned, 16);
        }
        other => panic!("expected submission outcome, got {other:?}"),
    }

    assert_eq!(report.progress.total_xp, 16);
    assert_eq!(report.stats.retained_observations, 9);
    assert_eq!(report.stats.hints_used, 1);
    assert_eq!(report.stats.recent_observations.len(), 9);
}

#[tokio::test]
async fn missing_script_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_script(&dir.path().join("absent.json")).await.unwrap_err();
    assert!(matches!(err, ReplayError::Io(_)));
}

#[tokio::test]
async fn report_serializes_to_json() {
    let file = write_script(SCRIPT);
    let script = load_script(file.path()).await.unwrap();
    let report = run_script(script, EngineConfig::default()).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["stats"]["totalXp"], 16);
    assert_eq!(value["outcomes"][7]["step"], "observe");
    assert_eq!(value["outcomes"][7]["action"]["action"], "deliver_hint");
}
