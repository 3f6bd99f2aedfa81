//! Drives an engine session from a recorded script of observations and
//! answer submissions.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adaptive::scoring::UserProgress;
use crate::adaptive::{
    AdaptiveEngine, AnswerOutcome, EngineConfig, EngineError, ObservationOutcome,
    RawEmotionScores, SessionStats, Task, TaskCatalog,
};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayStep {
    Observe(ObserveStep),
    Fallback(FallbackStep),
    Submit(SubmitStep),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserveStep {
    pub task_id: String,
    #[serde(default)]
    pub scores: RawEmotionScores,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackStep {
    pub task_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStep {
    pub task_id: String,
    pub answer: String,
    pub time_taken_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "lowercase")]
pub enum StepOutcome {
    Observe(ObservationOutcome),
    Submit(AnswerOutcome),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub outcomes: Vec<StepOutcome>,
    pub progress: UserProgress,
    pub stats: SessionStats,
}

pub fn parse_script(raw: &str) -> Result<ReplayScript, ReplayError> {
    Ok(serde_json::from_str(raw)?)
}

pub async fn load_script(path: &Path) -> Result<ReplayScript, ReplayError> {
    let raw = tokio::fs::read_to_string(path).await?;
    parse_script(&raw)
}

/// Runs every step against a fresh session. A submission for an unknown task
/// aborts the replay; observations for unknown tasks just never intervene.
pub fn run_script(script: ReplayScript, config: EngineConfig) -> Result<ReplayReport, ReplayError> {
    let xp_per_level = config.scoring.xp_per_level;
    let catalog = Arc::new(TaskCatalog::from_tasks(script.tasks));
    let engine = AdaptiveEngine::new(config, catalog);
    let session_id = engine.create_session();
    let mut progress = UserProgress::new(xp_per_level);
    let mut outcomes = Vec::with_capacity(script.steps.len());

    for step in script.steps {
        match step {
            ReplayStep::Observe(obs) => {
                let outcome = engine.process_observation(
                    &session_id,
                    &obs.task_id,
                    obs.scores,
                    obs.elapsed_seconds,
                );
                outcomes.push(StepOutcome::Observe(outcome));
            }
            ReplayStep::Fallback(step) => {
                warn!(task_id = %step.task_id, "classification unavailable, recording fallback");
                outcomes.push(StepOutcome::Observe(engine.record_fallback(&session_id)));
            }
            ReplayStep::Submit(sub) => {
                let outcome = engine.submit_answer(
                    &session_id,
                    &sub.task_id,
                    &sub.answer,
                    sub.time_taken_seconds,
                )?;
                if progress.add_xp(outcome.xp_earned) {
                    info!(level = progress.level, total_xp = progress.total_xp, "level up");
                }
                outcomes.push(StepOutcome::Submit(outcome));
            }
        }
    }

    let stats = engine.stats(&session_id)?;
    Ok(ReplayReport {
        outcomes,
        progress,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_steps() {
        let script = parse_script(
            r#"{
                "tasks": [{"id": "q1", "difficulty": "easy", "example_output": "42"}],
                "steps": [
                    {"observe": {"taskId": "q1", "scores": {"happy": 0.9}, "elapsedSeconds": 4}},
                    {"fallback": {"taskId": "q1"}},
                    {"submit": {"taskId": "q1", "answer": "42", "timeTakenSeconds": 10}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(script.tasks.len(), 1);
        assert_eq!(script.steps.len(), 3);
        assert!(matches!(script.steps[1], ReplayStep::Fallback(_)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_script("not json"), Err(ReplayError::Parse(_))));
    }

    #[test]
    fn test_submit_for_unknown_task_aborts() {
        let script = parse_script(
            r#"{"steps": [{"submit": {"taskId": "ghost", "answer": "x", "timeTakenSeconds": 1}}]}"#,
        )
        .unwrap();
        let err = run_script(script, EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ReplayError::Engine(EngineError::TaskNotFound(_))));
    }
}
