use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adaptive::catalog::TaskLookup;
use crate::adaptive::config::EngineConfig;
use crate::adaptive::decision::InterventionPolicy;
use crate::adaptive::modeling::SustainedStateTracker;
use crate::adaptive::scoring::{check_answer, ScoringEngine};
use crate::adaptive::session::{SessionError, SessionStats, SessionStore};
use crate::adaptive::types::{
    Action, AffectObservation, EmotionLabel, EngagementState, InterventionRecord, RawEmotionScores,
    TaskAttempt,
};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("task not found: {0}")]
    TaskNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationOutcome {
    pub state: EngagementState,
    pub dominant: EmotionLabel,
    pub confidence: f64,
    pub sustained_seconds: f64,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub xp_earned: u32,
    pub total_xp: u64,
    pub level: u32,
    pub hints_used: usize,
    pub tasks_solved: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

pub struct AdaptiveEngine {
    store: SessionStore,
    tasks: Arc<dyn TaskLookup>,
    tracker: SustainedStateTracker,
    policy: InterventionPolicy,
    scoring: ScoringEngine,
}

impl AdaptiveEngine {
    pub fn new(config: EngineConfig, tasks: Arc<dyn TaskLookup>) -> Self {
        let store = SessionStore::new(
            config.history_capacity,
            config.recent_observation_count,
            config.scoring.xp_per_level,
        );
        let tracker = SustainedStateTracker::new(config.sustained_window, config.sample_interval_secs);
        let policy = InterventionPolicy::new(config.policy);
        let scoring = ScoringEngine::new(config.scoring);

        Self {
            store,
            tasks,
            tracker,
            policy,
            scoring,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn create_session(&self) -> String {
        self.store.create_session()
    }

    /// Classifies one observation, appends it and decides the next action.
    ///
    /// The append, the decision and any hint record happen under one session
    /// write lock, so concurrent observations for the same session cannot
    /// both deliver the same hint level.
    pub fn process_observation(
        &self,
        session_id: &str,
        task_id: &str,
        scores: RawEmotionScores,
        elapsed_seconds: f64,
    ) -> ObservationOutcome {
        let task = self.tasks.task(task_id);
        if task.is_none() {
            debug!(task_id = %task_id, "task lookup missed, skipping intervention");
        }

        self.store.observe_with(session_id, |session| {
            let observation =
                AffectObservation::from_scores(scores, elapsed_seconds, session.next_sequence());
            let sequence = observation.sequence;
            let state = observation.state;
            let dominant = observation.dominant;
            let confidence = observation.confidence();
            session.push_observation(observation);

            let sustained_seconds = self.tracker.sustained_seconds(session.history(), state);
            let prior_hints = session.hints_for_task(task_id);
            let action = self.policy.decide(
                task.as_ref(),
                state,
                sustained_seconds,
                elapsed_seconds,
                &prior_hints,
            );

            if let Some(level) = action.hint_level() {
                session.push_intervention(InterventionRecord {
                    task_id: task_id.to_string(),
                    hint_level: level,
                    delivered_at_sequence: sequence,
                });
                info!(
                    session_id = %session_id,
                    task_id = %task_id,
                    state = %state,
                    dominant = %dominant,
                    hint_level = level.get(),
                    sustained_seconds,
                    "hint delivered"
                );
            } else if !matches!(action, Action::NoAction) {
                info!(
                    session_id = %session_id,
                    task_id = %task_id,
                    state = %state,
                    action = action.kind(),
                    "intervention offered"
                );
            }

            ObservationOutcome {
                state,
                dominant,
                confidence,
                sustained_seconds,
                action,
            }
        })
    }

    /// Records the neutral stand-in used when classification failed upstream.
    /// Never intervenes.
    pub fn record_fallback(&self, session_id: &str) -> ObservationOutcome {
        self.store.observe_with(session_id, |session| {
            let observation = AffectObservation::fallback(session.next_sequence());
            let outcome = ObservationOutcome {
                state: observation.state,
                dominant: observation.dominant,
                confidence: 0.0,
                sustained_seconds: 0.0,
                action: Action::NoAction,
            };
            session.push_observation(observation);
            debug!(session_id = %session_id, "fallback observation recorded");
            outcome
        })
    }

    pub fn submit_answer(
        &self,
        session_id: &str,
        task_id: &str,
        answer: &str,
        time_taken_seconds: f64,
    ) -> Result<AnswerOutcome, EngineError> {
        let task = self
            .tasks
            .task(task_id)
            .ok_or_else(|| EngineError::TaskNotFound(task_id.to_string()))?;
        let correct = check_answer(answer, &task.example_output);

        let outcome = self.store.update(session_id, |session| {
            let hints_used = session.hints_for_task(task_id).len();
            let xp_earned = self
                .scoring
                .score(task.difficulty, hints_used, time_taken_seconds, correct);
            let sequence = session.next_sequence();
            session.apply_attempt(TaskAttempt {
                task_id: task_id.to_string(),
                correct,
                time_taken_seconds,
                xp_earned,
                sequence,
                difficulty: task.difficulty,
            });

            AnswerOutcome {
                correct,
                xp_earned,
                total_xp: session.total_xp(),
                level: self.scoring.level(session.total_xp()),
                hints_used,
                tasks_solved: session.tasks_solved(),
                explanation: correct.then(|| task.explanation.clone()),
            }
        })?;

        info!(
            session_id = %session_id,
            task_id = %task_id,
            difficulty = %task.difficulty,
            correct = outcome.correct,
            xp_earned = outcome.xp_earned,
            total_xp = outcome.total_xp,
            "answer scored"
        );
        Ok(outcome)
    }

    pub fn stats(&self, session_id: &str) -> Result<SessionStats, EngineError> {
        Ok(self.store.stats(session_id)?)
    }
}
