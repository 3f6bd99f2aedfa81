use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::adaptive::analytics::LearnerAnalytics;
use crate::adaptive::modeling::history::AffectHistory;
use crate::adaptive::scoring::level_for;
use crate::adaptive::types::{AffectObservation, InterventionRecord, TaskAttempt};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
}

// ========== Types ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub session_id: String,
    history: AffectHistory,
    interventions: Vec<InterventionRecord>,
    attempts: Vec<TaskAttempt>,
    total_xp: u64,
    tasks_solved: u64,
    observations_seen: u64,
    analytics: LearnerAnalytics,
}

impl SessionState {
    pub fn new(session_id: impl Into<String>, history_capacity: usize) -> Self {
        Self {
            session_id: session_id.into(),
            history: AffectHistory::with_capacity(history_capacity),
            interventions: Vec::new(),
            attempts: Vec::new(),
            total_xp: 0,
            tasks_solved: 0,
            observations_seen: 0,
            analytics: LearnerAnalytics::default(),
        }
    }

    /// Sequence index the next appended observation should carry.
    pub fn next_sequence(&self) -> u64 {
        self.observations_seen
    }

    pub fn push_observation(&mut self, observation: AffectObservation) {
        self.observations_seen = self
            .observations_seen
            .max(observation.sequence.saturating_add(1));
        if let Some(evicted) = self.history.push(observation) {
            trace!(
                session_id = %self.session_id,
                evicted_sequence = evicted.sequence,
                capacity = self.history.capacity(),
                "affect history full, oldest observation evicted"
            );
        }
    }

    pub fn push_intervention(&mut self, record: InterventionRecord) {
        self.interventions.push(record);
    }

    /// Applies the XP/solved delta together with the attempt log entry.
    pub fn apply_attempt(&mut self, attempt: TaskAttempt) {
        if attempt.correct {
            self.tasks_solved += 1;
        }
        self.total_xp = self.total_xp.saturating_add(u64::from(attempt.xp_earned));
        let state = self
            .history
            .latest()
            .map(|observation| observation.state)
            .unwrap_or_default();
        self.analytics.record(
            attempt.correct,
            attempt.time_taken_seconds,
            state,
            attempt.difficulty,
        );
        self.attempts.push(attempt);
    }

    pub fn hints_for_task(&self, task_id: &str) -> Vec<InterventionRecord> {
        self.interventions
            .iter()
            .filter(|record| record.task_id == task_id)
            .cloned()
            .collect()
    }

    pub fn history(&self) -> &AffectHistory {
        &self.history
    }

    pub fn interventions(&self) -> &[InterventionRecord] {
        &self.interventions
    }

    pub fn attempts(&self) -> &[TaskAttempt] {
        &self.attempts
    }

    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    pub fn tasks_solved(&self) -> u64 {
        self.tasks_solved
    }

    pub fn analytics(&self) -> &LearnerAnalytics {
        &self.analytics
    }

    pub fn stats(&self, recent: usize, xp_per_level: u64) -> SessionStats {
        SessionStats {
            session_id: self.session_id.clone(),
            total_xp: self.total_xp,
            level: level_for(self.total_xp, xp_per_level),
            tasks_solved: self.tasks_solved,
            tasks_attempted: self.attempts.len(),
            hints_used: self.interventions.len(),
            observations_seen: self.observations_seen,
            retained_observations: self.history.len(),
            recent_observations: self.history.recent(recent),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub session_id: String,
    pub total_xp: u64,
    pub level: u32,
    pub tasks_solved: u64,
    pub tasks_attempted: usize,
    pub hints_used: usize,
    pub observations_seen: u64,
    pub retained_observations: usize,
    pub recent_observations: Vec<AffectObservation>,
}

// ========== Store ==========

/// Owns every live session. The map lock only guards insert/lookup; each
/// session carries its own lock so writers on different sessions never
/// contend and writers on one session are serialized.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<RwLock<SessionState>>>>,
    history_capacity: usize,
    recent_observations: usize,
    xp_per_level: u64,
}

impl SessionStore {
    pub fn new(history_capacity: usize, recent_observations: usize, xp_per_level: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history_capacity,
            recent_observations,
            xp_per_level,
        }
    }

    pub fn create_session(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        let state = SessionState::new(session_id.clone(), self.history_capacity);
        self.sessions
            .write()
            .insert(session_id.clone(), Arc::new(RwLock::new(state)));
        debug!(session_id = %session_id, "session created");
        session_id
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops a session; used by whoever evicts idle sessions.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    pub fn record_observation(&self, session_id: &str, observation: AffectObservation) {
        self.observe_with(session_id, |session| session.push_observation(observation));
    }

    pub fn record_intervention(
        &self,
        session_id: &str,
        record: InterventionRecord,
    ) -> Result<(), SessionError> {
        self.update(session_id, |session| session.push_intervention(record))
    }

    pub fn record_attempt(
        &self,
        session_id: &str,
        attempt: TaskAttempt,
    ) -> Result<SessionStats, SessionError> {
        let recent = self.recent_observations;
        let xp_per_level = self.xp_per_level;
        self.update(session_id, |session| {
            session.apply_attempt(attempt);
            session.stats(recent, xp_per_level)
        })
    }

    pub fn stats(&self, session_id: &str) -> Result<SessionStats, SessionError> {
        self.read(session_id, |session| {
            session.stats(self.recent_observations, self.xp_per_level)
        })
    }

    pub fn snapshot(&self, session_id: &str) -> Result<SessionState, SessionError> {
        self.read(session_id, SessionState::clone)
    }

    /// Runs `f` under the session's write lock, creating the session first if
    /// it does not exist yet. Observation ingestion always succeeds.
    pub fn observe_with<R>(&self, session_id: &str, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let handle = self.get_or_create(session_id);
        let mut session = handle.write();
        f(&mut session)
    }

    /// Runs `f` under the session's write lock.
    pub fn update<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> Result<R, SessionError> {
        let handle = self.handle(session_id)?;
        let mut session = handle.write();
        Ok(f(&mut session))
    }

    pub fn read<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&SessionState) -> R,
    ) -> Result<R, SessionError> {
        let handle = self.handle(session_id)?;
        let session = handle.read();
        Ok(f(&session))
    }

    fn handle(&self, session_id: &str) -> Result<Arc<RwLock<SessionState>>, SessionError> {
        match self.sessions.read().get(session_id) {
            Some(handle) => Ok(Arc::clone(handle)),
            None => {
                warn!(session_id = %session_id, "unknown session");
                Err(SessionError::NotFound(session_id.to_string()))
            }
        }
    }

    fn get_or_create(&self, session_id: &str) -> Arc<RwLock<SessionState>> {
        if let Some(handle) = self.sessions.read().get(session_id) {
            return Arc::clone(handle);
        }
        let mut sessions = self.sessions.write();
        let capacity = self.history_capacity;
        let handle = sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!(session_id = %session_id, "session created on first observation");
            Arc::new(RwLock::new(SessionState::new(session_id, capacity)))
        });
        Arc::clone(handle)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(100, 10, 100)
    }
}
