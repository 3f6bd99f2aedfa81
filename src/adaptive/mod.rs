pub mod analytics;
pub mod catalog;
pub mod config;
pub mod decision;
pub mod engine;
pub mod modeling;
pub mod scoring;
pub mod session;
pub mod types;

pub use catalog::{TaskCatalog, TaskLookup};
pub use config::EngineConfig;
pub use engine::{AdaptiveEngine, AnswerOutcome, EngineError, ObservationOutcome};
pub use session::{SessionError, SessionStats, SessionStore};
pub use types::*;
