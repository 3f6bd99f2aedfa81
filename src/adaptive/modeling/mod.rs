pub mod affect;
pub mod history;
pub mod sustained;

pub use affect::classify;
pub use history::AffectHistory;
pub use sustained::SustainedStateTracker;
