use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Set when `ENABLE_FILE_LOGS` is on; `LOG_DIR` overrides `./logs`.
    pub log_dir: Option<PathBuf>,
    pub replay_script: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let file_logs = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let log_dir = file_logs.then(|| {
            std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./logs"))
        });

        let replay_script = std::env::var("REPLAY_SCRIPT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Self {
            log_level,
            log_dir,
            replay_script,
        }
    }
}
