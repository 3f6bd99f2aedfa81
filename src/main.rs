use std::path::PathBuf;
use std::process::ExitCode;

use affect_tutor::adaptive::EngineConfig;
use affect_tutor::config::Config;
use affect_tutor::{logging, replay};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config);

    let Some(path) = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or(config.replay_script.clone())
    else {
        eprintln!("usage: affect-tutor <script.json> (or set REPLAY_SCRIPT)");
        return ExitCode::from(2);
    };

    let script = match replay::load_script(&path).await {
        Ok(script) => script,
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "failed to load replay script");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        path = %path.display(),
        tasks = script.tasks.len(),
        steps = script.steps.len(),
        "replaying script"
    );

    let report = match replay::run_script(script, EngineConfig::from_env()) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize report");
            ExitCode::FAILURE
        }
    }
}
