//! Interactive shell command.

use std::time::Duration;

use anyhow::{Context, Result};
use healthscan_core::config::{Config, paths};
use healthscan_core::logging;
use healthscan_core::session::{LocalSession, SessionService, SessionStore, run_session_service};
use tokio::sync::mpsc;

pub fn run(config: &Config) -> Result<()> {
    let _log_guard = logging::init_file_logging(&paths::logs_dir()?, &config.logging)?;

    let local = LocalSession::from_env()?;
    tracing::info!(home = %local.root().display(), "starting shell");

    // The session service runs on the tokio workers; the UI loop owns this thread.
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    let store = SessionStore::new();
    let handle = store.handle();
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let service = SessionService::new(store, local, config.session.clone());
    rt.spawn(run_session_service(service, commands_rx));

    let result = healthscan_shell::run_shell(handle, commands_tx, &config.shell);

    rt.shutdown_timeout(Duration::from_secs(1));
    tracing::info!(ok = result.is_ok(), "shell exited");
    result
}
