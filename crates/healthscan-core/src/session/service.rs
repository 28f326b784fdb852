//! Session service: the only writer of the session store.
//!
//! Runs as a tokio task. It resolves the persisted session once at startup,
//! then applies `SessionCommand`s sent by the shell. File I/O runs on the
//! blocking pool so the async runtime never stalls on storage.
//!
//! A resolution that fails or exceeds the configured timeout is published as
//! resolved and unauthenticated, so the shell leaves the loading view instead
//! of waiting forever.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::mpsc;

use super::{LocalSession, SessionState, SessionStore};
use crate::config::SessionConfig;

/// Requests the shell may send to the session service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Persist a session for `user`.
    SignIn { user: String },
    /// Drop the persisted session.
    SignOut,
    /// Mark onboarding as done (next launches skip the landing screen).
    CompleteOnboarding,
    /// Publish `resolving`, then resolve again from storage.
    Refresh,
}

pub type SessionCommandSender = mpsc::UnboundedSender<SessionCommand>;

/// Owns the store and the storage it resolves from.
#[derive(Debug)]
pub struct SessionService {
    store: SessionStore,
    local: LocalSession,
    config: SessionConfig,
}

impl SessionService {
    pub fn new(store: SessionStore, local: LocalSession, config: SessionConfig) -> Self {
        Self {
            store,
            local,
            config,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Resolves from storage and publishes the result.
    pub async fn resolve(&self) -> SessionState {
        let state = self.resolve_with_timeout(self.config.resolve_timeout()).await;
        self.store.publish(state);
        state
    }

    /// Applies one command, then publishes the re-resolved state.
    pub async fn apply(&self, command: SessionCommand) -> SessionState {
        tracing::info!(?command, "applying session command");

        if command == SessionCommand::Refresh {
            self.store.begin_resolving();
            return self.resolve().await;
        }

        let local = self.local.clone();
        let ttl = self.config.session_ttl();
        let result = run_blocking(move || match command {
            SessionCommand::SignIn { user } => ttl
                .and_then(|ttl| local.sign_in(&user, ttl, Utc::now()))
                .map(|_| ()),
            SessionCommand::SignOut => local.sign_out(),
            SessionCommand::CompleteOnboarding => local.complete_onboarding(),
            SessionCommand::Refresh => Ok(()),
        })
        .await
        .and_then(|result| result);

        if let Err(err) = result {
            tracing::warn!(error = %format!("{err:#}"), "session command failed");
        }

        self.resolve().await
    }

    async fn resolve_with_timeout(&self, timeout: Duration) -> SessionState {
        let local = self.local.clone();
        resolve_within(timeout, move || {
            let first_launch_guess = local.is_first_launch().unwrap_or(true);
            local
                .resolve(Utc::now())
                .map_err(|err| (err, first_launch_guess))
        })
        .await
    }
}

/// Runs `resolver` on the blocking pool and maps every way it can fail to a
/// resolved, unauthenticated state. A failing resolver carries its own
/// `first_launch` answer; a panic or timeout assumes a first launch.
async fn resolve_within<F>(timeout: Duration, resolver: F) -> SessionState
where
    F: FnOnce() -> std::result::Result<SessionState, (anyhow::Error, bool)> + Send + 'static,
{
    match tokio::time::timeout(timeout, run_blocking(resolver)).await {
        Ok(Ok(Ok(state))) => state,
        Ok(Ok(Err((err, first_launch)))) => {
            tracing::warn!(error = %format!("{err:#}"), "session resolution failed");
            SessionState::resolved(first_launch, false)
        }
        Ok(Err(err)) => {
            tracing::warn!(error = %format!("{err:#}"), "session resolution task failed");
            SessionState::resolved(true, false)
        }
        Err(_) => {
            tracing::warn!(?timeout, "session resolution timed out");
            SessionState::resolved(true, false)
        }
    }
}

/// Runs `f` on the blocking pool, flattening a join failure into `anyhow`.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("Session storage task panicked")
}

/// Resolves once, then serves commands until every sender is dropped.
pub async fn run_session_service(
    service: SessionService,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
) {
    let initial = service.resolve().await;
    tracing::info!(state = %initial, "session resolved");

    while let Some(command) = commands.recv().await {
        service.apply(command).await;
    }
    tracing::debug!("session command channel closed");
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn service(root: &std::path::Path) -> SessionService {
        SessionService::new(
            SessionStore::new(),
            LocalSession::new(root),
            SessionConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_initial_resolution_publishes() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        let handle = service.store().handle();

        assert!(handle.snapshot().resolving);
        service.resolve().await;
        assert_eq!(handle.snapshot(), SessionState::resolved(true, false));
    }

    #[tokio::test]
    async fn test_sign_in_keeps_first_launch() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());

        let state = service
            .apply(SessionCommand::SignIn {
                user: "ana".to_string(),
            })
            .await;
        assert_eq!(state, SessionState::resolved(true, true));
    }

    #[tokio::test]
    async fn test_onboarding_then_sign_out() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());

        service
            .apply(SessionCommand::SignIn {
                user: "ana".to_string(),
            })
            .await;
        service.apply(SessionCommand::CompleteOnboarding).await;
        let state = service.apply(SessionCommand::SignOut).await;
        assert_eq!(state, SessionState::resolved(false, false));
    }

    #[tokio::test]
    async fn test_corrupt_storage_falls_back_to_signed_out() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("session.json"), "garbage").unwrap();
        std::fs::write(dir.path().join("launched"), "").unwrap();

        let service = service(dir.path());
        let state = service.resolve().await;
        assert_eq!(state, SessionState::resolved(false, false));
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_keeps_service_alive() {
        let dir = tempdir().unwrap();
        let service = SessionService::new(
            SessionStore::new(),
            LocalSession::new(dir.path()),
            SessionConfig {
                session_ttl_days: 200_000_000_000_000,
                ..SessionConfig::default()
            },
        );

        let state = service
            .apply(SessionCommand::SignIn {
                user: "ana".to_string(),
            })
            .await;
        assert_eq!(state, SessionState::resolved(true, false));

        let state = service.apply(SessionCommand::CompleteOnboarding).await;
        assert_eq!(state, SessionState::resolved(false, false));
    }

    #[tokio::test]
    async fn test_slow_resolution_times_out_signed_out() {
        let (release, wait) = std::sync::mpsc::channel::<()>();

        let state = resolve_within(Duration::from_millis(50), move || {
            let _ = wait.recv();
            Ok(SessionState::resolved(false, true))
        })
        .await;
        assert_eq!(state, SessionState::resolved(true, false));

        drop(release);
    }

    #[tokio::test]
    async fn test_panicking_resolution_falls_back_to_signed_out() {
        let state = resolve_within(Duration::from_secs(5), || -> std::result::Result<_, _> {
            panic!("storage exploded")
        })
        .await;
        assert_eq!(state, SessionState::resolved(true, false));
    }

    #[tokio::test]
    async fn test_failed_resolution_keeps_first_launch_answer() {
        let state = resolve_within(Duration::from_secs(5), || {
            Err((anyhow::anyhow!("disk unavailable"), false))
        })
        .await;
        assert_eq!(state, SessionState::resolved(false, false));
    }

    #[tokio::test]
    async fn test_service_loop_applies_commands() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        let mut handle = service.store().handle();
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run_session_service(service, rx));

        assert_eq!(handle.changed().await, Some(SessionState::resolved(true, false)));

        tx.send(SessionCommand::SignIn {
            user: "ana".to_string(),
        })
        .unwrap();
        assert_eq!(handle.changed().await, Some(SessionState::resolved(true, true)));

        drop(tx);
        task.await.unwrap();
    }
}
