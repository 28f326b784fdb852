//! Locally persisted session.
//!
//! Two files under the HealthScan home directory make up the state the
//! session service resolves:
//! - `session.json`: the signed-in user and when the session expires
//! - `launched`: present once onboarding has been completed
//!
//! Credential exchange with the backend is not modelled here; a stored session
//! is trusted until `expires_at`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::SessionState;
use crate::config::paths;

const SESSION_FILE: &str = "session.json";
const LAUNCH_MARKER: &str = "launched";

/// Contents of `session.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Session files rooted at one directory.
#[derive(Debug, Clone)]
pub struct LocalSession {
    root: PathBuf,
}

impl LocalSession {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses `$HEALTHSCAN_HOME` (or its default).
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(paths::healthscan_home()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_path(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }

    pub fn launch_marker_path(&self) -> PathBuf {
        self.root.join(LAUNCH_MARKER)
    }

    /// True until onboarding has been completed on this device.
    pub fn is_first_launch(&self) -> Result<bool> {
        let marker = self.launch_marker_path();
        let exists = marker
            .try_exists()
            .with_context(|| format!("Failed to check {}", marker.display()))?;
        Ok(!exists)
    }

    /// Reads `session.json`, if any.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        let path = self.session_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        let session = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(session))
    }

    /// Resolves the observable session state at `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<SessionState> {
        let first_launch = self.is_first_launch()?;
        let authenticated = self
            .load()?
            .is_some_and(|session| session.is_valid_at(now));
        Ok(SessionState::resolved(first_launch, authenticated))
    }

    /// Persists a new session for `user`.
    pub fn sign_in(&self, user: &str, ttl: Duration, now: DateTime<Utc>) -> Result<StoredSession> {
        let expires_at = now
            .checked_add_signed(ttl)
            .context("Session expiry is out of range")?;
        let session = StoredSession {
            user: user.to_string(),
            issued_at: now,
            expires_at,
        };
        self.ensure_root()?;
        let path = self.session_path();
        let json = serde_json::to_string_pretty(&session).context("Failed to encode session")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(session)
    }

    /// Removes the stored session. Missing files are fine.
    pub fn sign_out(&self) -> Result<()> {
        remove_if_exists(&self.session_path())
    }

    /// Records that onboarding is done.
    pub fn complete_onboarding(&self) -> Result<()> {
        self.ensure_root()?;
        let marker = self.launch_marker_path();
        fs::write(&marker, b"").with_context(|| format!("Failed to write {}", marker.display()))
    }

    /// Forgets both the session and the onboarding marker.
    pub fn reset(&self) -> Result<()> {
        self.sign_out()?;
        remove_if_exists(&self.launch_marker_path())
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("Failed to remove {}", path.display())),
    }
}
