//! Session contract consumed by the shell.
//!
//! ## Module Structure
//!
//! - `state.rs`: `SessionState` snapshot (`loading`, `isFirstLaunch`, `isAuthenticated`)
//! - `store.rs`: single-writer `SessionStore` and read-only `SessionHandle`
//! - `local.rs`: on-disk session and onboarding marker under `$HEALTHSCAN_HOME`
//! - `service.rs`: async task that resolves the session and applies `SessionCommand`s

mod local;
mod service;
mod state;
mod store;

pub use local::{LocalSession, StoredSession};
pub use service::{SessionCommand, SessionCommandSender, SessionService, run_session_service};
pub use state::SessionState;
pub use store::{SessionHandle, SessionStore};
