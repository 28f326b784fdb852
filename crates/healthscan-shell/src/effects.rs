//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer never performs I/O itself.

use healthscan_core::session::SessionCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,
    /// Forward a session request to the session service.
    Session(SessionCommand),
}
