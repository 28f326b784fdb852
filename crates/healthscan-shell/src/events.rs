//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`.

use crossterm::event::Event;
use healthscan_core::session::SessionState;

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Periodic tick for animation.
    Tick,
    /// Raw terminal input.
    Terminal(Event),
    /// The session store published a new state.
    Session(SessionState),
}
