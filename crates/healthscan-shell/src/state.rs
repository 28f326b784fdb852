//! Shell state.
//!
//! ```text
//! AppState
//! ├── session: SessionState     (last snapshot delivered by the store)
//! ├── router: StackRouter       (mounted stack, its history and tab router)
//! ├── screens: ScreenRegistry   (screen per route)
//! └── spinner_frame             (loading animation)
//! ```
//!
//! The render-failure boundary is not part of `AppState`: it wraps rendering
//! and lives with the runtime.

use healthscan_core::session::SessionState;

use crate::navigation::StackRouter;
use crate::screens::ScreenRegistry;

#[derive(Debug)]
pub struct AppState {
    pub session: SessionState,
    pub router: StackRouter,
    pub screens: ScreenRegistry,
    pub spinner_frame: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ScreenRegistry::with_builtin())
    }
}

impl AppState {
    /// Starts resolving with nothing mounted. The first session delivery
    /// decides what to show.
    pub fn new(screens: ScreenRegistry) -> Self {
        Self {
            session: SessionState::resolving(),
            router: StackRouter::new(),
            screens,
            spinner_frame: 0,
        }
    }
}
