//! Session-gated navigation.
//!
//! ## Module Structure
//!
//! - `selection.rs`: pure mapping from `SessionState` to a stack selection
//! - `stack.rs`: a mounted stack (history, declared routes, entry-local state)
//! - `tabs.rs`: bottom tab router and the tab icon map
//! - `router.rs`: `StackRouter`, which mounts/remounts stacks on session changes
//!
//! ## Lifecycle
//!
//! ```text
//! SessionState ──select_stack──▶ StackSelection
//!                                  ├── Loading            (nothing mounted)
//!                                  └── Mount { stack, initial }
//!                                         │
//!                      StackRouter::apply_session
//!                                         │ selection changed?
//!                                         ▼
//!                                  MountedStack (new MountId)
//! ```

mod router;
mod selection;
mod stack;
mod tabs;

pub use router::{RouterChange, StackRouter};
pub use selection::{StackKind, StackSelection, select_stack};
pub use stack::{MountId, MountedStack, NavRequest, NavigationError, StackEntry};
pub use tabs::{TabIcon, TabRouter, tab_icon};
