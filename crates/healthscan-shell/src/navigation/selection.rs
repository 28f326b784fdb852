//! Stack selection.
//!
//! Precedence, evaluated top to bottom:
//! 1. `resolving` → loading only (also covers impossible combinations such as
//!    `resolving && authenticated`)
//! 2. signed out, first launch → unauthenticated stack starting at `Landing`
//! 3. signed out → unauthenticated stack starting at `Login`
//! 4. signed in → authenticated stack starting at `MainTabs`

use healthscan_core::session::SessionState;
use serde::Serialize;

use crate::routes::{ModalRoute, NavigationTarget, StackRoute};

/// The two mutually exclusive stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StackKind {
    Unauthenticated,
    Authenticated,
}

impl StackKind {
    pub fn name(self) -> &'static str {
        match self {
            StackKind::Unauthenticated => "unauthenticated",
            StackKind::Authenticated => "authenticated",
        }
    }
}

/// What the root should show for a given session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum StackSelection {
    Loading,
    Mount {
        stack: StackKind,
        initial: StackRoute,
    },
}

impl StackSelection {
    /// Routes the mount declares. Anything else is rejected by the stack.
    pub fn declared_routes(self) -> Vec<NavigationTarget> {
        match self {
            StackSelection::Loading => Vec::new(),
            StackSelection::Mount {
                stack: StackKind::Unauthenticated,
                initial,
            } => {
                let mut routes = Vec::with_capacity(3);
                // Landing only exists for the first launch.
                if initial == StackRoute::Landing {
                    routes.push(StackRoute::Landing.into());
                }
                routes.push(StackRoute::Login.into());
                routes.push(StackRoute::Signup.into());
                routes
            }
            StackSelection::Mount {
                stack: StackKind::Authenticated,
                ..
            } => std::iter::once(StackRoute::MainTabs.into())
                .chain(ModalRoute::all().iter().map(|&m| NavigationTarget::Modal(m)))
                .collect(),
        }
    }

    pub fn stack(self) -> Option<StackKind> {
        match self {
            StackSelection::Loading => None,
            StackSelection::Mount { stack, .. } => Some(stack),
        }
    }
}

/// Maps a session state to the root selection. Pure.
pub fn select_stack(state: &SessionState) -> StackSelection {
    if state.resolving {
        return StackSelection::Loading;
    }

    if !state.authenticated {
        let initial = if state.first_launch {
            StackRoute::Landing
        } else {
            StackRoute::Login
        };
        return StackSelection::Mount {
            stack: StackKind::Unauthenticated,
            initial,
        };
    }

    StackSelection::Mount {
        stack: StackKind::Authenticated,
        initial: StackRoute::MainTabs,
    }
}
