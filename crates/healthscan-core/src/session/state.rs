use serde::{Deserialize, Serialize};

/// Observable session status.
///
/// While `resolving` is true, `first_launch` and `authenticated` carry no
/// meaning and must not be used to choose what to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(rename = "loading")]
    pub resolving: bool,
    #[serde(rename = "isFirstLaunch")]
    pub first_launch: bool,
    #[serde(rename = "isAuthenticated")]
    pub authenticated: bool,
}

impl SessionState {
    /// State published before anything is known.
    pub const fn resolving() -> Self {
        Self {
            resolving: true,
            first_launch: false,
            authenticated: false,
        }
    }

    pub const fn resolved(first_launch: bool, authenticated: bool) -> Self {
        Self {
            resolving: false,
            first_launch,
            authenticated,
        }
    }

    /// True only once resolution finished with a valid session.
    pub fn is_signed_in(&self) -> bool {
        !self.resolving && self.authenticated
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::resolving()
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.resolving {
            return write!(f, "resolving");
        }
        let auth = if self.authenticated {
            "authenticated"
        } else {
            "unauthenticated"
        };
        if self.first_launch {
            write!(f, "{auth}, first launch")
        } else {
            write!(f, "{auth}")
        }
    }
}
