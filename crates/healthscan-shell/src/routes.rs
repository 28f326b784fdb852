//! Route identifiers.
//!
//! The route set is closed: every screen the shell can show is named here.
//! Names match the identifiers screens and the icon map use (`"MainTabs"`,
//! `"QRScanner"`, ...).

use std::collections::BTreeMap;

use serde::Serialize;

/// Top-level routes. Mutually exclusive with their siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StackRoute {
    Landing,
    Login,
    Signup,
    MainTabs,
}

impl StackRoute {
    pub fn name(self) -> &'static str {
        match self {
            StackRoute::Landing => "Landing",
            StackRoute::Login => "Login",
            StackRoute::Signup => "Signup",
            StackRoute::MainTabs => "MainTabs",
        }
    }
}

/// Peer routes inside the bottom tab bar, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tab {
    Dashboard,
    Upload,
    Collections,
    #[serde(rename = "QRScanner")]
    QrScanner,
    Profile,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Dashboard,
            Tab::Upload,
            Tab::Collections,
            Tab::QrScanner,
            Tab::Profile,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Upload => "Upload",
            Tab::Collections => "Collections",
            Tab::QrScanner => "QRScanner",
            Tab::Profile => "Profile",
        }
    }

    /// Label shown under the icon.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Home",
            Tab::Upload => "Upload",
            Tab::Collections => "Library",
            Tab::QrScanner => "Scan",
            Tab::Profile => "Profile",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|tab| tab.name() == name)
    }

    /// Tab for a 1-based number key.
    pub fn from_key(key: u8) -> Option<Self> {
        Self::all().get(usize::from(key).checked_sub(1)?).copied()
    }

    fn index(self) -> usize {
        Self::all().iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

/// How a modal route is layered over what is beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Presentation {
    /// Drawn as a popup above the previous entry.
    Modal,
    /// Replaces the previous entry on screen.
    Card,
}

/// Secondary routes of the authenticated stack, layered above the tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ModalRoute {
    CollectionSystem,
    RecordDetail,
    #[serde(rename = "QRScanner")]
    QrScanner,
}

impl ModalRoute {
    pub fn all() -> &'static [ModalRoute] {
        &[
            ModalRoute::CollectionSystem,
            ModalRoute::RecordDetail,
            ModalRoute::QrScanner,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            ModalRoute::CollectionSystem => "CollectionSystem",
            ModalRoute::RecordDetail => "RecordDetail",
            ModalRoute::QrScanner => "QRScanner",
        }
    }

    pub fn presentation(self) -> Presentation {
        match self {
            ModalRoute::RecordDetail => Presentation::Card,
            ModalRoute::CollectionSystem | ModalRoute::QrScanner => Presentation::Modal,
        }
    }
}

/// Anything the router can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "route", rename_all = "lowercase")]
pub enum NavigationTarget {
    Stack(StackRoute),
    Tab(Tab),
    Modal(ModalRoute),
}

impl NavigationTarget {
    pub fn name(self) -> &'static str {
        match self {
            NavigationTarget::Stack(route) => route.name(),
            NavigationTarget::Tab(tab) => tab.name(),
            NavigationTarget::Modal(route) => route.name(),
        }
    }

    /// Presentation of the entry, `Card` for everything but popup modals.
    pub fn presentation(self) -> Presentation {
        match self {
            NavigationTarget::Modal(route) => route.presentation(),
            NavigationTarget::Stack(_) | NavigationTarget::Tab(_) => Presentation::Card,
        }
    }
}

impl From<StackRoute> for NavigationTarget {
    fn from(route: StackRoute) -> Self {
        NavigationTarget::Stack(route)
    }
}

impl From<Tab> for NavigationTarget {
    fn from(tab: Tab) -> Self {
        NavigationTarget::Tab(tab)
    }
}

impl From<ModalRoute> for NavigationTarget {
    fn from(route: ModalRoute) -> Self {
        NavigationTarget::Modal(route)
    }
}

impl std::fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters attached to a stack entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    /// Key carrying the record shown by `RecordDetail`.
    pub const RECORD_ID: &'static str = "recordId";

    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn record(id: impl Into<String>) -> Self {
        Self::new().with(Self::RECORD_ID, id)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn record_id(&self) -> Option<&str> {
        self.get(Self::RECORD_ID)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
