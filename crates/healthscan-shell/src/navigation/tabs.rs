//! Bottom tab router.
//!
//! Selection is local to the router and never part of the session. Each tab
//! keeps its screen state from first visit until the authenticated stack is
//! remounted, which drops the whole router.

use std::collections::BTreeMap;

use crate::routes::Tab;
use crate::screens::ScreenState;

/// Visual representation of one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabIcon {
    /// Icon identifier understood by the icon provider.
    pub name: &'static str,
    pub size: u16,
    /// Underline dot shown under the focused tab.
    pub indicator: bool,
}

impl TabIcon {
    /// Terminal glyph for the icon identifier. Unknown identifiers draw nothing.
    pub fn glyph(&self) -> &'static str {
        match self.name {
            "home" => "■",
            "home-outline" => "□",
            "cloud-upload" => "▲",
            "cloud-upload-outline" => "△",
            "folder-open" => "◆",
            "folder-outline" => "◇",
            "qr-code" => "▣",
            "qr-code-outline" => "▢",
            "person" => "●",
            "person-outline" => "○",
            _ => "",
        }
    }
}

/// Looks up the icon for a tab route name.
///
/// Returns `None` for names outside the five tabs.
pub fn tab_icon(route_name: &str, focused: bool) -> Option<TabIcon> {
    let (focused_name, unfocused_name) = match Tab::from_name(route_name)? {
        Tab::Dashboard => ("home", "home-outline"),
        Tab::Upload => ("cloud-upload", "cloud-upload-outline"),
        Tab::Collections => ("folder-open", "folder-outline"),
        Tab::QrScanner => ("qr-code", "qr-code-outline"),
        Tab::Profile => ("person", "person-outline"),
    };

    Some(if focused {
        TabIcon {
            name: focused_name,
            size: 22,
            indicator: true,
        }
    } else {
        TabIcon {
            name: unfocused_name,
            size: 20,
            indicator: false,
        }
    })
}

#[derive(Debug, Clone)]
pub struct TabRouter {
    active: Tab,
    /// Screen state of every visited tab.
    visited: BTreeMap<Tab, ScreenState>,
}

impl Default for TabRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl TabRouter {
    /// Starts on the first tab (`Dashboard`).
    pub fn new() -> Self {
        let active = Tab::all()[0];
        let mut visited = BTreeMap::new();
        visited.insert(active, ScreenState::default());
        Self { active, visited }
    }

    pub fn tabs(&self) -> &'static [Tab] {
        Tab::all()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    /// Selects `tab`. Returns false if it was already active.
    pub fn select(&mut self, tab: Tab) -> bool {
        self.visited.entry(tab).or_default();
        if self.active == tab {
            return false;
        }
        self.active = tab;
        true
    }

    pub fn next(&mut self) {
        self.select(self.active.next());
    }

    pub fn prev(&mut self) {
        self.select(self.active.prev());
    }

    pub fn is_visited(&self, tab: Tab) -> bool {
        self.visited.contains_key(&tab)
    }

    pub fn state(&self, tab: Tab) -> Option<&ScreenState> {
        self.visited.get(&tab)
    }

    pub fn active_state(&self) -> &ScreenState {
        // `select` always inserts before activating.
        static EMPTY: ScreenState = ScreenState::new();
        self.visited.get(&self.active).unwrap_or(&EMPTY)
    }

    pub fn active_state_mut(&mut self) -> &mut ScreenState {
        self.visited.entry(self.active).or_default()
    }

    /// Icons for every tab, in bar order.
    pub fn icons(&self) -> Vec<(Tab, Option<TabIcon>)> {
        Tab::all()
            .iter()
            .map(|&tab| (tab, tab_icon(tab.name(), tab == self.active)))
            .collect()
    }
}
