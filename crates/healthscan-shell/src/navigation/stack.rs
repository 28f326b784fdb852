use crate::navigation::{StackKind, TabRouter};
use crate::routes::{NavigationTarget, Presentation, RouteParams, StackRoute, Tab};
use crate::screens::ScreenState;

/// Identity of one mount. A remount always gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(pub u64);

/// One screen in the stack history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub target: NavigationTarget,
    pub params: RouteParams,
    /// Screen-local state, dropped with the entry.
    pub state: ScreenState,
}

impl StackEntry {
    fn new(target: NavigationTarget, params: RouteParams) -> Self {
        Self {
            target,
            params,
            state: ScreenState::default(),
        }
    }
}

/// Navigation requests screens may issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavRequest {
    /// Go to `target`: pop back to it if already in history, else push.
    Navigate {
        target: NavigationTarget,
        params: RouteParams,
    },
    /// Swap the top entry for `target`. The `MainTabs` root is never
    /// swapped out; replacing it navigates instead.
    Replace {
        target: NavigationTarget,
        params: RouteParams,
    },
    /// Pop the top entry. No-op at the root.
    GoBack,
}

impl NavRequest {
    pub fn navigate(target: impl Into<NavigationTarget>) -> Self {
        NavRequest::Navigate {
            target: target.into(),
            params: RouteParams::new(),
        }
    }
}

/// A request the current mount cannot honour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Nothing is mounted yet (session still resolving).
    NotMounted { target: Option<NavigationTarget> },
    /// `target` is not declared by the mounted stack.
    NotDeclared {
        target: NavigationTarget,
        stack: StackKind,
    },
}

impl std::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationError::NotMounted { target: Some(target) } => {
                write!(f, "cannot navigate to {target}: no stack is mounted")
            }
            NavigationError::NotMounted { target: None } => {
                write!(f, "cannot navigate: no stack is mounted")
            }
            NavigationError::NotDeclared { target, stack } => {
                write!(
                    f,
                    "route {target} is not declared in the {} stack",
                    stack.name()
                )
            }
        }
    }
}

impl std::error::Error for NavigationError {}

/// A mounted stack: its declared routes, history, and (when authenticated)
/// the tab router.
#[derive(Debug, Clone)]
pub struct MountedStack {
    id: MountId,
    kind: StackKind,
    initial: StackRoute,
    declared: Vec<NavigationTarget>,
    entries: Vec<StackEntry>,
    tabs: Option<TabRouter>,
}

impl MountedStack {
    /// Mounts a fresh stack at `initial`. Called only by the router.
    pub(crate) fn mount(
        id: MountId,
        kind: StackKind,
        initial: StackRoute,
        declared: Vec<NavigationTarget>,
    ) -> Self {
        let tabs = (kind == StackKind::Authenticated).then(TabRouter::new);
        Self {
            id,
            kind,
            initial,
            declared,
            entries: vec![StackEntry::new(initial.into(), RouteParams::new())],
            tabs,
        }
    }

    pub fn id(&self) -> MountId {
        self.id
    }

    pub fn kind(&self) -> StackKind {
        self.kind
    }

    pub fn initial(&self) -> StackRoute {
        self.initial
    }

    pub fn declared(&self) -> &[NavigationTarget] {
        &self.declared
    }

    pub fn declares(&self, target: NavigationTarget) -> bool {
        match target {
            NavigationTarget::Tab(_) => self.tabs.is_some(),
            _ => self.declared.contains(&target),
        }
    }

    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    pub fn top(&self) -> &StackEntry {
        // The root entry is never popped.
        &self.entries[self.entries.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut StackEntry {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn tabs(&self) -> Option<&TabRouter> {
        self.tabs.as_ref()
    }

    pub fn tabs_mut(&mut self) -> Option<&mut TabRouter> {
        self.tabs.as_mut()
    }

    /// Index of the entry drawn full-screen: the topmost one that is not a
    /// popup modal. Popups above it are layered on top.
    pub fn base_index(&self) -> usize {
        self.entries
            .iter()
            .rposition(|e| e.target.presentation() == Presentation::Card)
            .unwrap_or(0)
    }

    /// True when the tab bar is on screen (the base entry is `MainTabs`).
    pub fn showing_tabs(&self) -> bool {
        self.tabs.is_some()
            && self.entries[self.base_index()].target == StackRoute::MainTabs.into()
    }

    /// Route names from root to top, with the active tab after `MainTabs`.
    pub fn route_path(&self) -> Vec<&'static str> {
        let mut path = Vec::with_capacity(self.entries.len() + 1);
        for entry in &self.entries {
            path.push(entry.target.name());
            if entry.target == StackRoute::MainTabs.into()
                && let Some(tabs) = &self.tabs
            {
                path.push(tabs.active().name());
            }
        }
        path
    }

    /// Applies a navigation request.
    ///
    /// Returns whether anything changed. Undeclared targets are rejected and
    /// leave the stack untouched.
    pub fn apply(&mut self, request: NavRequest) -> Result<bool, NavigationError> {
        match request {
            NavRequest::Navigate {
                target: NavigationTarget::Tab(tab),
                ..
            }
            | NavRequest::Replace {
                target: NavigationTarget::Tab(tab),
                ..
            } => self.focus_tab(tab),
            NavRequest::Navigate { target, params } => self.navigate(target, params),
            NavRequest::Replace { target, params } => self.replace(target, params),
            NavRequest::GoBack => Ok(self.go_back()),
        }
    }

    fn ensure_declared(&self, target: NavigationTarget) -> Result<(), NavigationError> {
        if self.declares(target) {
            Ok(())
        } else {
            Err(NavigationError::NotDeclared {
                target,
                stack: self.kind,
            })
        }
    }

    fn focus_tab(&mut self, tab: Tab) -> Result<bool, NavigationError> {
        self.ensure_declared(tab.into())?;
        let popped = self.entries.len() > 1;
        self.entries.truncate(1);
        let switched = self.tabs.as_mut().is_some_and(|tabs| tabs.select(tab));
        Ok(popped || switched)
    }

    fn navigate(
        &mut self,
        target: NavigationTarget,
        params: RouteParams,
    ) -> Result<bool, NavigationError> {
        self.ensure_declared(target)?;

        if let Some(pos) = self.entries.iter().position(|e| e.target == target) {
            let popped = pos + 1 != self.entries.len();
            self.entries.truncate(pos + 1);
            let entry = self.top_mut();
            let params_changed = !params.is_empty() && entry.params != params;
            if params_changed {
                entry.params = params;
            }
            return Ok(popped || params_changed);
        }

        self.entries.push(StackEntry::new(target, params));
        Ok(true)
    }

    fn replace(
        &mut self,
        target: NavigationTarget,
        params: RouteParams,
    ) -> Result<bool, NavigationError> {
        self.ensure_declared(target)?;
        if self.entries.len() == 1 && self.tabs.is_some() {
            return self.navigate(target, params);
        }
        *self.top_mut() = StackEntry::new(target, params);
        Ok(true)
    }

    fn go_back(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            true
        } else {
            false
        }
    }
}
