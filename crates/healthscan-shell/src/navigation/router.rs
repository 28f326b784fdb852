use healthscan_core::session::SessionState;

use super::{MountId, MountedStack, NavRequest, NavigationError, StackSelection, select_stack};

/// What `StackRouter::apply_session` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterChange {
    /// Selection unchanged; the current mount (if any) was kept.
    Unchanged,
    /// Back to loading; the previous stack was dropped.
    Unmounted,
    /// First mount after loading.
    Mounted { id: MountId },
    /// A different stack replaced a mounted one without passing through loading.
    Remounted { id: MountId },
}

/// Owns the mounted stack and swaps it whenever the session selection changes.
#[derive(Debug, Default)]
pub struct StackRouter {
    last_session: Option<SessionState>,
    selection: Option<StackSelection>,
    mounted: Option<MountedStack>,
    mount_seq: u64,
}

impl StackRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluates the selection for `state`.
    ///
    /// A changed selection always produces a fresh mount. Nothing carries over
    /// from the old stack.
    pub fn apply_session(&mut self, state: SessionState) -> RouterChange {
        if self.last_session == Some(state) {
            return RouterChange::Unchanged;
        }
        self.last_session = Some(state);

        let selection = select_stack(&state);
        if self.selection == Some(selection) {
            tracing::debug!(%state, "session changed, selection kept");
            return RouterChange::Unchanged;
        }
        self.selection = Some(selection);

        let StackSelection::Mount { stack, initial } = selection else {
            let had_mount = self.mounted.take().is_some();
            tracing::info!(%state, "session resolving, showing loading view");
            return if had_mount {
                RouterChange::Unmounted
            } else {
                RouterChange::Unchanged
            };
        };

        self.mount_seq += 1;
        let id = MountId(self.mount_seq);
        let previous = self
            .mounted
            .replace(MountedStack::mount(
                id,
                stack,
                initial,
                selection.declared_routes(),
            ))
            .map(|old| old.id());

        tracing::info!(
            %state,
            stack = stack.name(),
            initial = initial.name(),
            mount = id.0,
            "stack mounted"
        );

        match previous {
            Some(_) => RouterChange::Remounted { id },
            None => RouterChange::Mounted { id },
        }
    }

    /// Last applied session state, if any.
    pub fn session(&self) -> Option<SessionState> {
        self.last_session
    }

    pub fn selection(&self) -> Option<StackSelection> {
        self.selection
    }

    pub fn mounted(&self) -> Option<&MountedStack> {
        self.mounted.as_ref()
    }

    pub fn mounted_mut(&mut self) -> Option<&mut MountedStack> {
        self.mounted.as_mut()
    }

    /// True while the loading view is shown.
    pub fn is_loading(&self) -> bool {
        self.mounted.is_none()
    }

    /// Forwards a navigation request to the mounted stack.
    pub fn apply(&mut self, request: NavRequest) -> Result<bool, NavigationError> {
        let Some(stack) = self.mounted.as_mut() else {
            let target = match &request {
                NavRequest::Navigate { target, .. } | NavRequest::Replace { target, .. } => {
                    Some(*target)
                }
                NavRequest::GoBack => None,
            };
            return Err(NavigationError::NotMounted { target });
        };
        stack.apply(request)
    }

    /// Route names from the stack root to the visible screen, `["Loading"]`
    /// while nothing is mounted.
    pub fn route_path(&self) -> Vec<&'static str> {
        self.mounted
            .as_ref()
            .map_or_else(|| vec!["Loading"], MountedStack::route_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::StackKind;
    use crate::routes::{ModalRoute, StackRoute, Tab};

    const RESOLVING: SessionState = SessionState::resolving();

    #[test]
    fn test_initial_resolving_mounts_nothing() {
        let mut router = StackRouter::new();
        assert_eq!(router.apply_session(RESOLVING), RouterChange::Unchanged);
        assert!(router.is_loading());
        assert_eq!(router.route_path(), ["Loading"]);
    }

    #[test]
    fn test_same_state_does_not_remount() {
        let mut router = StackRouter::new();
        let state = SessionState::resolved(false, true);
        let RouterChange::Mounted { id } = router.apply_session(state) else {
            panic!("expected a first mount");
        };
        assert_eq!(router.apply_session(state), RouterChange::Unchanged);
        assert_eq!(router.mounted().unwrap().id(), id);
    }

    #[test]
    fn test_same_selection_keeps_mount() {
        let mut router = StackRouter::new();
        router.apply_session(SessionState::resolved(true, true));
        let id = router.mounted().unwrap().id();

        router
            .apply(NavRequest::navigate(ModalRoute::CollectionSystem))
            .unwrap();
        assert_eq!(
            router.apply_session(SessionState::resolved(false, true)),
            RouterChange::Unchanged
        );
        assert_eq!(router.mounted().unwrap().id(), id);
        assert_eq!(router.mounted().unwrap().entries().len(), 2);
    }

    #[test]
    fn test_scenario_loading_landing_tabs() {
        let mut router = StackRouter::new();

        router.apply_session(RESOLVING);
        assert!(router.is_loading());

        let change = router.apply_session(SessionState::resolved(true, false));
        assert!(matches!(change, RouterChange::Mounted { .. }));
        assert_eq!(router.route_path(), ["Landing"]);

        let change = router.apply_session(SessionState::resolved(true, true));
        assert!(matches!(change, RouterChange::Remounted { .. }));
        let stack = router.mounted().unwrap();
        assert_eq!(stack.kind(), StackKind::Authenticated);
        assert_eq!(stack.tabs().unwrap().tabs().len(), 5);
        assert_eq!(router.route_path(), ["MainTabs", "Dashboard"]);
    }

    #[test]
    fn test_remount_resets_history_and_tabs() {
        let mut router = StackRouter::new();
        router.apply_session(SessionState::resolved(false, true));
        router.apply(NavRequest::navigate(Tab::Profile)).unwrap();
        router
            .mounted_mut()
            .unwrap()
            .tabs_mut()
            .unwrap()
            .active_state_mut()
            .scroll = 4;
        let first = router.mounted().unwrap().id();

        router.apply_session(RESOLVING);
        assert!(router.mounted().is_none());
        router.apply_session(SessionState::resolved(false, true));

        let stack = router.mounted().unwrap();
        assert_ne!(stack.id(), first);
        let tabs = stack.tabs().unwrap();
        assert_eq!(tabs.active(), Tab::Dashboard);
        assert!(!tabs.is_visited(Tab::Profile));
    }

    #[test]
    fn test_resolving_unmounts() {
        let mut router = StackRouter::new();
        router.apply_session(SessionState::resolved(false, false));
        assert_eq!(router.apply_session(RESOLVING), RouterChange::Unmounted);
        assert_eq!(router.apply_session(RESOLVING), RouterChange::Unchanged);
    }

    #[test]
    fn test_resolving_and_authenticated_is_loading() {
        let mut router = StackRouter::new();
        let impossible = SessionState {
            resolving: true,
            first_launch: false,
            authenticated: true,
        };
        router.apply_session(impossible);
        assert!(router.is_loading());
    }

    #[test]
    fn test_sign_out_remounts_at_login() {
        let mut router = StackRouter::new();
        router.apply_session(SessionState::resolved(false, true));
        let change = router.apply_session(SessionState::resolved(false, false));
        assert!(matches!(change, RouterChange::Remounted { .. }));
        assert_eq!(router.mounted().unwrap().initial(), StackRoute::Login);
    }

    #[test]
    fn test_navigation_while_loading_is_rejected() {
        let mut router = StackRouter::new();
        let err = router.apply(NavRequest::GoBack).unwrap_err();
        assert_eq!(err, NavigationError::NotMounted { target: None });
    }
}
