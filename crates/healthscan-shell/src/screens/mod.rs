//! Screen contract.
//!
//! Feature screens are opaque to the shell: each is a `ScreenComponent`
//! registered under the `NavigationTarget` it renders. Screens read their
//! props, keep their own `ScreenState`, and talk back only through a
//! `NavigationHandle`. They never touch the session directly.

mod placeholder;

use std::collections::HashMap;

use crossterm::event::KeyEvent;
use healthscan_core::session::{SessionCommand, SessionState};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::navigation::NavRequest;
use crate::routes::{ModalRoute, NavigationTarget, RouteParams};

/// Entry-local state owned by the router, handed to the screen on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenState {
    /// Highlighted row in list screens.
    pub selected: usize,
    pub scroll: u16,
    /// Text typed into the screen's input, if it has one.
    pub draft: String,
}

impl ScreenState {
    pub const fn new() -> Self {
        Self {
            selected: 0,
            scroll: 0,
            draft: String::new(),
        }
    }
}

/// Everything a screen may read while rendering.
#[derive(Debug, Clone, Copy)]
pub struct ScreenProps<'a> {
    pub target: NavigationTarget,
    pub params: &'a RouteParams,
    pub state: &'a ScreenState,
    pub session: SessionState,
}

/// Collects what a screen asked for while handling a key.
///
/// The reducer drains it after the call: navigation requests go to the router,
/// session commands become effects.
#[derive(Debug, Default)]
pub struct NavigationHandle {
    requests: Vec<NavRequest>,
    commands: Vec<SessionCommand>,
}

impl NavigationHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&mut self, target: impl Into<NavigationTarget>, params: RouteParams) {
        self.requests.push(NavRequest::Navigate {
            target: target.into(),
            params,
        });
    }

    pub fn replace(&mut self, target: impl Into<NavigationTarget>, params: RouteParams) {
        self.requests.push(NavRequest::Replace {
            target: target.into(),
            params,
        });
    }

    pub fn go_back(&mut self) {
        self.requests.push(NavRequest::GoBack);
    }

    pub fn open_modal(&mut self, modal: ModalRoute, params: RouteParams) {
        self.navigate(modal, params);
    }

    pub fn session(&mut self, command: SessionCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && self.commands.is_empty()
    }

    pub fn into_parts(self) -> (Vec<NavRequest>, Vec<SessionCommand>) {
        (self.requests, self.commands)
    }
}

/// A renderable feature screen.
pub trait ScreenComponent {
    /// Heading shown above the screen body.
    fn title(&self) -> &'static str;

    fn render(&self, frame: &mut Frame, area: Rect, props: &ScreenProps<'_>);

    /// Handles a key press. Returns true if the key was consumed.
    fn handle_key(
        &self,
        _key: KeyEvent,
        _params: &RouteParams,
        _state: &mut ScreenState,
        _nav: &mut NavigationHandle,
    ) -> bool {
        false
    }
}

/// Screens by the target they render.
pub struct ScreenRegistry {
    screens: HashMap<NavigationTarget, Box<dyn ScreenComponent>>,
}

impl std::fmt::Debug for ScreenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut targets: Vec<_> = self.screens.keys().collect();
        targets.sort();
        f.debug_struct("ScreenRegistry")
            .field("targets", &targets)
            .finish()
    }
}

impl Default for ScreenRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl ScreenRegistry {
    /// A registry with no screens. Unregistered targets render a notice.
    pub fn empty() -> Self {
        Self {
            screens: HashMap::new(),
        }
    }

    /// A registry with the built-in screen for every route.
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        placeholder::register_all(&mut registry);
        registry
    }

    /// Registers `screen` for `target`, replacing any previous one.
    pub fn register(
        &mut self,
        target: impl Into<NavigationTarget>,
        screen: Box<dyn ScreenComponent>,
    ) {
        self.screens.insert(target.into(), screen);
    }

    pub fn get(&self, target: NavigationTarget) -> Option<&dyn ScreenComponent> {
        self.screens.get(&target).map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::routes::{StackRoute, Tab};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn send(target: NavigationTarget, code: KeyCode, state: &mut ScreenState) -> NavigationHandle {
        send_with(target, code, &RouteParams::new(), state)
    }

    fn send_with(
        target: NavigationTarget,
        code: KeyCode,
        params: &RouteParams,
        state: &mut ScreenState,
    ) -> NavigationHandle {
        let registry = ScreenRegistry::with_builtin();
        let screen = registry.get(target).unwrap();
        let mut nav = NavigationHandle::new();
        screen.handle_key(press(code), params, state, &mut nav);
        nav
    }

    #[test]
    fn test_builtin_covers_every_route() {
        let registry = ScreenRegistry::with_builtin();
        for route in [
            StackRoute::Landing,
            StackRoute::Login,
            StackRoute::Signup,
        ] {
            assert!(registry.get(route.into()).is_some(), "{route:?}");
        }
        for tab in Tab::all() {
            assert!(registry.get((*tab).into()).is_some(), "{tab:?}");
        }
        for modal in ModalRoute::all() {
            assert!(registry.get((*modal).into()).is_some(), "{modal:?}");
        }
    }

    #[test]
    fn test_landing_links_to_auth_screens() {
        let mut state = ScreenState::new();
        let (requests, _) = send(StackRoute::Landing.into(), KeyCode::Char('l'), &mut state)
            .into_parts();
        assert_eq!(requests, [NavRequest::navigate(StackRoute::Login)]);

        let (requests, _) = send(StackRoute::Landing.into(), KeyCode::Char('s'), &mut state)
            .into_parts();
        assert_eq!(requests, [NavRequest::navigate(StackRoute::Signup)]);
    }

    #[test]
    fn test_login_signs_in_with_typed_name() {
        let mut state = ScreenState::new();
        for c in "ana".chars() {
            send(StackRoute::Login.into(), KeyCode::Char(c), &mut state);
        }
        let (requests, commands) =
            send(StackRoute::Login.into(), KeyCode::Enter, &mut state).into_parts();
        assert!(requests.is_empty());
        assert_eq!(
            commands,
            [SessionCommand::SignIn {
                user: "ana".to_string()
            }]
        );
    }

    #[test]
    fn test_collections_opens_selected_record() {
        let mut state = ScreenState::new();
        send(Tab::Collections.into(), KeyCode::Down, &mut state);
        send(Tab::Collections.into(), KeyCode::Down, &mut state);
        assert_eq!(state.selected, 2);

        let (requests, _) =
            send(Tab::Collections.into(), KeyCode::Enter, &mut state).into_parts();
        assert_eq!(
            requests,
            [NavRequest::Navigate {
                target: ModalRoute::RecordDetail.into(),
                params: RouteParams::record("rec-003"),
            }]
        );
    }

    #[test]
    fn test_profile_sign_out() {
        let mut state = ScreenState::new();
        let (_, commands) = send(Tab::Profile.into(), KeyCode::Char('o'), &mut state).into_parts();
        assert_eq!(commands, [SessionCommand::SignOut]);
    }

    #[test]
    fn test_scanner_replaces_itself_with_record() {
        let mut state = ScreenState::new();
        let (requests, _) =
            send(ModalRoute::QrScanner.into(), KeyCode::Enter, &mut state).into_parts();
        assert!(matches!(
            requests.as_slice(),
            [NavRequest::Replace { target, params }]
                if *target == ModalRoute::RecordDetail.into() && params.record_id().is_some()
        ));
    }

    #[test]
    fn test_unhandled_key_is_not_consumed() {
        let registry = ScreenRegistry::with_builtin();
        let screen = registry.get(ModalRoute::RecordDetail.into()).unwrap();
        let mut nav = NavigationHandle::new();
        let consumed = screen.handle_key(
            press(KeyCode::F(9)),
            &RouteParams::record("rec-001"),
            &mut ScreenState::new(),
            &mut nav,
        );
        assert!(!consumed);
        assert!(nav.is_empty());
    }
}
