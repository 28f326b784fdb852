//! Shell reducer.
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::navigation::{NavRequest, RouterChange};
use crate::routes::{NavigationTarget, RouteParams, StackRoute, Tab};
use crate::screens::NavigationHandle;
use crate::state::AppState;

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            if app.router.is_loading() {
                app.spinner_frame = app.spinner_frame.wrapping_add(1);
            }
            vec![]
        }
        UiEvent::Session(state) => {
            tracing::debug!(%state, "session delivered");
            app.session = state;
            if let RouterChange::Unmounted = app.router.apply_session(state) {
                app.spinner_frame = 0;
            }
            vec![]
        }
        UiEvent::Terminal(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            handle_key(app, key)
        }
        UiEvent::Terminal(_) => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
        return vec![UiEffect::Quit];
    }

    let Some(stack) = app.router.mounted() else {
        return vec![];
    };
    let at_tabs = stack.top().target == StackRoute::MainTabs.into();
    let active_tab = stack.tabs().map(|tabs| tabs.active());

    match (key.code, active_tab) {
        (KeyCode::Esc, _) => {
            navigate(app, NavRequest::GoBack);
            return vec![];
        }
        (KeyCode::Tab, Some(tab)) if at_tabs => {
            navigate(app, NavRequest::navigate(tab.next()));
            return vec![];
        }
        (KeyCode::BackTab, Some(tab)) if at_tabs => {
            navigate(app, NavRequest::navigate(tab.prev()));
            return vec![];
        }
        _ => {}
    }

    let (consumed, nav) = dispatch_to_screen(app, key);

    if !consumed
        && at_tabs
        && let KeyCode::Char(c @ '1'..='5') = key.code
        && let Some(tab) = c.to_digit(10).and_then(|d| Tab::from_key(d as u8))
    {
        navigate(app, NavRequest::navigate(tab));
    }

    let (requests, commands) = nav.into_parts();
    for request in requests {
        navigate(app, request);
    }
    commands.into_iter().map(UiEffect::Session).collect()
}

/// Hands the key to the visible screen: the active tab when `MainTabs` is on
/// top, otherwise the top entry.
fn dispatch_to_screen(app: &mut AppState, key: KeyEvent) -> (bool, NavigationHandle) {
    let mut nav = NavigationHandle::new();
    let Some(stack) = app.router.mounted_mut() else {
        return (false, nav);
    };

    let consumed = if stack.top().target == StackRoute::MainTabs.into() {
        let Some(tabs) = stack.tabs_mut() else {
            return (false, nav);
        };
        let target = NavigationTarget::from(tabs.active());
        app.screens.get(target).is_some_and(|screen| {
            screen.handle_key(key, &RouteParams::new(), tabs.active_state_mut(), &mut nav)
        })
    } else {
        let entry = stack.top_mut();
        app.screens.get(entry.target).is_some_and(|screen| {
            screen.handle_key(key, &entry.params, &mut entry.state, &mut nav)
        })
    };

    (consumed, nav)
}

fn navigate(app: &mut AppState, request: NavRequest) {
    if let Err(err) = app.router.apply(request) {
        tracing::warn!(%err, "navigation rejected");
    }
}

#[cfg(test)]
mod tests {
    use healthscan_core::session::{SessionCommand, SessionState};

    use super::*;
    use crate::routes::ModalRoute;

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(c: char) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )))
    }

    fn app_with(state: SessionState) -> AppState {
        let mut app = AppState::default();
        update(&mut app, UiEvent::Session(state));
        app
    }

    fn signed_in() -> AppState {
        app_with(SessionState::resolved(false, true))
    }

    #[test]
    fn test_quit_keys() {
        let mut app = AppState::default();
        assert_eq!(update(&mut app, ctrl('c')), [UiEffect::Quit]);
        assert_eq!(update(&mut app, ctrl('q')), [UiEffect::Quit]);
    }

    #[test]
    fn test_keys_ignored_while_loading() {
        let mut app = AppState::default();
        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
        assert!(update(&mut app, key(KeyCode::Esc)).is_empty());
        assert!(app.router.is_loading());
    }

    #[test]
    fn test_tick_advances_spinner_only_while_loading() {
        let mut app = AppState::default();
        update(&mut app, UiEvent::Tick);
        update(&mut app, UiEvent::Tick);
        assert_eq!(app.spinner_frame, 2);

        update(&mut app, UiEvent::Session(SessionState::resolved(false, false)));
        update(&mut app, UiEvent::Tick);
        assert_eq!(app.spinner_frame, 2);
    }

    #[test]
    fn test_number_keys_select_tabs() {
        let mut app = signed_in();
        update(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.router.route_path(), ["MainTabs", "Collections"]);
        update(&mut app, key(KeyCode::Char('5')));
        assert_eq!(app.router.route_path(), ["MainTabs", "Profile"]);
    }

    #[test]
    fn test_tab_key_cycles() {
        let mut app = signed_in();
        update(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.router.route_path(), ["MainTabs", "Profile"]);
        update(&mut app, key(KeyCode::Tab));
        assert_eq!(app.router.route_path(), ["MainTabs", "Dashboard"]);
    }

    #[test]
    fn test_digits_go_to_focused_input_first() {
        let mut app = signed_in();
        update(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.router.route_path(), ["MainTabs", "Upload"]);

        update(&mut app, key(KeyCode::Char('4')));
        assert_eq!(app.router.route_path(), ["MainTabs", "Upload"]);
        let tabs = app.router.mounted().unwrap().tabs().unwrap();
        assert_eq!(tabs.active_state().draft, "4");
    }

    #[test]
    fn test_open_record_and_go_back() {
        let mut app = signed_in();
        update(&mut app, key(KeyCode::Char('3')));
        update(&mut app, key(KeyCode::Down));
        update(&mut app, key(KeyCode::Enter));

        let stack = app.router.mounted().unwrap();
        assert_eq!(stack.top().target, ModalRoute::RecordDetail.into());
        assert_eq!(stack.top().params.record_id(), Some("rec-002"));

        update(&mut app, key(KeyCode::Esc));
        assert_eq!(app.router.route_path(), ["MainTabs", "Collections"]);
        let tabs = app.router.mounted().unwrap().tabs().unwrap();
        assert_eq!(tabs.active_state().selected, 1);
    }

    #[test]
    fn test_tab_keys_inactive_under_modal() {
        let mut app = signed_in();
        update(&mut app, key(KeyCode::Char('f')));
        assert_eq!(
            app.router.mounted().unwrap().top().target,
            ModalRoute::CollectionSystem.into()
        );

        update(&mut app, key(KeyCode::Char('5')));
        update(&mut app, key(KeyCode::Tab));
        assert_eq!(
            app.router.route_path(),
            ["MainTabs", "Dashboard", "CollectionSystem"]
        );
    }

    #[test]
    fn test_screen_session_commands_become_effects() {
        let mut app = signed_in();
        update(&mut app, key(KeyCode::Char('5')));
        let effects = update(&mut app, key(KeyCode::Char('o')));
        assert_eq!(effects, [UiEffect::Session(SessionCommand::SignOut)]);
        // Nothing changes until the store publishes.
        assert_eq!(app.router.route_path(), ["MainTabs", "Profile"]);
    }

    #[test]
    fn test_landing_flow() {
        let mut app = app_with(SessionState::resolved(true, false));
        update(&mut app, key(KeyCode::Char('s')));
        assert_eq!(app.router.route_path(), ["Landing", "Signup"]);
        update(&mut app, key(KeyCode::Esc));
        update(&mut app, key(KeyCode::Esc));
        assert_eq!(app.router.route_path(), ["Landing"]);

        let effects = update(&mut app, key(KeyCode::Enter));
        assert_eq!(
            effects,
            [UiEffect::Session(SessionCommand::CompleteOnboarding)]
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = signed_in();
        let mut release = KeyEvent::new(KeyCode::Char('3'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        update(&mut app, UiEvent::Terminal(Event::Key(release)));
        assert_eq!(app.router.route_path(), ["MainTabs", "Dashboard"]);
    }

    #[test]
    fn test_scenario_resolving_landing_tabs() {
        let mut app = AppState::default();
        update(&mut app, UiEvent::Session(SessionState::resolving()));
        assert!(app.router.is_loading());

        update(
            &mut app,
            UiEvent::Session(SessionState::resolved(true, false)),
        );
        assert_eq!(app.router.route_path(), ["Landing"]);

        update(&mut app, UiEvent::Session(SessionState::resolved(true, true)));
        assert_eq!(app.router.route_path(), ["MainTabs", "Dashboard"]);
        assert_eq!(app.session, SessionState::resolved(true, true));
    }
}
