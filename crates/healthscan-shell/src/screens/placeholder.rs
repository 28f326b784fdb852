//! Built-in screens.
//!
//! Stand-ins for the feature screens: enough content and key handling to walk
//! every route of both stacks.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use healthscan_core::session::SessionCommand;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::{NavigationHandle, ScreenComponent, ScreenProps, ScreenRegistry, ScreenState};
use crate::overlays::render_utils::{InputHint, InputLine, render_hints, render_input_line};
use crate::routes::{ModalRoute, RouteParams, StackRoute, Tab};

/// Sample records shown in the library.
const RECORDS: &[(&str, &str)] = &[
    ("rec-001", "Blood panel"),
    ("rec-002", "Chest X-ray"),
    ("rec-003", "Vaccination card"),
    ("rec-004", "Allergy report"),
    ("rec-005", "Dental check-up"),
];

const FOLDERS: &[&str] = &["Lab results", "Imaging", "Prescriptions", "Insurance"];

/// User signed in when the name input is left empty.
const DEFAULT_USER: &str = "demo";

/// Record id the scanner "reads".
const SCANNED_RECORD: &str = "rec-004";

pub(super) fn register_all(registry: &mut ScreenRegistry) {
    registry.register(StackRoute::Landing, Box::new(LandingScreen));
    registry.register(StackRoute::Login, Box::new(CredentialsScreen::login()));
    registry.register(StackRoute::Signup, Box::new(CredentialsScreen::signup()));
    registry.register(Tab::Dashboard, Box::new(DashboardScreen));
    registry.register(Tab::Upload, Box::new(UploadScreen));
    registry.register(Tab::Collections, Box::new(CollectionsScreen));
    registry.register(Tab::QrScanner, Box::new(ScannerScreen { modal: false }));
    registry.register(Tab::Profile, Box::new(ProfileScreen));
    registry.register(ModalRoute::CollectionSystem, Box::new(FolderPickerScreen));
    registry.register(ModalRoute::RecordDetail, Box::new(RecordDetailScreen));
    registry.register(ModalRoute::QrScanner, Box::new(ScannerScreen { modal: true }));
}

/// Draws the common frame: bordered block, body lines, hint footer.
fn render_panel(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    body: Vec<Line<'_>>,
    hints: &[InputHint<'_>],
) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {title} "))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !hints.is_empty() {
        render_hints(frame, inner, hints, Color::Cyan);
    }
    let body_area = Rect::new(
        inner.x,
        inner.y,
        inner.width,
        inner.height.saturating_sub(u16::from(!hints.is_empty())),
    );
    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), body_area);
    body_area
}

fn move_selection(state: &mut ScreenState, code: KeyCode, len: usize) -> bool {
    match code {
        KeyCode::Up => {
            state.selected = state.selected.saturating_sub(1);
            true
        }
        KeyCode::Down => {
            if state.selected + 1 < len {
                state.selected += 1;
            }
            true
        }
        _ => false,
    }
}

fn edit_draft(state: &mut ScreenState, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => {
            state.draft.push(c);
            true
        }
        KeyCode::Backspace => {
            state.draft.pop();
            true
        }
        _ => false,
    }
}

fn render_list(frame: &mut Frame, area: Rect, items: Vec<ListItem<'_>>, selected: usize) {
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    let mut list_state = ListState::default();
    list_state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

struct LandingScreen;

impl ScreenComponent for LandingScreen {
    fn title(&self) -> &'static str {
        "Welcome"
    }

    fn render(&self, frame: &mut Frame, area: Rect, _props: &ScreenProps<'_>) {
        render_panel(
            frame,
            area,
            self.title(),
            vec![
                Line::from(Span::styled(
                    "HealthScan",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from("Keep every health record one scan away."),
            ],
            &[
                InputHint::new("l", "log in"),
                InputHint::new("s", "sign up"),
                InputHint::new("Enter", "skip intro"),
            ],
        );
    }

    fn handle_key(
        &self,
        key: KeyEvent,
        _params: &RouteParams,
        _state: &mut ScreenState,
        nav: &mut NavigationHandle,
    ) -> bool {
        match key.code {
            KeyCode::Char('l') => nav.navigate(StackRoute::Login, RouteParams::new()),
            KeyCode::Char('s') => nav.navigate(StackRoute::Signup, RouteParams::new()),
            KeyCode::Enter => nav.session(SessionCommand::CompleteOnboarding),
            _ => return false,
        }
        true
    }
}

/// Login and signup share a single name input.
struct CredentialsScreen {
    title: &'static str,
    prompt: &'static str,
    /// Route offered as the alternative (`Signup` from login and vice versa).
    other: StackRoute,
}

impl CredentialsScreen {
    fn login() -> Self {
        Self {
            title: "Log in",
            prompt: "Name: ",
            other: StackRoute::Signup,
        }
    }

    fn signup() -> Self {
        Self {
            title: "Sign up",
            prompt: "New account: ",
            other: StackRoute::Login,
        }
    }
}

impl ScreenComponent for CredentialsScreen {
    fn title(&self) -> &'static str {
        self.title
    }

    fn render(&self, frame: &mut Frame, area: Rect, props: &ScreenProps<'_>) {
        let other = format!("go to {}", self.other.name());
        let body = render_panel(
            frame,
            area,
            self.title,
            Vec::new(),
            &[
                InputHint::new("Enter", "continue"),
                InputHint::new("Ctrl+O", &other),
            ],
        );
        let input_area = Rect::new(body.x, body.y, body.width, body.height.min(1));
        render_input_line(
            frame,
            input_area,
            &InputLine {
                value: &props.state.draft,
                placeholder: Some(DEFAULT_USER),
                prompt: self.prompt,
                prompt_color: Color::Cyan,
                text_color: Color::White,
                placeholder_color: Color::DarkGray,
                cursor_color: Color::Cyan,
            },
        );
    }

    fn handle_key(
        &self,
        key: KeyEvent,
        _params: &RouteParams,
        state: &mut ScreenState,
        nav: &mut NavigationHandle,
    ) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('o') if ctrl => nav.navigate(self.other, RouteParams::new()),
            KeyCode::Enter => {
                let user = state.draft.trim();
                let user = if user.is_empty() { DEFAULT_USER } else { user };
                nav.session(SessionCommand::SignIn {
                    user: user.to_string(),
                });
            }
            code => return edit_draft(state, code),
        }
        true
    }
}

struct DashboardScreen;

impl ScreenComponent for DashboardScreen {
    fn title(&self) -> &'static str {
        "Home"
    }

    fn render(&self, frame: &mut Frame, area: Rect, _props: &ScreenProps<'_>) {
        render_panel(
            frame,
            area,
            self.title(),
            vec![
                Line::from(format!("{} records in your library", RECORDS.len())),
                Line::from(format!("{} folders", FOLDERS.len())),
            ],
            &[
                InputHint::new("f", "folders"),
                InputHint::new("q", "scan"),
                InputHint::new("u", "upload"),
            ],
        );
    }

    fn handle_key(
        &self,
        key: KeyEvent,
        _params: &RouteParams,
        _state: &mut ScreenState,
        nav: &mut NavigationHandle,
    ) -> bool {
        match key.code {
            KeyCode::Char('f') => nav.open_modal(ModalRoute::CollectionSystem, RouteParams::new()),
            KeyCode::Char('q') => nav.open_modal(ModalRoute::QrScanner, RouteParams::new()),
            KeyCode::Char('u') => nav.navigate(Tab::Upload, RouteParams::new()),
            _ => return false,
        }
        true
    }
}

struct UploadScreen;

impl ScreenComponent for UploadScreen {
    fn title(&self) -> &'static str {
        "Upload"
    }

    fn render(&self, frame: &mut Frame, area: Rect, props: &ScreenProps<'_>) {
        let body = render_panel(
            frame,
            area,
            self.title(),
            Vec::new(),
            &[InputHint::new("Enter", "choose folder")],
        );
        render_input_line(
            frame,
            Rect::new(body.x, body.y, body.width, body.height.min(1)),
            &InputLine {
                value: &props.state.draft,
                placeholder: Some("path to a document"),
                prompt: "File: ",
                prompt_color: Color::Cyan,
                text_color: Color::White,
                placeholder_color: Color::DarkGray,
                cursor_color: Color::Cyan,
            },
        );
    }

    fn handle_key(
        &self,
        key: KeyEvent,
        _params: &RouteParams,
        state: &mut ScreenState,
        nav: &mut NavigationHandle,
    ) -> bool {
        if key.code == KeyCode::Enter {
            if !state.draft.trim().is_empty() {
                nav.open_modal(
                    ModalRoute::CollectionSystem,
                    RouteParams::new().with("file", state.draft.trim()),
                );
            }
            return true;
        }
        edit_draft(state, key.code)
    }
}

struct CollectionsScreen;

impl ScreenComponent for CollectionsScreen {
    fn title(&self) -> &'static str {
        "Library"
    }

    fn render(&self, frame: &mut Frame, area: Rect, props: &ScreenProps<'_>) {
        let body = render_panel(
            frame,
            area,
            self.title(),
            Vec::new(),
            &[InputHint::new("↑↓", "navigate"), InputHint::new("Enter", "open")],
        );
        let items = RECORDS
            .iter()
            .map(|(id, name)| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{name:<20}")),
                    Span::styled(*id, Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();
        render_list(frame, body, items, props.state.selected);
    }

    fn handle_key(
        &self,
        key: KeyEvent,
        _params: &RouteParams,
        state: &mut ScreenState,
        nav: &mut NavigationHandle,
    ) -> bool {
        if key.code == KeyCode::Enter {
            if let Some((id, _)) = RECORDS.get(state.selected) {
                nav.open_modal(ModalRoute::RecordDetail, RouteParams::record(*id));
            }
            return true;
        }
        move_selection(state, key.code, RECORDS.len())
    }
}

/// Scanner tab launches the scanner modal; the modal "reads" a code.
struct ScannerScreen {
    modal: bool,
}

impl ScreenComponent for ScannerScreen {
    fn title(&self) -> &'static str {
        "Scan"
    }

    fn render(&self, frame: &mut Frame, area: Rect, _props: &ScreenProps<'_>) {
        let (body, hint) = if self.modal {
            ("Point the camera at a record's QR code.", "capture")
        } else {
            ("Scan a QR code to open a shared record.", "start scanner")
        };
        render_panel(
            frame,
            area,
            self.title(),
            vec![Line::from(body)],
            &[InputHint::new("Enter", hint)],
        );
    }

    fn handle_key(
        &self,
        key: KeyEvent,
        _params: &RouteParams,
        _state: &mut ScreenState,
        nav: &mut NavigationHandle,
    ) -> bool {
        if key.code != KeyCode::Enter {
            return false;
        }
        if self.modal {
            nav.replace(ModalRoute::RecordDetail, RouteParams::record(SCANNED_RECORD));
        } else {
            nav.open_modal(ModalRoute::QrScanner, RouteParams::new());
        }
        true
    }
}

struct ProfileScreen;

impl ScreenComponent for ProfileScreen {
    fn title(&self) -> &'static str {
        "Profile"
    }

    fn render(&self, frame: &mut Frame, area: Rect, props: &ScreenProps<'_>) {
        render_panel(
            frame,
            area,
            self.title(),
            vec![Line::from(format!("Session: {}", props.session))],
            &[InputHint::new("o", "sign out"), InputHint::new("r", "refresh")],
        );
    }

    fn handle_key(
        &self,
        key: KeyEvent,
        _params: &RouteParams,
        _state: &mut ScreenState,
        nav: &mut NavigationHandle,
    ) -> bool {
        match key.code {
            KeyCode::Char('o') => nav.session(SessionCommand::SignOut),
            KeyCode::Char('r') => nav.session(SessionCommand::Refresh),
            _ => return false,
        }
        true
    }
}

struct FolderPickerScreen;

impl ScreenComponent for FolderPickerScreen {
    fn title(&self) -> &'static str {
        "Folders"
    }

    fn render(&self, frame: &mut Frame, area: Rect, props: &ScreenProps<'_>) {
        let body = render_panel(
            frame,
            area,
            self.title(),
            Vec::new(),
            &[InputHint::new("Enter", "open"), InputHint::new("Esc", "close")],
        );
        let mut list_area = body;
        if let Some(file) = props.params.get("file") {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("Filing {file}"),
                    Style::default().fg(Color::DarkGray),
                ))),
                Rect::new(body.x, body.y, body.width, body.height.min(1)),
            );
            list_area.y += 1;
            list_area.height = list_area.height.saturating_sub(1);
        }
        let items = FOLDERS.iter().map(|name| ListItem::new(*name)).collect();
        render_list(frame, list_area, items, props.state.selected);
    }

    fn handle_key(
        &self,
        key: KeyEvent,
        _params: &RouteParams,
        state: &mut ScreenState,
        nav: &mut NavigationHandle,
    ) -> bool {
        if key.code == KeyCode::Enter {
            nav.navigate(Tab::Collections, RouteParams::new());
            return true;
        }
        move_selection(state, key.code, FOLDERS.len())
    }
}

struct RecordDetailScreen;

impl ScreenComponent for RecordDetailScreen {
    fn title(&self) -> &'static str {
        "Record"
    }

    fn render(&self, frame: &mut Frame, area: Rect, props: &ScreenProps<'_>) {
        let id = props.params.record_id().unwrap_or("unknown");
        let name = RECORDS
            .iter()
            .find(|(record, _)| *record == id)
            .map_or("Unlisted record", |(_, name)| *name);
        render_panel(
            frame,
            area,
            self.title(),
            vec![
                Line::from(Span::styled(
                    name,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("Record id: {id}")),
            ],
            &[InputHint::new("Esc", "back")],
        );
    }
}
