//! Pure view functions.
//!
//! Everything here takes `&AppState` and draws to a frame. No mutations, no
//! effects. `draw` is the entry point the runtime uses: it runs `render`
//! inside the render-failure boundary.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::boundary::RenderBoundary;
use crate::navigation::{MountedStack, StackEntry, TabRouter};
use crate::overlays::render_modal_frame;
use crate::routes::{NavigationTarget, Presentation, RouteParams, StackRoute};
use crate::screens::{ScreenProps, ScreenState};
use crate::state::AppState;

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Ticks per spinner frame.
const SPINNER_SPEED_DIVISOR: usize = 2;

const HEADER_HEIGHT: u16 = 1;

/// Icon row, label row, indicator row.
const TAB_BAR_HEIGHT: u16 = 3;

/// Draws the frame through the boundary.
pub fn draw(app: &AppState, boundary: &mut RenderBoundary, frame: &mut Frame) {
    let route_path = app.router.route_path();
    boundary.render(frame, &route_path, |frame| render(app, frame));
}

pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    match app.router.mounted() {
        None => render_loading(frame, area, app.spinner_frame),
        Some(stack) => render_stack(app, stack, frame, area),
    }
}

fn render_loading(frame: &mut Frame, area: Rect, spinner_frame: usize) {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    let spinner = SPINNER_FRAMES[(spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len()];
    let line = Line::from(vec![
        Span::styled(spinner, Style::default().fg(Color::Cyan)),
        Span::raw(" Loading…"),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
}

fn render_stack(app: &AppState, stack: &MountedStack, frame: &mut Frame, area: Rect) {
    let tab_bar_height = if stack.showing_tabs() { TAB_BAR_HEIGHT } else { 0 };
    let [header, body, tab_bar] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Fill(1),
        Constraint::Length(tab_bar_height),
    ])
    .areas(area);

    render_header(frame, header, &app.router.route_path());

    let base = stack.base_index();
    let entries = stack.entries();
    render_entry(app, stack, &entries[base], frame, body);

    for entry in &entries[base + 1..] {
        // Only popups sit above the base entry.
        debug_assert_eq!(entry.target.presentation(), Presentation::Modal);
        let inner = render_modal_frame(frame, body, entry.target.name());
        render_entry(app, stack, entry, frame, inner);
    }

    if let Some(tabs) = stack.tabs().filter(|_| stack.showing_tabs()) {
        render_tab_bar(frame, tab_bar, tabs);
    }
}

fn render_header(frame: &mut Frame, area: Rect, route_path: &[&str]) {
    let line = Line::from(vec![
        Span::styled(
            "HealthScan",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", route_path.join(" › ")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draws one stack entry. `MainTabs` resolves to the active tab's screen.
fn render_entry(
    app: &AppState,
    stack: &MountedStack,
    entry: &StackEntry,
    frame: &mut Frame,
    area: Rect,
) {
    let empty = RouteParams::new();
    let (target, params, state): (NavigationTarget, &RouteParams, &ScreenState) =
        match stack.tabs() {
            Some(tabs) if entry.target == StackRoute::MainTabs.into() => {
                (tabs.active().into(), &empty, tabs.active_state())
            }
            _ => (entry.target, &entry.params, &entry.state),
        };

    let Some(screen) = app.screens.get(target) else {
        let notice = Paragraph::new(Line::from(Span::styled(
            format!("No screen registered for {target}"),
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(notice, area);
        return;
    };

    screen.render(
        frame,
        area,
        &ScreenProps {
            target,
            params,
            state,
            session: app.session,
        },
    );
}

fn render_tab_bar(frame: &mut Frame, area: Rect, tabs: &TabRouter) {
    let icons = tabs.icons();
    let columns = Layout::horizontal(icons.iter().map(|_| Constraint::Fill(1))).split(area);

    for ((tab, icon), column) in icons.iter().zip(columns.iter()) {
        let focused = *tab == tabs.active();
        let color = if focused { Color::Cyan } else { Color::DarkGray };

        let mut icon_style = Style::default().fg(color);
        if icon.is_some_and(|i| i.size >= 22) {
            icon_style = icon_style.add_modifier(Modifier::BOLD);
        }

        let lines = vec![
            Line::from(Span::styled(
                icon.map_or("", |i| i.glyph()),
                icon_style,
            )),
            Line::from(Span::styled(tab.label(), Style::default().fg(color))),
            Line::from(Span::styled(
                if icon.is_some_and(|i| i.indicator) { "•" } else { "" },
                Style::default().fg(color),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            *column,
        );
    }
}
