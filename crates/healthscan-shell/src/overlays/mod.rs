//! Popup layering for modal-presented routes.

pub mod render_utils;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use render_utils::{calculate_overlay_area, render_overlay_container};

/// Popup size as a share of the screen.
const MODAL_WIDTH_PERCENT: u32 = 70;
const MODAL_HEIGHT_PERCENT: u32 = 60;

fn percent_of(len: u16, percent: u32) -> u16 {
    (u32::from(len) * percent / 100) as u16
}

/// Draws the popup frame for a modal route and returns its content area.
pub fn render_modal_frame(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    let width = percent_of(area.width, MODAL_WIDTH_PERCENT);
    let height = percent_of(area.height, MODAL_HEIGHT_PERCENT);
    let mut popup = calculate_overlay_area(area, area.height, width, height);
    popup.x += area.x;
    popup.y += area.y;
    render_overlay_container(frame, popup, title, Color::Magenta);

    Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    )
}
