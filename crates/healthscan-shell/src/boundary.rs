//! Render-failure boundary.
//!
//! Wraps the whole render pass in `catch_unwind`. The first panic moves the
//! boundary from `Healthy` to `Failed`; from then on only the static recovery
//! view is drawn and the failed subtree is never called again. Restarting the
//! process is the only way back.
//!
//! Panics inside the boundary are captured by the process panic hook (see
//! `capture_panic`) instead of being printed over the UI.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub const FALLBACK_TITLE: &str = "Something went wrong";
pub const FALLBACK_HINT: &str = "Please restart the app";

thread_local! {
    static IN_BOUNDARY: Cell<bool> = const { Cell::new(false) };
    static CAPTURED: RefCell<Option<PanicCapture>> = const { RefCell::new(None) };
}

/// Location and backtrace recorded by the panic hook.
#[derive(Debug)]
struct PanicCapture {
    location: Option<String>,
    backtrace: String,
}

/// Marks the current thread as inside the boundary until dropped.
struct BoundaryGuard {
    previous: bool,
}

impl BoundaryGuard {
    fn enter() -> Self {
        let previous = IN_BOUNDARY.with(|flag| flag.replace(true));
        CAPTURED.with(|captured| captured.borrow_mut().take());
        Self { previous }
    }
}

impl Drop for BoundaryGuard {
    fn drop(&mut self) {
        IN_BOUNDARY.with(|flag| flag.set(self.previous));
    }
}

/// Called from the process panic hook. Records the panic and returns true
/// when it was raised inside a boundary, in which case the hook stays silent.
pub fn capture_panic(info: &PanicHookInfo<'_>) -> bool {
    if !IN_BOUNDARY.with(Cell::get) {
        return false;
    }
    let capture = PanicCapture {
        location: info.location().map(ToString::to_string),
        backtrace: Backtrace::force_capture().to_string(),
    };
    // `try_borrow_mut` so a panic while the slot is borrowed cannot abort.
    CAPTURED.with(|captured| {
        if let Ok(mut slot) = captured.try_borrow_mut() {
            *slot = Some(capture);
        }
    });
    true
}

fn take_capture() -> Option<PanicCapture> {
    CAPTURED.with(|captured| captured.try_borrow_mut().ok().and_then(|mut slot| slot.take()))
}

/// A caught render panic and where it happened.
#[derive(Debug, Clone)]
pub struct RenderFailure {
    pub message: String,
    /// Route names from the stack root to the screen being drawn.
    pub route_path: Vec<String>,
    pub location: Option<String>,
    pub backtrace: Option<String>,
    pub at: DateTime<Utc>,
}

impl RenderFailure {
    fn from_panic(payload: &(dyn Any + Send), route_path: &[&str]) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        let capture = take_capture();
        Self {
            message,
            route_path: route_path.iter().map(|s| (*s).to_string()).collect(),
            location: capture.as_ref().and_then(|c| c.location.clone()),
            backtrace: capture.map(|c| c.backtrace),
            at: Utc::now(),
        }
    }

    /// `Root > Child > Leaf`, or `-` when nothing was mounted.
    pub fn route(&self) -> String {
        if self.route_path.is_empty() {
            "-".to_string()
        } else {
            self.route_path.join(" > ")
        }
    }
}

impl std::fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "render failed at {}: {}", self.route(), self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum BoundaryState {
    Healthy,
    /// Terminal.
    Failed(RenderFailure),
}

#[derive(Debug)]
pub struct RenderBoundary {
    state: BoundaryState,
}

impl Default for RenderBoundary {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBoundary {
    pub fn new() -> Self {
        Self {
            state: BoundaryState::Healthy,
        }
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    pub fn failure(&self) -> Option<&RenderFailure> {
        match &self.state {
            BoundaryState::Healthy => None,
            BoundaryState::Failed(failure) => Some(failure),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, BoundaryState::Failed(_))
    }

    /// Runs `draw` unless the boundary has failed, then draws the fallback.
    ///
    /// A panic in `draw` wipes whatever it drew and shows the fallback
    /// instead, in the same frame.
    pub fn render<F>(&mut self, frame: &mut Frame, route_path: &[&str], draw: F)
    where
        F: FnOnce(&mut Frame),
    {
        if self.is_failed() {
            render_fallback(frame);
            return;
        }

        let result = {
            let _guard = BoundaryGuard::enter();
            panic::catch_unwind(AssertUnwindSafe(|| draw(frame)))
        };

        let Err(payload) = result else {
            return;
        };

        let failure = RenderFailure::from_panic(payload.as_ref(), route_path);
        log_failure(&failure);
        self.state = BoundaryState::Failed(failure);

        frame.buffer_mut().reset();
        render_fallback(frame);
    }
}

/// Logs the failure. A panicking subscriber is swallowed.
fn log_failure(failure: &RenderFailure) {
    let _guard = BoundaryGuard::enter();
    let logged = panic::catch_unwind(AssertUnwindSafe(|| {
        tracing::error!(
            route = %failure.route(),
            location = failure.location.as_deref().unwrap_or("unknown"),
            at = %failure.at.to_rfc3339(),
            backtrace = failure.backtrace.as_deref().unwrap_or(""),
            "render failed: {}",
            failure.message
        );
    }));
    drop(logged);
}

/// The static recovery view.
pub fn render_fallback(frame: &mut Frame) {
    let area = frame.area();
    let [_, body, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    let lines = vec![
        Line::from(Span::styled(
            FALLBACK_TITLE,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            FALLBACK_HINT,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
}
