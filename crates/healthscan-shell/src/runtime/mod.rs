//! Shell runtime: owns the terminal, runs the event loop, executes effects.
//!
//! All side effects happen here. The reducer stays pure and returns effects;
//! rendering goes through the render-failure boundary.
//!
//! Event sources, drained once per loop iteration:
//! - the session handle (a published `SessionState` becomes `UiEvent::Session`)
//! - the terminal (crossterm key/resize events)
//! - the tick timer (spinner animation)

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use healthscan_core::config::ShellConfig;
use healthscan_core::interrupt;
use healthscan_core::session::{SessionCommandSender, SessionHandle};

use crate::boundary::RenderBoundary;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::screens::ScreenRegistry;
use crate::state::AppState;
use crate::terminal::{self, ShellTerminal};
use crate::{render, update};

/// Full-screen shell runtime.
pub struct ShellRuntime {
    terminal: ShellTerminal,
    pub state: AppState,
    boundary: RenderBoundary,
    session: SessionHandle,
    commands: SessionCommandSender,
    tick: Duration,
    last_tick: Instant,
    should_quit: bool,
}

impl ShellRuntime {
    pub fn new(
        session: SessionHandle,
        commands: SessionCommandSender,
        config: &ShellConfig,
        screens: ScreenRegistry,
    ) -> Result<Self> {
        // Hook before the alternate screen so early panics still restore.
        terminal::install_panic_hook();
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        Ok(Self {
            terminal,
            state: AppState::new(screens),
            boundary: RenderBoundary::new(),
            session,
            commands,
            tick: config.tick(),
            last_tick: Instant::now(),
            should_quit: false,
        })
    }

    /// Runs until quit, then restores the terminal.
    pub fn run(&mut self) -> Result<()> {
        let result = self.event_loop();
        let restored = terminal::restore_terminal();
        result.and(restored)
    }

    fn event_loop(&mut self) -> Result<()> {
        // The first snapshot may predate this runtime; deliver it explicitly.
        let initial = self.session.snapshot();
        self.dispatch(UiEvent::Session(initial));
        let mut dirty = true;

        while !self.should_quit {
            if interrupt::is_interrupted() {
                tracing::info!("interrupted, quitting");
                return Err(interrupt::InterruptedError.into());
            }

            for event in self.collect_events()? {
                self.dispatch(event);
                dirty = true;
            }

            if dirty {
                let state = &self.state;
                let boundary = &mut self.boundary;
                self.terminal
                    .draw(|frame| render::draw(state, boundary, frame))
                    .context("Failed to draw frame")?;
                dirty = false;
            }
        }

        Ok(())
    }

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        if let Some(state) = self.session.take_changed() {
            events.push(UiEvent::Session(state));
        }

        let poll_duration = if events.is_empty() {
            self.tick.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= self.tick {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn dispatch(&mut self, event: UiEvent) {
        for effect in update::update(&mut self.state, event) {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => self.should_quit = true,
            UiEffect::Session(command) => {
                if let Err(err) = self.commands.send(command) {
                    tracing::warn!(command = ?err.0, "session service is gone, command dropped");
                }
            }
        }
    }
}
