//! Full-screen HealthScan shell.
//!
//! Observes the session store, mounts the matching navigation stack, and
//! renders it inside a render-failure boundary.

pub mod boundary;
pub mod effects;
pub mod events;
pub mod navigation;
pub mod overlays;
pub mod render;
pub mod routes;
pub mod runtime;
pub mod screens;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
use healthscan_core::config::ShellConfig;
use healthscan_core::session::{SessionCommandSender, SessionHandle};
pub use runtime::ShellRuntime;

use crate::screens::ScreenRegistry;

/// Runs the interactive shell with the built-in screens until the user quits.
pub fn run_shell(
    session: SessionHandle,
    commands: SessionCommandSender,
    config: &ShellConfig,
) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The shell requires a terminal.\n\
             Use `healthscan route` or `healthscan session show` for non-interactive use."
        );
    }

    let mut runtime = ShellRuntime::new(session, commands, config, ScreenRegistry::with_builtin())?;
    runtime.run()
}
