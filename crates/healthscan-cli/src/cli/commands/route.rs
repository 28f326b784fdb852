//! Route inspection: what the shell mounts for a given session state.

use anyhow::{Context, Result};
use healthscan_core::session::SessionState;
use healthscan_shell::navigation::{StackKind, StackSelection, select_stack};
use healthscan_shell::routes::Tab;
use serde::Serialize;

#[derive(Serialize)]
struct RouteReport {
    session: SessionState,
    selection: StackSelection,
    routes: Vec<&'static str>,
    tabs: Vec<&'static str>,
}

pub fn run(state: SessionState, json: bool) -> Result<()> {
    let selection = select_stack(&state);
    let routes = selection
        .declared_routes()
        .into_iter()
        .map(|target| target.name())
        .collect();
    let tabs = if selection.stack() == Some(StackKind::Authenticated) {
        Tab::all().iter().map(|tab| tab.name()).collect()
    } else {
        Vec::new()
    };
    let report = RouteReport {
        session: state,
        selection,
        routes,
        tabs,
    };

    if json {
        let out = serde_json::to_string_pretty(&report).context("encode route report")?;
        println!("{out}");
        return Ok(());
    }

    println!("session: {}", report.session);
    match report.selection {
        StackSelection::Loading => println!("view: loading"),
        StackSelection::Mount { stack, initial } => {
            println!("view: {} stack", stack.name());
            println!("initial: {}", initial.name());
            println!("routes: {}", report.routes.join(", "));
            if !report.tabs.is_empty() {
                println!("tabs: {}", report.tabs.join(", "));
            }
        }
    }
    Ok(())
}
