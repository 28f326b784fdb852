//! CLI command handlers.

pub mod config;
pub mod route;
pub mod session;
pub mod shell;
