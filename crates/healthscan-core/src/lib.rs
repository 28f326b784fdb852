//! Core HealthScan library (session model, session store, config, logging).
//!
//! Everything here is UI-agnostic. The shell crate consumes the session
//! contract through [`session::SessionHandle`] and never writes it.

pub mod config;
pub mod interrupt;
pub mod logging;
pub mod session;
