//! Session command handlers. They work on the same files the shell resolves.

use anyhow::{Context, Result};
use chrono::Utc;
use healthscan_core::config::Config;
use healthscan_core::session::LocalSession;

pub fn show(json: bool) -> Result<()> {
    let local = LocalSession::from_env()?;
    let state = local.resolve(Utc::now()).context("resolve session")?;

    if json {
        let out = serde_json::to_string_pretty(&state).context("encode session state")?;
        println!("{out}");
        return Ok(());
    }

    println!("state: {state}");
    if let Some(session) = local.load()? {
        println!("user: {}", session.user);
        println!("expires: {}", session.expires_at.to_rfc3339());
    }
    Ok(())
}

pub fn login(user: &str, config: &Config) -> Result<()> {
    let user = user.trim();
    if user.is_empty() {
        anyhow::bail!("User name must not be empty");
    }
    let local = LocalSession::from_env()?;
    let ttl = config.session.session_ttl()?;
    let session = local.sign_in(user, ttl, Utc::now())?;
    println!(
        "Signed in as {} until {}",
        session.user,
        session.expires_at.to_rfc3339()
    );
    Ok(())
}

pub fn logout() -> Result<()> {
    LocalSession::from_env()?.sign_out()?;
    println!("Signed out");
    Ok(())
}

pub fn reset() -> Result<()> {
    LocalSession::from_env()?.reset()?;
    println!("Session reset; the next launch starts at Landing");
    Ok(())
}
