//! `parley sessions` subcommands.
//!
//! These talk to the backend directly; the interactive chat mode drives the
//! same operations through the reducer instead.

use std::io::Write;

use anyhow::{Context, Result};
use parley_core::api::ApiClient;
use parley_core::config::Config;

pub async fn list(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.backend)?;
    let sessions = client.list_sessions().await.context("list sessions")?;

    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    for session in &sessions {
        println!(
            "{}  {}  {}",
            session.session_id,
            session.created_at.format("%Y-%m-%d %H:%M"),
            session.display_title(),
        );
    }
    Ok(())
}

pub async fn rename(config: &Config, id: &str, title: &str) -> Result<()> {
    let client = ApiClient::new(&config.backend)?;
    let updated = client
        .rename_session(id, title)
        .await
        .with_context(|| format!("rename session {id}"))?;
    println!(
        "Renamed session {} to \"{}\".",
        updated.session_id,
        updated.display_title()
    );
    Ok(())
}

pub async fn delete(config: &Config, id: &str, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Delete session {id}? [y/N] "))? {
        println!("Aborted.");
        return Ok(());
    }

    let client = ApiClient::new(&config.backend)?;
    client
        .delete_session(id)
        .await
        .with_context(|| format!("delete session {id}"))?;
    println!("Deleted session {id}.");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush().context("flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
