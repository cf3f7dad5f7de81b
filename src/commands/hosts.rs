//! Inventory management commands

use anyhow::Result;
use dialoguer::Password;

use crate::Context;
use crate::config::FlotillaConfig;
use crate::inventory::{HostRecord, Inventory};
use crate::ui;

/// Open the inventory at its configured location, creating an empty store
/// on first use.
pub(crate) fn open_store(config: &FlotillaConfig) -> Result<Inventory> {
    let store = Inventory::open(config.inventory_path()?);
    store.bootstrap()?;
    Ok(store)
}

/// Append a host to the inventory
pub fn add(
    _ctx: &Context,
    config: &FlotillaConfig,
    hostname: &str,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    ui::header(&format!("Adding Host: {hostname}"));

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?,
    };

    ui::kv("Hostname", hostname);
    ui::kv("Username", username);

    let store = open_store(config)?;
    store.append(HostRecord {
        hostname: hostname.to_string(),
        username: username.to_string(),
        password,
    })?;

    ui::success(&format!("Added {username}@{hostname}"));
    Ok(())
}

/// Remove the host at a 1-based position
pub fn rm(_ctx: &Context, config: &FlotillaConfig, position: usize) -> Result<()> {
    let store = open_store(config)?;
    let removed = store.remove_at(position)?;
    ui::success(&format!("Removed {} (position {position})", removed.target()));
    Ok(())
}

/// List inventory entries
pub fn list(_ctx: &Context, config: &FlotillaConfig) -> Result<()> {
    let store = open_store(config)?;
    let hosts = store.list()?;

    ui::header("Inventory");
    if hosts.is_empty() {
        ui::dim("no hosts yet; add one with 'flotilla hosts add'");
        return Ok(());
    }
    for (idx, host) in hosts.iter().enumerate() {
        println!("  {}. {}", idx + 1, host.target());
    }
    Ok(())
}
