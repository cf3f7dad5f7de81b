//! Interactive operator menu
//!
//! The session accepts the numeric selections 1 (run a command), 2 (add a
//! host), 3 (remove a host) and 0 (exit); anything else re-prompts. Store
//! errors abort the current operation with a visible message and drop the
//! operator back at the menu; per-host execution failures are reported in
//! the dispatch results and never end the session.

use anyhow::Result;
use dialoguer::{Confirm, Input, Password};

use crate::Context;
use crate::config::FlotillaConfig;
use crate::dispatch;
use crate::error::StoreError;
use crate::inventory::{HostRecord, Inventory};
use crate::ssh::SshExecutor;
use crate::ui;

use super::hosts::open_store;

pub fn run(ctx: &Context, config: &FlotillaConfig) -> Result<()> {
    if !ctx.quiet {
        ui::banner();
    }

    let store = open_store(config)?;
    let executor = SshExecutor::new(config.exec_options());

    loop {
        println!();
        println!("  1) Run a command across the fleet");
        println!("  2) Add a host");
        println!("  3) Remove a host");
        println!("  0) Exit");

        let choice: String = Input::new().with_prompt("Select").interact_text()?;
        match choice.trim() {
            "1" => run_flow(&store, &executor)?,
            "2" => add_flow(&store)?,
            "3" => remove_flow(&store)?,
            "0" => break,
            other => ui::warn(&format!("'{other}' is not a menu option")),
        }
    }

    Ok(())
}

/// Prompt for a command, dispatch it to every host, offer another round.
fn run_flow(store: &Inventory, executor: &SshExecutor) -> Result<()> {
    loop {
        let command: String = Input::new()
            .with_prompt("Command")
            .allow_empty(true)
            .interact_text()?;

        let hosts = match store.list() {
            Ok(hosts) => hosts,
            Err(e) => {
                ui::error(&e.to_string());
                return Ok(());
            }
        };

        if hosts.is_empty() {
            ui::info("Inventory is empty; add a host first");
            return Ok(());
        }

        let results = dispatch::run_on_all(executor, &hosts, &command);
        dispatch::report(&results);

        let again = Confirm::new()
            .with_prompt("Run another command?")
            .default(true)
            .interact()?;
        if !again {
            return Ok(());
        }
    }
}

/// Prompt for a new host record, re-prompting while validation fails.
fn add_flow(store: &Inventory) -> Result<()> {
    loop {
        let hostname: String = Input::new()
            .with_prompt("Hostname")
            .allow_empty(true)
            .interact_text()?;
        let username: String = Input::new()
            .with_prompt("Username")
            .allow_empty(true)
            .interact_text()?;
        let password = Password::new()
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?;

        match store.append(HostRecord {
            hostname,
            username,
            password,
        }) {
            Ok(()) => {
                ui::success("Host added");
                return Ok(());
            }
            Err(e @ StoreError::Validation(_)) => ui::error(&e.to_string()),
            Err(e) => {
                ui::error(&e.to_string());
                return Ok(());
            }
        }
    }
}

/// List hosts with their positions and prompt for one to delete.
/// 0 cancels; out-of-range positions re-prompt.
fn remove_flow(store: &Inventory) -> Result<()> {
    let hosts = match store.list() {
        Ok(hosts) => hosts,
        Err(e) => {
            ui::error(&e.to_string());
            return Ok(());
        }
    };

    if hosts.is_empty() {
        ui::info("Inventory is empty; nothing to remove");
        return Ok(());
    }

    for (idx, host) in hosts.iter().enumerate() {
        println!("  {}. {}", idx + 1, host.target());
    }

    loop {
        let raw: String = Input::new()
            .with_prompt("Position to remove (0 to cancel)")
            .interact_text()?;
        let Ok(position) = raw.trim().parse::<usize>() else {
            ui::warn("Enter a number");
            continue;
        };
        if position == 0 {
            ui::dim("cancelled");
            return Ok(());
        }

        match store.remove_at(position) {
            Ok(removed) => {
                ui::success(&format!("Removed {}", removed.target()));
                return Ok(());
            }
            Err(e @ StoreError::OutOfRange { .. }) => ui::error(&e.to_string()),
            Err(e) => {
                ui::error(&e.to_string());
                return Ok(());
            }
        }
    }
}
