//! Fleet-wide command execution

use anyhow::Result;
use std::time::Duration;

use crate::Context;
use crate::cli::RunArgs;
use crate::config::FlotillaConfig;
use crate::dispatch;
use crate::ssh::{ExecOptions, SshExecutor};
use crate::ui;

use super::hosts::open_store;

/// Resolve timeouts: CLI flags win over the config file.
fn exec_options(config: &FlotillaConfig, args: &RunArgs) -> ExecOptions {
    let mut opts = config.exec_options();
    if let Some(secs) = args.timeout {
        opts.command_timeout = match secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
    }
    if let Some(secs) = args.connect_timeout {
        opts.connect_timeout = Duration::from_secs(secs);
    }
    opts
}

/// Run one command across the whole inventory and report per-host results.
pub fn run(ctx: &Context, config: &FlotillaConfig, args: RunArgs) -> Result<()> {
    let store = open_store(config)?;
    let hosts = store.list()?;

    if hosts.is_empty() {
        ui::info("Inventory is empty; nothing to dispatch");
        return Ok(());
    }

    ui::header(&format!("Dispatching to {} hosts", hosts.len()));
    if ctx.verbose > 0 {
        ui::dim(&format!("inventory: {}", store.path().display()));
    }

    let executor = SshExecutor::new(exec_options(config, &args));
    let results = dispatch::run_on_all(&executor, &hosts, &args.command);
    dispatch::report(&results);

    let summary = dispatch::summarize(&results);
    if !summary.is_success() {
        anyhow::bail!("{} of {} hosts failed", summary.failed, summary.total());
    }
    Ok(())
}
