//! Fleet dispatch
//!
//! Runs one command against every inventory host in order and collects one
//! result per host. Failure isolation is the central invariant: a host
//! that is unreachable or exits nonzero is recorded and skipped past, and
//! dispatch never terminates early or reorders results.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::inventory::HostRecord;
use crate::ssh::{CommandExecutor, ExecOutcome};

/// Per-host outcome of one dispatch, in inventory order.
#[derive(Debug, Clone)]
pub struct HostResult {
    pub host: HostRecord,
    pub outcome: ExecOutcome,
}

/// Aggregate counts across one dispatch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl DispatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Run `command` on every host, in order, one result per host.
///
/// An empty host list yields an empty result list. The command string is
/// forwarded untouched; the remote shell decides what an empty command
/// means.
pub fn run_on_all<E: CommandExecutor>(
    executor: &E,
    hosts: &[HostRecord],
    command: &str,
) -> Vec<HostResult> {
    let pb = ProgressBar::new(hosts.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("  {bar:24.cyan} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut results = Vec::with_capacity(hosts.len());
    for host in hosts {
        pb.set_message(host.target());
        // Remote output streams straight to the terminal, so park the bar
        // while the session runs.
        let outcome = pb.suspend(|| executor.execute(host, command));
        match &outcome {
            ExecOutcome::Success => log::info!("{}: ok", host.target()),
            ExecOutcome::Failure(reason) => log::info!("{}: {reason}", host.target()),
        }
        results.push(HostResult {
            host: host.clone(),
            outcome,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    results
}

/// Count successes and failures across a result list.
pub fn summarize(results: &[HostResult]) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    for result in results {
        if result.outcome.is_success() {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
    }
    summary
}

/// Print the per-host report and a closing summary line.
pub fn report(results: &[HostResult]) {
    println!();
    for result in results {
        match &result.outcome {
            ExecOutcome::Success => {
                println!("  {} {}", "✓".green(), result.host.target());
            }
            ExecOutcome::Failure(reason) => {
                println!("  {} {}: {reason}", "✗".red(), result.host.target());
            }
        }
    }

    let summary = summarize(results);
    println!();
    if summary.is_success() {
        println!(
            "  {} All {} hosts succeeded",
            "✓".green().bold(),
            summary.total()
        );
    } else {
        println!(
            "  {} {} of {} hosts failed",
            "⚠".yellow().bold(),
            summary.failed,
            summary.total()
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
