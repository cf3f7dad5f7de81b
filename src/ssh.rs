//! Remote command execution over SSH
//!
//! Authentication is password-based, driven through `sshpass` so the
//! operator is never prompted mid-dispatch. Host keys are accepted on
//! first use (`StrictHostKeyChecking=no`); do not point this tool at hosts
//! that need stronger verification.
//!
//! Every failure mode is folded into the returned [`ExecOutcome`]. One
//! host being unreachable or rejecting its password must never abort the
//! caller's sweep over the rest of the fleet, so `execute` has an
//! infallible signature.

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::inventory::HostRecord;

const WAIT_POLL: Duration = Duration::from_millis(50);

/// ssh reserves 255 for its own failures (unreachable network, rejected
/// auth, bad config); every other status belongs to the remote command.
const SSH_CLIENT_FAILURE: i32 = 255;

/// Tunables for one execution attempt.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Session-establish bound, passed to ssh as ConnectTimeout.
    pub connect_timeout: Duration,
    /// Overall per-host deadline; `None` leaves the command unbounded.
    pub command_timeout: Option<Duration>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            command_timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Why a host did not come back clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The remote command ran and exited nonzero.
    NonZeroExit(i32),
    /// No session: unreachable, auth rejected, connect timeout, or the
    /// ssh client could not be launched at all.
    Connection(String),
    /// Session outlived the per-host deadline; the child was killed.
    TimedOut(Duration),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonZeroExit(code) => write!(f, "exited with status {code}"),
            Self::Connection(detail) => write!(f, "connection failed: {detail}"),
            Self::TimedOut(limit) => write!(f, "timed out after {}s", limit.as_secs()),
        }
    }
}

/// Outcome of one command on one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    Success,
    Failure(FailureReason),
}

impl ExecOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// The seam the dispatcher works through. Implementations report every
/// failure in the returned outcome rather than propagating an error.
pub trait CommandExecutor {
    fn execute(&self, host: &HostRecord, command: &str) -> ExecOutcome;
}

/// Executes commands through the system ssh client via sshpass.
#[derive(Debug, Default)]
pub struct SshExecutor {
    opts: ExecOptions,
}

impl SshExecutor {
    pub fn new(opts: ExecOptions) -> Self {
        Self { opts }
    }
}

impl CommandExecutor for SshExecutor {
    fn execute(&self, host: &HostRecord, command: &str) -> ExecOutcome {
        log::debug!("dispatching to {}: {command:?}", host.target());

        let mut cmd = Command::new("sshpass");
        cmd.arg("-p")
            .arg(&host.password)
            .arg("ssh")
            .args(ssh_args(host, command, &self.opts))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ExecOutcome::Failure(FailureReason::Connection(format!(
                    "failed to launch sshpass: {e}"
                )));
            }
        };

        // Tee stderr to the operator's terminal while keeping the last
        // line for the failure detail.
        let stderr_tail = child.stderr.take().map(|pipe| {
            thread::spawn(move || {
                let mut tail = String::new();
                for line in BufReader::new(pipe).lines() {
                    let Ok(line) = line else { break };
                    eprintln!("{line}");
                    if !line.trim().is_empty() {
                        tail = line;
                    }
                }
                tail
            })
        });

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if let Some(limit) = self.opts.command_timeout
                        && started.elapsed() >= limit
                    {
                        let _ = child.kill();
                        let _ = child.wait();
                        if let Some(handle) = stderr_tail {
                            let _ = handle.join();
                        }
                        return ExecOutcome::Failure(FailureReason::TimedOut(limit));
                    }
                    thread::sleep(WAIT_POLL);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return ExecOutcome::Failure(FailureReason::Connection(format!(
                        "failed to wait for ssh: {e}"
                    )));
                }
            }
        };

        let detail = stderr_tail
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        classify(status.code(), &detail)
    }
}

/// Arguments for the ssh client, target and command last.
fn ssh_args(host: &HostRecord, command: &str, opts: &ExecOptions) -> Vec<String> {
    vec![
        "-o".into(),
        "StrictHostKeyChecking=no".into(),
        // A rejected password must surface as the client's own failure
        // status instead of hanging on a second prompt.
        "-o".into(),
        "NumberOfPasswordPrompts=1".into(),
        "-o".into(),
        format!("ConnectTimeout={}", opts.connect_timeout.as_secs()),
        "-T".into(),
        host.target(),
        command.into(),
    ]
}

fn classify(code: Option<i32>, stderr_tail: &str) -> ExecOutcome {
    match code {
        Some(0) => ExecOutcome::Success,
        Some(SSH_CLIENT_FAILURE) => {
            let detail = if stderr_tail.is_empty() {
                "session could not be established".to_string()
            } else {
                stderr_tail.to_string()
            };
            ExecOutcome::Failure(FailureReason::Connection(detail))
        }
        Some(code) => ExecOutcome::Failure(FailureReason::NonZeroExit(code)),
        None => ExecOutcome::Failure(FailureReason::Connection(
            "ssh terminated by signal".to_string(),
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================
