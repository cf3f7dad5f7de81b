mod cli;
mod commands;
mod config;
mod dispatch;
mod error;
mod inventory;
mod ssh;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, HostsCommand};
use config::FlotillaConfig;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let config = FlotillaConfig::load()?;

    match cli.command {
        None => commands::menu::run(&ctx, &config),
        Some(Command::Run(args)) => commands::run::run(&ctx, &config, args),
        Some(Command::Hosts(cmd)) => match cmd {
            HostsCommand::Add {
                hostname,
                username,
                password,
            } => commands::hosts::add(&ctx, &config, &hostname, &username, password),
            HostsCommand::Rm { position } => commands::hosts::rm(&ctx, &config, position),
            HostsCommand::List => commands::hosts::list(&ctx, &config),
        },
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "flotilla", &mut io::stdout());
            Ok(())
        }
    }
}
