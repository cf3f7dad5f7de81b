use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "flotilla")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Dispatch shell commands across your SSH fleet", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Without a subcommand, flotilla opens the interactive menu
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a shell command on every host in the inventory
    Run(RunArgs),

    /// Manage the host inventory
    #[command(subcommand)]
    Hosts(HostsCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct RunArgs {
    /// Command to execute on each host
    pub command: String,

    /// Per-host deadline in seconds (0 disables the bound)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// SSH connect timeout in seconds
    #[arg(long)]
    pub connect_timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum HostsCommand {
    /// Append a host to the inventory
    Add {
        hostname: String,
        username: String,

        /// Password credential; prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Remove the host at a 1-based position
    Rm {
        /// Position as shown by 'flotilla hosts list'
        position: usize,
    },

    /// List inventory entries
    List,
}
