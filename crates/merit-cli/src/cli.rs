use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use merit_algo::{FloorPolicy, OutputOrder};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "merit", author, version, about = "Merit-order production planning", long_about = None)]
pub struct Cli {
    /// Set the logging level (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute a production plan for a payload file
    Plan {
        /// Path to the request payload (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        payload: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = PlanFormat::Json)]
        format: PlanFormat,
        /// Floor handling: aggregate or strict
        #[arg(long)]
        floor_policy: Option<FloorPolicy>,
        /// Entry order: input or merit
        #[arg(long)]
        order: Option<OutputOrder>,
    },
    /// Serve production plans over HTTP
    Serve {
        /// Address to bind (defaults to the config file value)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanFormat {
    Json,
    Table,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
