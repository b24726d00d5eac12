use anyhow::Result;
use clap::Parser;
use merit_cli::cli::{Cli, Commands};
use merit_cli::config::MeritConfig;
use merit_cli::logging;
use tracing::debug;

mod commands;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = MeritConfig::load(cli.config.as_deref())?;
    let level = match cli.log_level {
        Some(level) => level,
        None => config.log_level()?,
    };
    logging::init(level, config.logging.file.as_deref())?;
    debug!(config = ?cli.config, "configuration loaded");

    match cli.command {
        Commands::Plan {
            payload,
            format,
            floor_policy,
            order,
        } => {
            let mut planner = config.planner()?;
            if let Some(policy) = floor_policy {
                planner = planner.with_floor_policy(policy);
            }
            if let Some(order) = order {
                planner = planner.with_output_order(order);
            }
            commands::plan::handle(&planner, &payload, format)
        }
        Commands::Serve { addr } => {
            let addr = match addr {
                Some(addr) => addr,
                None => config.server_addr()?,
            };
            commands::serve::handle(config.planner()?, addr)
        }
        Commands::Completions { shell, out } => commands::completions::handle(shell, out.as_deref()),
    }
}
