use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conferre::manager::Manager;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// Simulation directory containing `config.toml`.
    #[arg(long)]
    sim_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sweep the proportion of unconditional cooperators and record the
    /// proportion of successful groups per setting.
    Sweep,

    /// Run a single simulation and record its per-round contribution trace.
    Trace,

    /// Remove all run directories.
    Clean,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.sim_dir).context("failed to construct mgr")?;

    match args.command {
        Command::Sweep => mgr.run_sweep()?,
        Command::Trace => mgr.run_trace()?,
        Command::Clean => mgr.clean_sim()?,
    }

    Ok(())
}
