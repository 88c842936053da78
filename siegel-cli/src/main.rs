//! Siegel CLI: run the weekly signal and manage its config and state.
//!
//! Commands:
//! - `run`: evaluate the latest week, update state, print the JSON report
//! - `init-config`: write a commented configuration template
//! - `state`: show the stored state from the previous run

mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use siegel_runner::{run_with_options, JsonStateStore, RunOptions, RunnerConfig};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "siegel",
    version,
    about = "Siegel: weekly composite trend signal with change notification"
)]
struct Cli {
    /// Emit logs as JSON lines (stderr).
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the latest week and print the run report as JSON.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Override the price CSV from the config.
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Override the state file from the config.
        #[arg(long)]
        state: Option<PathBuf>,

        /// Do not write the new state (dry run).
        #[arg(long, default_value_t = false)]
        no_save: bool,

        /// Skip backtest statistics.
        #[arg(long, default_value_t = false)]
        no_stats: bool,
    },
    /// Write a configuration template with every default spelled out.
    InitConfig {
        /// Destination path.
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the stored state of the previous run.
    State {
        /// Path to the state JSON file.
        #[arg(long)]
        state: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json);

    match cli.command {
        Commands::Run {
            config,
            prices,
            state,
            no_save,
            no_stats,
        } => run_cmd(config, prices, state, no_save, no_stats),
        Commands::InitConfig { path, force } => {
            RunnerConfig::write_template(&path, force)
                .with_context(|| format!("writing template to {}", path.display()))?;
            info!(path = %path.display(), "config template written");
            Ok(())
        }
        Commands::State { state } => show_state(state),
    }
}

fn run_cmd(
    config_path: PathBuf,
    prices: Option<PathBuf>,
    state: Option<PathBuf>,
    no_save: bool,
    no_stats: bool,
) -> Result<()> {
    let mut config = RunnerConfig::from_file(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    if let Some(p) = prices {
        config.run.prices_path = p;
    }
    if let Some(s) = state {
        config.run.state_path = s;
    }

    let opts = RunOptions {
        save_state: !no_save,
        with_stats: !no_stats,
    };
    let report = run_with_options(&config, &opts)?;
    info!("{}", report.summary());

    // Data errors are reported through the JSON (notify = true), not the exit code.
    println!("{}", report.to_json_pretty()?);
    Ok(())
}

fn show_state(path: PathBuf) -> Result<()> {
    let store = JsonStateStore::new(path);
    match store.load()? {
        Some(state) => println!("{}", serde_json::to_string_pretty(&state)?),
        None => println!("null"),
    }
    Ok(())
}
