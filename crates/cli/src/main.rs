mod export;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use tracing::info;
use watchface_core::{LayoutRegistry, TimeAnchor, catalog, find_scenario};

/// Used when `RUST_LOG` is unset. The binary's tracing target is its crate
/// name, not the package name.
const DEFAULT_LOG: &str = concat!("warn,", module_path!(), "=info");

#[derive(Parser, Debug)]
#[command(
    name = "watchface-scenarios",
    about = "Build watchface screenshot scenarios and export them for the test harness"
)]
struct Args {
    /// Constants table to use instead of the built-in one
    #[arg(long, global = true, env = "WATCHFACE_CONSTANTS")]
    constants: Option<PathBuf>,

    /// Anchor instant (RFC 3339). Defaults to the local wall clock.
    #[arg(long, global = true)]
    now: Option<DateTime<FixedOffset>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every scenario with its enabled flag and description
    List,
    /// Print one scenario as JSON
    Show { name: String },
    /// Write one JSON file per scenario plus index.json
    Export {
        dir: PathBuf,
        /// Also export scenarios the harness skips
        #[arg(long)]
        include_disabled: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let loaded;
    let registry = match &args.constants {
        Some(path) => {
            info!("Constants: {}", path.display());
            loaded = LayoutRegistry::from_path(path)
                .with_context(|| format!("loading constants from {}", path.display()))?;
            &loaded
        }
        None => LayoutRegistry::builtin().context("loading built-in constants")?,
    };

    let anchor = match args.now {
        Some(now) => TimeAnchor::at(now),
        None => TimeAnchor::local_now(),
    };

    let mut out = std::io::stdout().lock();
    match args.command {
        Command::List => {
            for s in catalog(&anchor, registry)? {
                let flag = if s.enabled { "enabled" } else { "disabled" };
                writeln!(out, "{}\t{flag}\t{}", s.name, s.doc)?;
            }
        }
        Command::Show { name } => {
            let scenario = find_scenario(&anchor, registry, &name)?;
            serde_json::to_writer_pretty(&mut out, &scenario.to_json()?)?;
            writeln!(out)?;
        }
        Command::Export {
            dir,
            include_disabled,
        } => {
            let scenarios = catalog(&anchor, registry)?;
            let written = export::write_all(&dir, &anchor, &scenarios, include_disabled)?;
            info!("Wrote {written} scenarios to {}", dir.display());
        }
    }
    Ok(())
}
