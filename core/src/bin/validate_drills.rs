//! Validate a drill catalog JSON file.
//!
//! ```bash
//! cargo run --bin validate_drills -- data/drills.json
//! ```
//!
//! A missing file is not an error (the catalog is optional at this stage).
//! `RUST_LOG` controls verbosity (default: info).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, warn};
use serde_json::Value;

use parformance_core::storage::parse_drills;
use parformance_core::validation::validate_drill_value;

#[derive(Parser, Debug)]
#[command(name = "validate_drills", about = "Validate a drills catalog JSON file")]
struct Args {
    /// Path to the drills JSON (array of drills)
    #[arg(default_value = "data/drills.json")]
    path: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !args.path.exists() {
        warn!(
            "⚠️ no drills file at {}, nothing to validate",
            args.path.display()
        );
        return Ok(());
    }

    let raw = std::fs::read_to_string(&args.path)
        .with_context(|| format!("cannot read {}", args.path.display()))?;
    let json: Value = serde_json::from_str(&raw)
        .with_context(|| format!("cannot parse {}", args.path.display()))?;
    let Some(records) = json.as_array() else {
        bail!("root must be an array of drills");
    };

    let issues: Vec<String> = records
        .iter()
        .enumerate()
        .filter_map(|(i, d)| validate_drill_value(d, i).err())
        .collect();
    if !issues.is_empty() {
        for issue in &issues {
            error!(" - {issue}");
        }
        bail!("{} issue(s) found", issues.len());
    }

    let drills = parse_drills(&raw).context("typed load failed")?;
    info!("✅ {} drill(s) valid", drills.len());
    Ok(())
}
