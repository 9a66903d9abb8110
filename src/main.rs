use std::{error::Error, path::PathBuf};

use clap::Parser;
use helio::{
    config::HelioConfig,
    data::dataset::Dataset,
    logging::setup_tracing,
    model::pls::{evaluate, fit},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Prepare half-hourly solar production data as fixed-length sequences")]
struct Args {
    /// Path to the YAML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Ignore any cached preparation and rebuild from the CSV
    #[clap(long, default_value = "false")]
    no_cache: Option<bool>,
    /// Fit and evaluate the PLS baseline on the prepared sets
    #[clap(short, long, default_value = "true")]
    baseline: Option<bool>,
    /// Number of PLS components for the baseline
    #[clap(long, default_value = "3")]
    components: usize,
    /// Directory for log files
    #[clap(long)]
    log_dir: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (_non_blocking, _guard) = setup_tracing(args.log_dir.as_deref())?;

    let mut config = HelioConfig::read_config(args.config.as_ref())?;
    if args.no_cache.unwrap_or(false) {
        config.cache_enabled = false;
    }

    let dataset = Dataset::prepare(&config)?;
    info!(
        "Trainer handoff configuration:\n{}",
        serde_yaml::to_string(&config.trainer)?
    );

    if args.baseline.unwrap_or(true) {
        info!(
            components = args.components,
            "Fitting PLS baseline on training split"
        );
        let pls = fit(&dataset.train, args.components)?;
        for (name, set) in [
            ("train", &dataset.train),
            ("validation", &dataset.validation),
            ("test", &dataset.test),
        ] {
            let eval = evaluate(&pls, set, &dataset.reference)?;
            info!("Baseline on {}: {}", name, eval);
        }
    }

    Ok(())
}
