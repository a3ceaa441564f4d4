//! Cubed-sphere horizontal grid generator.
//!
//! Builds the gnomonic cubed-sphere supergrid described by command-line
//! flags and/or a YAML file and prints a summary of every tile and nest.

use anyhow::{Context, Result};
use clap::Parser;
use cubed_sphere::{GlobalRefinementBuilder, GridBuilder, MultiNestBuilder};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use make_hgrid::cli::Args;
use make_hgrid::config_loader::{load_hgrid_file, resolve};
use make_hgrid::summary::summarize;

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, &args.log_format)?;

    let file = args.config.as_deref().map(load_hgrid_file).transpose()?;
    let run = resolve(file, &args.overrides())?;

    let builder: &dyn GridBuilder = if run.legacy_gr {
        &GlobalRefinementBuilder
    } else {
        &MultiNestBuilder
    };
    info!(
        builder = builder.name(),
        grid_type = %run.grid.grid_type,
        nlon = run.grid.nlon[0],
        nests = run.grid.nests.len(),
        stretched = run.grid.stretch.is_some(),
        "Generating cubic grid"
    );

    let grid = builder
        .build(&run.grid)
        .with_context(|| format!("{} grid generation failed", builder.name()))?;
    info!(entities = grid.entity_count(), "Grid generation complete");

    let summary = summarize(&grid, builder.name());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.to_text());
    }
    Ok(())
}

fn init_tracing(log_level: &str, log_format: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if log_format.eq_ignore_ascii_case("pretty") {
        tracing::subscriber::set_global_default(builder.finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    }
    Ok(())
}
