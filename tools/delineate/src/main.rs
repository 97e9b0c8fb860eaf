//! Drainage delineation runner: reads an ElevationGrid JSON file, runs the
//! flow-routing pipeline, writes the derived grids back out as JSON.
//!
//! Stands in for the raster-I/O collaborator: anything that can produce the
//! ElevationGrid exchange format can feed the engine through this tool.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use basin_core::{derive_drainage, DrainageConfig, ElevationGrid};

#[derive(Parser, Debug)]
#[command(
    name = "delineate",
    about = "Derive flow directions and watershed labels from an elevation grid"
)]
struct Args {
    /// Path to an ElevationGrid JSON file.
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON path for the derived grids.
    #[arg(short, long, default_value = "drainage.json")]
    output: PathBuf,

    /// Sea-level threshold in metres; cells strictly below are sea.
    #[arg(long, default_value_t = 0)]
    sea_level: i16,

    /// Also run the flow-accumulation pass.
    #[arg(long)]
    accumulation: bool,
}

/// Derived grids in the exchange format: legacy byte codes for directions
/// (terminal states collapse to 0), basin ids 0-254, optional counts.
#[derive(Serialize)]
struct DrainageOutput {
    width: usize,
    height: usize,
    directions: Vec<u8>,
    basins: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accumulation: Option<Vec<u32>>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let grid: ElevationGrid = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as ElevationGrid JSON", args.input.display()))?;

    eprintln!(
        "Deriving drainage for {}x{} grid (sea level {} m)",
        grid.width, grid.height, args.sea_level
    );
    let config = DrainageConfig {
        sea_level: args.sea_level,
        accumulation: args.accumulation,
    };
    let result = derive_drainage(&grid, &config)?;

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    let distinct = {
        let mut seen = [false; 256];
        for &b in &result.basins.cells {
            seen[b as usize] = true;
        }
        seen[1..].iter().filter(|&&s| s).count()
    };
    eprintln!("Labeled {distinct} basin id(s), {} warning(s)", result.warnings.len());

    let out = DrainageOutput {
        width: grid.width,
        height: grid.height,
        directions: result.directions.codes(),
        basins: result.basins.cells,
        accumulation: result.accumulation.map(|acc| acc.cells),
    };
    let json = serde_json::to_string(&out).context("serializing drainage output")?;
    fs::write(&args.output, json)
        .with_context(|| format!("writing {}", args.output.display()))?;
    eprintln!("Wrote {}", args.output.display());

    Ok(())
}
