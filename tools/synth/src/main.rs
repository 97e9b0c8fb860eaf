//! Synthetic elevation grid generator for exercising the drainage pipeline
//! without real DEM data: ramps, cones, and perched plateaus, with optional
//! integer jitter, written in the ElevationGrid JSON exchange format.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use basin_core::ElevationGrid;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Pattern {
    /// Strictly decreasing diagonal ramp toward the high-x, high-y corner.
    Ramp,
    /// Peak in the centre sloping away on all sides.
    Cone,
    /// Flat top above a below-sea ring.
    Plateau,
}

#[derive(Parser, Debug)]
#[command(
    name = "synth",
    about = "Generate synthetic ElevationGrid JSON test surfaces"
)]
struct Args {
    #[arg(long, value_enum, default_value = "cone")]
    pattern: Pattern,

    #[arg(long, default_value_t = 64)]
    width: usize,

    #[arg(long, default_value_t = 64)]
    height: usize,

    /// Uniform integer jitter amplitude in metres (0 = none).
    #[arg(long, default_value_t = 0)]
    jitter: i16,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(short, long, default_value = "elevation.json")]
    output: PathBuf,
}

fn build(args: &Args) -> ElevationGrid {
    let (w, h) = (args.width, args.height);
    let mut grid = ElevationGrid::new(w, h, 0);
    for y in 0..h {
        for x in 0..w {
            let v = match args.pattern {
                Pattern::Ramp => 2000 - 10 * (x + y) as i16,
                Pattern::Cone => {
                    let dist = (w / 2).abs_diff(x).max((h / 2).abs_diff(y)) as i16;
                    2000 - dist * 30
                }
                Pattern::Plateau => {
                    let edge = x.min(y).min(w - 1 - x).min(h - 1 - y);
                    if edge >= 2 {
                        500
                    } else {
                        -100
                    }
                }
            };
            grid.set(x, y, v);
        }
    }
    if args.jitter > 0 {
        let mut rng = StdRng::seed_from_u64(args.seed);
        for v in &mut grid.data {
            *v += rng.gen_range(-args.jitter..=args.jitter);
        }
    }
    grid
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.width < 3 || args.height < 3 {
        anyhow::bail!("grid must be at least 3x3, got {}x{}", args.width, args.height);
    }

    let grid = build(&args);
    let json = serde_json::to_string(&grid).context("serializing ElevationGrid")?;
    fs::write(&args.output, json)
        .with_context(|| format!("writing {}", args.output.display()))?;
    eprintln!(
        "Wrote {:?} {}x{} grid to {}",
        args.pattern,
        args.width,
        args.height,
        args.output.display()
    );
    Ok(())
}
