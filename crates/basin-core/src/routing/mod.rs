//! Drainage derivation pipeline: flow directions → watershed labeling →
//! optional flow accumulation.

pub mod accumulation;
pub mod direction;
pub mod outlet;
pub mod plateau;
pub mod watershed;

use serde::{Deserialize, Serialize};

use crate::error::{DrainageError, QualityWarning};
use crate::grid::ElevationGrid;

use accumulation::{accumulate_flow, AccumulationGrid};
use direction::{compute_flow_directions, DirectionGrid};
use watershed::{label_basins, BasinGrid};

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrainageConfig {
    /// Cells strictly below this elevation are sea. Metres.
    pub sea_level: i16,
    /// Run the optional flow-accumulation pass.
    pub accumulation: bool,
}

impl Default for DrainageConfig {
    fn default() -> Self {
        Self {
            sea_level: 0,
            accumulation: false,
        }
    }
}

/// Everything one pipeline run derives from an elevation grid.
#[derive(Debug)]
pub struct DrainageResult {
    pub directions: DirectionGrid,
    pub basins: BasinGrid,
    pub accumulation: Option<AccumulationGrid>,
    /// Data-quality findings from the labeling and accumulation passes.
    pub warnings: Vec<QualityWarning>,
}

/// Run the full pipeline on `grid`.
///
/// Fails fast when the grid has no interior cells; everything after that is
/// total, with path-quality problems surfaced as warnings in the result.
pub fn derive_drainage(
    grid: &ElevationGrid,
    config: &DrainageConfig,
) -> Result<DrainageResult, DrainageError> {
    if grid.width < 3 || grid.height < 3 {
        return Err(DrainageError::GridTooSmall {
            width: grid.width,
            height: grid.height,
        });
    }

    let directions = compute_flow_directions(grid, config.sea_level);
    let (basins, mut warnings) = label_basins(&directions);

    let accumulation = if config.accumulation {
        let (acc, acc_warnings) = accumulate_flow(&directions);
        warnings.extend(acc_warnings);
        Some(acc)
    } else {
        None
    };

    Ok(DrainageResult {
        directions,
        basins,
        accumulation,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use direction::FlowDirection;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Cone sloping away from a peak, with integer jitter small enough to
    /// keep the surface single-peaked at the chosen scale.
    fn make_jittered_cone(n: usize, seed: u64) -> ElevationGrid {
        let mut rng = StdRng::seed_from_u64(seed);
        let peak = (n / 2, n / 2);
        let mut grid = ElevationGrid::new(n, n, 0);
        for y in 0..n {
            for x in 0..n {
                let dist = peak.0.abs_diff(x).max(peak.1.abs_diff(y)) as i16;
                grid.set(x, y, 2000 - dist * 40 + rng.gen_range(-3..=3));
            }
        }
        grid
    }

    #[test]
    fn rejects_grids_without_interior() {
        let grid = ElevationGrid::new(2, 5, 0);
        let err = derive_drainage(&grid, &DrainageConfig::default()).unwrap_err();
        assert_eq!(err, DrainageError::GridTooSmall { width: 2, height: 5 });
    }

    #[test]
    fn pipeline_is_idempotent() {
        let grid = make_jittered_cone(24, 7);
        let config = DrainageConfig {
            sea_level: 0,
            accumulation: true,
        };
        let a = derive_drainage(&grid, &config).unwrap();
        let b = derive_drainage(&grid, &config).unwrap();
        assert_eq!(a.directions, b.directions);
        assert_eq!(a.basins, b.basins);
        assert_eq!(a.accumulation.unwrap(), b.accumulation.unwrap());
    }

    #[test]
    fn every_chain_terminates_within_the_cell_count() {
        for seed in [1u64, 2, 3] {
            let n = 32;
            let grid = make_jittered_cone(n, seed);
            let result = derive_drainage(&grid, &DrainageConfig::default()).unwrap();
            for y in 1..n - 1 {
                for x in 1..n - 1 {
                    let mut i = x + y * n;
                    let mut steps = 0;
                    while let FlowDirection::Single(bit) = result.directions.at(i) {
                        i = result.directions.step(i, bit).expect("step stays in grid");
                        steps += 1;
                        assert!(
                            steps <= n * n,
                            "chain from ({x}, {y}) exceeded {} steps (seed {seed})",
                            n * n
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn flat_interior_floods_to_one_basin() {
        // 7x7: a flat 5x5 interior at +50 over a strictly lower outer ring.
        let n = 7;
        let mut grid = ElevationGrid::new(n, n, -10);
        for y in 1..n - 1 {
            for x in 1..n - 1 {
                grid.set(x, y, 50);
            }
        }
        let result = derive_drainage(&grid, &DrainageConfig::default()).unwrap();
        let first = result.basins.get(1, 1);
        assert_ne!(first, 0);
        for y in 1..n - 1 {
            for x in 1..n - 1 {
                assert!(
                    matches!(result.directions.get(x, y), FlowDirection::Plateau(_)),
                    "flat cell ({x}, {y}) should hold a tied code"
                );
                assert_eq!(result.basins.get(x, y), first, "flat cell ({x}, {y})");
            }
        }
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn corner_ramp_labels_one_basin() {
        // 100 - 25*max(x, y): every interior cell ties toward the low corner,
        // so the first walk floods the whole interior in one go.
        let n = 5;
        let mut grid = ElevationGrid::new(n, n, 0);
        for y in 0..n {
            for x in 0..n {
                grid.set(x, y, 100 - 25 * x.max(y) as i16);
            }
        }
        let result = derive_drainage(&grid, &DrainageConfig::default()).unwrap();
        for y in 1..n - 1 {
            for x in 1..n - 1 {
                assert_eq!(result.basins.get(x, y), 1, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn sea_cells_never_join_a_basin() {
        // A below-sea pocket surrounded by land that drains into it.
        let n = 5;
        let mut grid = ElevationGrid::new(n, n, 100);
        grid.set(2, 2, -50);
        let result = derive_drainage(&grid, &DrainageConfig::default()).unwrap();
        assert_eq!(result.directions.get(2, 2), FlowDirection::Sea);
        assert_eq!(result.basins.get(2, 2), 0);
        // Its neighbours do get labeled.
        assert_ne!(result.basins.get(1, 1), 0);
    }

    #[test]
    fn accumulation_pass_is_opt_in() {
        let grid = make_jittered_cone(16, 11);
        let without = derive_drainage(&grid, &DrainageConfig::default()).unwrap();
        assert!(without.accumulation.is_none());
        let with = derive_drainage(
            &grid,
            &DrainageConfig {
                sea_level: 0,
                accumulation: true,
            },
        )
        .unwrap();
        assert!(with.accumulation.is_some());
    }
}
