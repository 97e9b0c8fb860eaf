//! Path-following watershed labeling with merge and backtrack.
//!
//! Each unlabeled interior cell with a followable direction opens a new basin
//! and walks downstream, provisionally labeling every cell it visits. A walk
//! that runs into an already-labeled cell merges into that basin instead: the
//! fresh id is returned to the counter and the recorded trail is relabeled.
//! Plateau codes hand the walk over to the flood-fill resolver.

use crate::error::QualityWarning;

use super::direction::{DirectionGrid, FlowDirection, D8_OFFSETS};
use super::plateau::flood_region;

/// Highest basin id. The counter wraps back to 1 past this, so more than 254
/// concurrently unmerged basins can alias; an accepted precision limit.
pub const MAX_BASIN_ID: u8 = 254;

/// One basin id per cell, same layout as the source grid. 0 = unassigned;
/// sea cells, sinks, and the border always stay 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasinGrid {
    pub cells: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl BasinGrid {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[x + y * self.width]
    }

    /// Cells of `basin` adjacent to at least one cell outside it (or to the
    /// raster edge). Input for an [`super::outlet::OutletSearch`].
    pub fn boundary_cells(&self, basin: u8) -> Vec<usize> {
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let i = x + y * self.width;
                if self.cells[i] != basin {
                    continue;
                }
                let on_edge = D8_OFFSETS.iter().any(|&(dx, dy)| {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= self.width as isize || ny >= self.height as isize
                    {
                        return true;
                    }
                    self.cells[nx as usize + ny as usize * self.width] != basin
                });
                if on_edge {
                    out.push(i);
                }
            }
        }
        out
    }
}

/// Assign a basin id to every interior cell with a followable direction.
///
/// Cells are visited in the fixed x-outer, y-inner raster scan; the scan order
/// decides which id a merged region ends up with but not the partition itself.
/// Walks that drain to the same terminal cell are merged, so each basin ends
/// at exactly one sea cell, sink, or border exit.
pub fn label_basins(directions: &DirectionGrid) -> (BasinGrid, Vec<QualityWarning>) {
    let width = directions.width;
    let height = directions.height;
    let mut basins = vec![0u8; width * height];
    // First basin to reach each terminal cell; later arrivals merge into it
    // without the terminal itself ever being labeled.
    let mut outlet_owner = vec![0u8; width * height];
    let mut warnings = Vec::new();

    let mut counter: u8 = 0;
    let step_bound = width * height;
    let mut trail: Vec<usize> = Vec::new();

    for x in 1..width - 1 {
        for y in 1..height - 1 {
            let start = x + y * width;
            if basins[start] != 0 || directions.at(start).is_terminal() {
                continue;
            }

            let before = counter;
            counter = if counter == MAX_BASIN_ID { 1 } else { counter + 1 };
            let id = counter;
            trail.clear();

            let mut i = start;
            let mut steps = 0usize;
            loop {
                if basins[i] == id {
                    // A walk can bite its own tail when equal-height cells
                    // point at each other.
                    warnings.push(QualityWarning::FlowCycle {
                        x: i % width,
                        y: i / width,
                    });
                    break;
                }
                if basins[i] != 0 {
                    let existing = basins[i];
                    counter = before;
                    relabel(&mut basins, &trail, existing);
                    break;
                }
                match directions.at(i) {
                    FlowDirection::Sea | FlowDirection::Sink | FlowDirection::Undefined => {
                        if outlet_owner[i] == 0 {
                            outlet_owner[i] = id;
                        } else {
                            counter = before;
                            relabel(&mut basins, &trail, outlet_owner[i]);
                        }
                        break;
                    }
                    FlowDirection::Plateau(_) => {
                        trail.push(i);
                        let resolved = flood_region(directions, &mut basins, i, id);
                        if resolved != id {
                            counter = before;
                            relabel(&mut basins, &trail, resolved);
                        }
                        break;
                    }
                    FlowDirection::Single(bit) => {
                        basins[i] = id;
                        trail.push(i);
                        match directions.step(i, bit) {
                            Some(next) => i = next,
                            None => break,
                        }
                    }
                }
                steps += 1;
                if steps > step_bound {
                    warnings.push(QualityWarning::FlowCycle {
                        x: i % width,
                        y: i / width,
                    });
                    break;
                }
            }
        }
    }

    (
        BasinGrid {
            cells: basins,
            width,
            height,
        },
        warnings,
    )
}

fn relabel(basins: &mut [u8], trail: &[usize], id: u8) {
    for &i in trail {
        basins[i] = id;
    }
}
