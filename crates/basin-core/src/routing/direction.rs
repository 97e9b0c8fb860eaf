//! Per-cell steepest-descent flow direction with tie accumulation.
//!
//! Each interior cell gets one [`FlowDirection`]: sea below the configured
//! threshold, a single D8 bit toward its unique lowest neighbour, an ORed bit
//! set when several neighbours tie for lowest (a plateau code), or a sink when
//! every neighbour is strictly higher. Ties against the cell's own elevation
//! count: a neighbour at equal height contributes its bit, so flat ground
//! produces plateau codes rather than sinks.

use crate::grid::ElevationGrid;

#[cfg(feature = "threading")]
use rayon::prelude::*;

/// D8 neighbour offsets `(dx, dy)` in bit order E, NE, N, NW, W, SW, S, SE.
/// North is negative y, matching the row-major layout.
pub const D8_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Direction bit for each entry of [`D8_OFFSETS`].
pub const D8_BITS: [u8; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

/// Flow state of one cell.
///
/// The legacy byte encoding collapsed `Sea`, `Sink`, and uncomputed border
/// cells into code 0; the enum keeps them apart so callers can tell a true
/// drainage endpoint from an unresolved local minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    /// Below the sea-level threshold; a drainage endpoint.
    Sea,
    /// Interior local minimum with no lower or equal neighbour; flow cannot
    /// leave it under steepest-descent routing.
    Sink,
    /// Exactly one lowest neighbour, identified by its [`D8_BITS`] bit.
    Single(u8),
    /// Two or more tied lowest neighbours, bits ORed.
    Plateau(u8),
    /// Border cell; never computed.
    Undefined,
}

impl FlowDirection {
    fn from_bits(bits: u8) -> Self {
        match bits.count_ones() {
            0 => FlowDirection::Sink,
            1 => FlowDirection::Single(bits),
            _ => FlowDirection::Plateau(bits),
        }
    }

    /// Legacy byte code: direction bits, with all terminal states as 0.
    pub fn code(&self) -> u8 {
        match *self {
            FlowDirection::Single(bits) | FlowDirection::Plateau(bits) => bits,
            _ => 0,
        }
    }

    /// True for cells a flow walk stops at: sea, sinks, and the border.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowDirection::Sea | FlowDirection::Sink | FlowDirection::Undefined
        )
    }
}

/// One [`FlowDirection`] per cell, same layout as the source grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionGrid {
    pub cells: Vec<FlowDirection>,
    pub width: usize,
    pub height: usize,
}

impl DirectionGrid {
    #[inline]
    pub fn at(&self, index: usize) -> FlowDirection {
        self.cells[index]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> FlowDirection {
        self.cells[x + y * self.width]
    }

    /// Index of the neighbour one step along `bit` from `index`, or None when
    /// the step would leave the raster.
    pub fn step(&self, index: usize, bit: u8) -> Option<usize> {
        let k = bit.trailing_zeros() as usize;
        let (dx, dy) = D8_OFFSETS[k];
        let x = (index % self.width) as isize + dx;
        let y = (index / self.width) as isize + dy;
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return None;
        }
        Some(x as usize + y as usize * self.width)
    }

    /// Export the legacy byte grid for the raster-I/O collaborator.
    pub fn codes(&self) -> Vec<u8> {
        self.cells.iter().map(|d| d.code()).collect()
    }
}

/// Compute one flow direction per interior cell.
///
/// Cells strictly below `sea_level` are [`FlowDirection::Sea`]. Border cells
/// stay [`FlowDirection::Undefined`]. The per-cell reduction is independent of
/// every other cell; with the `threading` feature rows are computed in
/// parallel.
pub fn compute_flow_directions(grid: &ElevationGrid, sea_level: i16) -> DirectionGrid {
    let mut cells = vec![FlowDirection::Undefined; grid.width * grid.height];

    #[cfg(feature = "threading")]
    cells
        .par_chunks_mut(grid.width)
        .enumerate()
        .for_each(|(y, row)| fill_row(grid, y, row, sea_level));

    #[cfg(not(feature = "threading"))]
    cells
        .chunks_mut(grid.width)
        .enumerate()
        .for_each(|(y, row)| fill_row(grid, y, row, sea_level));

    DirectionGrid {
        cells,
        width: grid.width,
        height: grid.height,
    }
}

fn fill_row(grid: &ElevationGrid, y: usize, row: &mut [FlowDirection], sea_level: i16) {
    if y == 0 || y + 1 == grid.height {
        return;
    }
    for x in 1..grid.width - 1 {
        row[x] = cell_direction(grid, x, y, sea_level);
    }
}

/// Steepest-descent reduction over the 8-neighbourhood of one interior cell.
///
/// `min` starts at the cell's own elevation: a strictly lower neighbour
/// replaces the accumulated bits with its own, an equal-to-minimum neighbour
/// ORs its bit in. No bits at the end means every neighbour is strictly
/// higher: a single-cell sink, left unresolved here.
fn cell_direction(grid: &ElevationGrid, x: usize, y: usize, sea_level: i16) -> FlowDirection {
    let own = grid.get(x, y);
    if own < sea_level {
        return FlowDirection::Sea;
    }

    let mut min = own;
    let mut bits = 0u8;
    for (k, &(dx, dy)) in D8_OFFSETS.iter().enumerate() {
        let v = grid.get((x as isize + dx) as usize, (y as isize + dy) as usize);
        if v < min {
            min = v;
            bits = D8_BITS[k];
        } else if v == min {
            bits |= D8_BITS[k];
        }
    }
    FlowDirection::from_bits(bits)
}
