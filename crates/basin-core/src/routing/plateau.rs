//! Flood-fill resolution of tied-direction (plateau) regions.
//!
//! A walk that lands on a plateau code cannot pick a single downstream cell,
//! so the whole 8-connected flat region is claimed for the walk's basin in one
//! sweep. The fill runs on an explicit stack: contiguous flats can span a
//! large share of the raster, far beyond what call-stack recursion tolerates.

use super::direction::{DirectionGrid, FlowDirection, D8_OFFSETS};

/// Label every 8-connected plateau cell reachable from `start` with `id`.
///
/// Cells with a determined direction (single-bit, sea, sink, border) bound the
/// spread and are never labeled. Meeting a plateau cell that already belongs
/// to a *different* basin is a conflict: the spread stops, everything flooded
/// so far is handed over to that basin, and its id is returned so the caller
/// can reconcile the walk that got here. Otherwise returns `id`.
pub fn flood_region(
    directions: &DirectionGrid,
    basins: &mut [u8],
    start: usize,
    id: u8,
) -> u8 {
    let width = directions.width;
    let height = directions.height;
    let mut stack = vec![start];
    let mut flooded: Vec<usize> = Vec::new();

    while let Some(i) = stack.pop() {
        if !matches!(directions.at(i), FlowDirection::Plateau(_)) {
            continue;
        }
        match basins[i] {
            0 => {}
            b if b == id => continue,
            b => {
                for &j in &flooded {
                    basins[j] = b;
                }
                return b;
            }
        }
        basins[i] = id;
        flooded.push(i);

        let x = i % width;
        let y = i / width;
        for &(dx, dy) in &D8_OFFSETS {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                continue;
            }
            stack.push(nx as usize + ny as usize * width);
        }
    }

    id
}
