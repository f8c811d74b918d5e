//! Lava scattering over walls that border open floor.

use crate::types::{Pos, TileKind};

use super::super::grid::TileGrid;
use super::super::random::RandomSource;

/// Interior walls with at least one orthogonal floor neighbor.
pub(super) fn hazard_candidates(grid: &TileGrid) -> Vec<Pos> {
    grid.positions()
        .filter(|&pos| !grid.is_border(pos) && grid.tile_at(pos) == TileKind::Wall)
        .filter(|pos| {
            pos.orthogonal_neighbors().into_iter().any(|next| grid.tile_at(next) == TileKind::Floor)
        })
        .collect()
}

/// Turns `fraction` of the candidate walls (rounded down) into hazards and
/// returns the tiles it changed. Walls only, so floor is never removed.
pub(super) fn scatter_hazards(
    grid: &mut TileGrid,
    fraction: f64,
    rng: &mut RandomSource,
) -> Vec<Pos> {
    let mut candidates = hazard_candidates(grid);
    rng.shuffle(&mut candidates);
    let count = ((candidates.len() as f64) * fraction).floor() as usize;
    candidates.truncate(count.min(candidates.len()));
    for &pos in &candidates {
        grid.set_interior(pos, TileKind::Hazard);
    }
    candidates
}
