//! One generation attempt: carve, scatter, validate, place.

use crate::types::{Pos, TileKind};

use super::super::config::GenerationConfig;
use super::super::corridors::connect_subtrees;
use super::super::error::AttemptFailure;
use super::super::grid::TileGrid;
use super::super::layout::{Rect, carve_rooms};
use super::super::model::Dungeon;
use super::super::partition::{PartitionTree, SplitRules};
use super::super::random::RandomSource;
use super::super::reachability::analyze;
use super::hazards::scatter_hazards;

pub(super) fn run_attempt(
    config: &GenerationConfig,
    attempt: u32,
    attempt_seed: u64,
) -> Result<Dungeon, AttemptFailure> {
    let mut rng = RandomSource::from_seed(attempt_seed);
    let mut grid = TileGrid::filled(config.width, config.height, TileKind::Wall);

    let bounds = Rect::new(0, 0, config.width, config.height);
    let mut tree = PartitionTree::build(bounds, SplitRules::from(config), &mut rng);
    let mut rooms = carve_rooms(&mut tree, &mut grid, config, &mut rng);
    connect_subtrees(&tree, &mut rooms, &mut grid, &mut rng);

    let hazards = scatter_hazards(&mut grid, config.hazard_fraction, &mut rng);
    log::trace!(
        "attempt {attempt}: {} rooms, {} hazards, {} obstacles",
        rooms.len(),
        hazards.len(),
        grid.count(TileKind::Obstacle)
    );

    let floor = grid.positions_of(TileKind::Floor);
    let start = *rng.pick(&floor).ok_or(AttemptFailure::NoFloor)?;

    if config.cull_unreachable_floor {
        let culled = grid.cull_floor_unreachable_from(start);
        if culled > 0 {
            log::trace!("attempt {attempt}: culled {culled} unreachable floor tiles");
        }
    }

    let reachability = analyze(&grid, start, config.hazard_slide);
    let required = config.min_exit_distance.max(1);
    let candidates = reachability.farthest(required);
    let Some(&exit) = rng.pick(&candidates) else {
        return Err(AttemptFailure::ExitPlacement {
            start,
            farthest: reachability.max_distance().unwrap_or(0),
            required,
        });
    };
    let exit_distance = reachability.distance(exit).unwrap_or(0);
    grid.set(exit, TileKind::Exit);

    let collectible = if rng.chance(config.collectible_chance) {
        place_collectible(&mut grid, config, start, exit, &mut rng)
    } else {
        None
    };

    Ok(Dungeon {
        width: config.width,
        height: config.height,
        tiles: grid.into_tiles(),
        rooms,
        start,
        exit,
        collectible,
        exit_distance,
        attempt,
        attempt_seed,
    })
}

/// Probes random floor tiles for one the start can slide to. Gives up quietly
/// after `collectible_tries` misses.
fn place_collectible(
    grid: &mut TileGrid,
    config: &GenerationConfig,
    start: Pos,
    exit: Pos,
    rng: &mut RandomSource,
) -> Option<Pos> {
    let reachability = analyze(grid, start, config.hazard_slide);
    let floor = grid.positions_of(TileKind::Floor);
    for _ in 0..config.collectible_tries {
        let &candidate = rng.pick(&floor)?;
        if candidate != start && candidate != exit && reachability.contains(candidate) {
            grid.set(candidate, TileKind::Collectible);
            return Some(candidate);
        }
    }
    log::trace!("no collectible spot found in {} tries", config.collectible_tries);
    None
}
