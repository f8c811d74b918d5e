//! Joins sibling subtrees with L-shaped corridors running door to door.

use crate::types::{Pos, TileKind};

use super::grid::TileGrid;
use super::layout::{Door, Room};
use super::partition::{LeafId, PartitionTree};
use super::random::RandomSource;

/// Connects every pair of sibling subtrees bottom-up and returns the
/// representative room of the whole tree, if it holds any room at all.
pub(super) fn connect_subtrees(
    tree: &PartitionTree,
    rooms: &mut [Room],
    grid: &mut TileGrid,
    rng: &mut RandomSource,
) -> Option<usize> {
    representative_room(tree, tree.root(), rooms, grid, rng)
}

fn representative_room(
    tree: &PartitionTree,
    leaf_id: LeafId,
    rooms: &mut [Room],
    grid: &mut TileGrid,
    rng: &mut RandomSource,
) -> Option<usize> {
    let leaf = tree.leaf(leaf_id)?;
    let Some((left, right)) = leaf.children() else {
        return leaf.room;
    };

    let left_room = representative_room(tree, left, rooms, grid, rng);
    let right_room = representative_room(tree, right, rooms, grid, rng);
    match (left_room, right_room) {
        (Some(left_room), Some(right_room)) => {
            connect_rooms(rooms, left_room, right_room, grid, rng);
            Some(if rng.coin_flip() { left_room } else { right_room })
        }
        (left_room, right_room) => left_room.or(right_room),
    }
}

fn connect_rooms(
    rooms: &mut [Room],
    from: usize,
    to: usize,
    grid: &mut TileGrid,
    rng: &mut RandomSource,
) {
    let Some(from_door) = pick_door(&rooms[from], grid, rng) else {
        log::trace!("room {from} has no usable door slot");
        return;
    };
    let Some(to_door) = pick_door(&rooms[to], grid, rng) else {
        log::trace!("room {to} has no usable door slot");
        return;
    };

    for (room_index, door) in [(from, from_door), (to, to_door)] {
        grid.set_interior(door.pos, TileKind::Floor);
        place_blocker(&rooms[room_index], door, grid);
        rooms[room_index].doors.push(door);
    }

    let horizontal_first = rng.coin_flip();
    carve_l_shaped_corridor(grid, from_door.pos, to_door.pos, horizontal_first);
}

fn pick_door(room: &Room, grid: &TileGrid, rng: &mut RandomSource) -> Option<Door> {
    let slots: Vec<Door> = room
        .door_slots()
        .into_iter()
        .filter(|door| grid.in_bounds(door.pos) && !grid.is_border(door.pos))
        .collect();
    rng.pick(&slots).copied()
}

/// Skipped when the tile is no longer room floor, when an earlier corridor
/// enters the room through it, or when it would wall the entry corner off
/// from the rest of the room.
fn place_blocker(room: &Room, door: Door, grid: &mut TileGrid) {
    let Some(blocker) = room.blocker_for(door) else {
        return;
    };
    if grid.tile_at(blocker) != TileKind::Floor {
        return;
    }
    let feeds_corridor = blocker
        .orthogonal_neighbors()
        .into_iter()
        .any(|next| !room.rect.contains(next) && grid.tile_at(next).is_passable());
    let entry = door.entry_tile();
    let entry_keeps_exit = entry.orthogonal_neighbors().into_iter().any(|next| {
        next != blocker && room.rect.contains(next) && grid.tile_at(next).is_passable()
    });
    if feeds_corridor || !entry_keeps_exit {
        return;
    }
    grid.set_interior(blocker, TileKind::Obstacle);
}

fn carve_l_shaped_corridor(grid: &mut TileGrid, start: Pos, end: Pos, horizontal_first: bool) {
    if horizontal_first {
        carve_horizontal_line(grid, start.y, start.x, end.x);
        carve_vertical_line(grid, end.x, start.y, end.y);
    } else {
        carve_vertical_line(grid, start.x, start.y, end.y);
        carve_horizontal_line(grid, end.y, start.x, end.x);
    }
}

fn carve_horizontal_line(grid: &mut TileGrid, y: i32, left_x: i32, right_x: i32) {
    for x in left_x.min(right_x)..=left_x.max(right_x) {
        grid.set_interior(Pos { y, x }, TileKind::Floor);
    }
}

fn carve_vertical_line(grid: &mut TileGrid, x: i32, top_y: i32, bottom_y: i32) {
    for y in top_y.min(bottom_y)..=top_y.max(bottom_y) {
        grid.set_interior(Pos { y, x }, TileKind::Floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::config::GenerationConfig;
    use crate::mapgen::layout::{Rect, carve_room, carve_rooms};
    use crate::mapgen::partition::SplitRules;

    fn carved(seed: u64) -> (PartitionTree, Vec<Room>, TileGrid, Option<usize>) {
        let config = GenerationConfig::default();
        let mut rng = RandomSource::from_seed(seed);
        let mut grid = TileGrid::filled(config.width, config.height, TileKind::Wall);
        let bounds = Rect::new(0, 0, config.width, config.height);
        let mut tree = PartitionTree::build(bounds, SplitRules::from(&config), &mut rng);
        let mut rooms = carve_rooms(&mut tree, &mut grid, &config, &mut rng);
        let representative = connect_subtrees(&tree, &mut rooms, &mut grid, &mut rng);
        (tree, rooms, grid, representative)
    }

    #[test]
    fn l_corridor_joins_both_endpoints() {
        let mut grid = TileGrid::filled(12, 12, TileKind::Wall);
        carve_l_shaped_corridor(&mut grid, Pos::new(2, 3), Pos::new(8, 9), true);
        assert_eq!(grid.tile_at(Pos::new(2, 3)), TileKind::Floor);
        assert_eq!(grid.tile_at(Pos::new(8, 3)), TileKind::Floor);
        assert_eq!(grid.tile_at(Pos::new(8, 9)), TileKind::Floor);
        assert_eq!(grid.tile_at(Pos::new(2, 9)), TileKind::Wall);
        assert!(grid.walk_connected(Pos::new(2, 3)).contains(&Pos::new(8, 9)));
    }

    #[test]
    fn every_room_is_walk_connected_after_joining() {
        for seed in 0..40 {
            let (_, rooms, grid, representative) = carved(seed);
            assert!(representative.is_some());
            let origin = rooms[0].rect.center();
            let reachable = grid.walk_connected(origin);
            for room in &rooms {
                let corner = Pos { y: room.rect.y as i32, x: room.rect.x as i32 };
                assert!(
                    reachable.contains(&corner),
                    "room {:?} disconnected for seed {seed}",
                    room.rect
                );
            }
        }
    }

    #[test]
    fn doors_are_recorded_and_carved() {
        let (tree, rooms, grid, _) = carved(42);
        let connections = tree.len() - tree.terminal_leaves().len();
        let door_count: usize = rooms.iter().map(|room| room.doors.len()).sum();
        assert_eq!(door_count, connections * 2);
        for room in &rooms {
            for door in &room.doors {
                assert_eq!(grid.tile_at(door.pos), TileKind::Floor);
                assert!(!grid.is_border(door.pos));
            }
        }
    }

    #[test]
    fn blocker_is_not_placed_where_a_corridor_enters() {
        let mut grid = TileGrid::from_rows(&[
            "##########",
            "##########",
            "##....####",
            "......####",
            "##....####",
            "##....####",
            "##########",
        ]);
        let room = Room::new(Rect::new(2, 2, 4, 4));
        let north_left = room.door_slots()[0];
        place_blocker(&room, north_left, &mut grid);
        assert_eq!(grid.tile_at(Pos::new(2, 3)), TileKind::Floor);

        let north_right = room.door_slots()[1];
        place_blocker(&room, north_right, &mut grid);
        assert_eq!(grid.tile_at(Pos::new(5, 3)), TileKind::Obstacle);
    }

    #[test]
    fn blocker_never_seals_the_entry_corner() {
        let mut grid = TileGrid::filled(10, 10, TileKind::Wall);
        let room = Room::new(Rect::new(2, 2, 5, 5));
        carve_room(&mut grid, &room.rect);

        let west_top = room.door_slots()[4];
        place_blocker(&room, west_top, &mut grid);
        assert_eq!(grid.tile_at(Pos::new(3, 2)), TileKind::Obstacle);

        let north_left = room.door_slots()[0];
        place_blocker(&room, north_left, &mut grid);
        assert_eq!(grid.tile_at(Pos::new(2, 3)), TileKind::Floor);
    }
}
