//! Rectangles, rooms, door slots, and per-leaf room carving.

use serde::{Deserialize, Serialize};

use crate::types::{Direction, Pos, TileKind};

use super::config::GenerationConfig;
use super::grid::TileGrid;
use super::partition::PartitionTree;
use super::random::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    pub fn area(self) -> usize {
        self.width * self.height
    }

    pub fn center(self) -> Pos {
        Pos { y: (self.y + (self.height / 2)) as i32, x: (self.x + (self.width / 2)) as i32 }
    }

    pub fn contains(self, pos: Pos) -> bool {
        if pos.x < 0 || pos.y < 0 {
            return false;
        }
        let px = pos.x as usize;
        let py = pos.y as usize;
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// True when `inner` fits with at least `margin` tiles free on every side.
    pub fn encloses_with_margin(self, inner: &Self, margin: usize) -> bool {
        inner.x >= self.x + margin
            && inner.y >= self.y + margin
            && inner.right() + margin <= self.right()
            && inner.bottom() + margin <= self.bottom()
    }
}

/// A corridor opening in the wall ring around a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Door {
    pub pos: Pos,
    /// Direction pointing out of the room through this door.
    pub outward: Direction,
}

impl Door {
    /// The room tile a mover steps onto when entering through this door.
    pub fn entry_tile(self) -> Pos {
        self.pos.step(self.outward.opposite())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub rect: Rect,
    pub doors: Vec<Door>,
}

impl Room {
    pub fn new(rect: Rect) -> Self {
        Self { rect, doors: Vec::new() }
    }

    /// The eight wall-ring positions flanking the room's corners, two per wall.
    /// Every slot opens straight onto a corner tile of the room.
    pub fn door_slots(&self) -> [Door; 8] {
        let rect = self.rect;
        let (left, top) = (rect.x as i32, rect.y as i32);
        let (right, bottom) = (rect.right() as i32, rect.bottom() as i32);
        [
            Door { pos: Pos { y: top - 1, x: left }, outward: Direction::North },
            Door { pos: Pos { y: top - 1, x: right }, outward: Direction::North },
            Door { pos: Pos { y: bottom + 1, x: left }, outward: Direction::South },
            Door { pos: Pos { y: bottom + 1, x: right }, outward: Direction::South },
            Door { pos: Pos { y: top, x: left - 1 }, outward: Direction::West },
            Door { pos: Pos { y: bottom, x: left - 1 }, outward: Direction::West },
            Door { pos: Pos { y: top, x: right + 1 }, outward: Direction::East },
            Door { pos: Pos { y: bottom, x: right + 1 }, outward: Direction::East },
        ]
    }

    /// Tile that stops a mover entering through `door` before it can slide the
    /// whole edge of the room and out through the facing wall. `None` when the
    /// room is too shallow behind the door for a blocker to leave a corner free.
    pub fn blocker_for(&self, door: Door) -> Option<Pos> {
        let depth = if door.outward.is_horizontal() { self.rect.width } else { self.rect.height };
        if depth < 3 {
            return None;
        }
        let blocker = door.entry_tile().step(door.outward.opposite());
        self.rect.contains(blocker).then_some(blocker)
    }
}

/// Carves one room per terminal leaf, post-order, and records which room each
/// leaf owns. Split leaves never receive a room.
pub(super) fn carve_rooms(
    tree: &mut PartitionTree,
    grid: &mut TileGrid,
    config: &GenerationConfig,
    rng: &mut RandomSource,
) -> Vec<Room> {
    let mut rooms = Vec::new();
    for leaf_id in tree.post_order() {
        let Some(leaf) = tree.leaf(leaf_id) else {
            continue;
        };
        if !leaf.is_terminal() {
            continue;
        }
        let Some(rect) = room_rect_for_leaf(leaf.rect, config.min_room_size, rng) else {
            continue;
        };

        carve_room(grid, &rect);
        tree.assign_room(leaf_id, rooms.len());
        rooms.push(Room::new(rect));
    }
    rooms
}

/// A leaf narrower than `min_room_size + 2` gets its whole interior as the
/// room. Only a leaf with no interior at all stays empty.
fn room_rect_for_leaf(leaf: Rect, min_room_size: usize, rng: &mut RandomSource) -> Option<Rect> {
    let width = room_side(leaf.width, min_room_size, rng)?;
    let height = room_side(leaf.height, min_room_size, rng)?;
    let x = leaf.x + rng.next_usize(1, leaf.width - width - 1);
    let y = leaf.y + rng.next_usize(1, leaf.height - height - 1);
    Some(Rect { x, y, width, height })
}

fn room_side(leaf_side: usize, min_room_size: usize, rng: &mut RandomSource) -> Option<usize> {
    let interior = leaf_side.checked_sub(2).filter(|&side| side > 0)?;
    if interior < min_room_size {
        return Some(interior);
    }
    Some(rng.next_usize(min_room_size, interior))
}

pub(super) fn carve_room(grid: &mut TileGrid, room: &Rect) {
    for y in room.y..=room.bottom() {
        for x in room.x..=room.right() {
            grid.set_interior(Pos { y: y as i32, x: x as i32 }, TileKind::Floor);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::mapgen::partition::SplitRules;

    #[test]
    fn door_slots_flank_each_corner_in_the_wall_ring() {
        let room = Room::new(Rect::new(5, 5, 4, 4));
        let slots = room.door_slots();
        for door in slots {
            assert!(!room.rect.contains(door.pos), "door {door:?} must sit outside the room");
            assert!(room.rect.contains(door.entry_tile()));
            let entry = door.entry_tile();
            let at_corner = (entry.x == 5 || entry.x == 8) && (entry.y == 5 || entry.y == 8);
            assert!(at_corner, "door {door:?} should open onto a corner tile");
        }
        let unique: BTreeSet<_> = slots.iter().map(|door| door.pos).collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn blocker_sits_one_tile_past_the_entry_corner() {
        let room = Room::new(Rect::new(5, 5, 4, 6));
        let north_left = room.door_slots()[0];
        assert_eq!(north_left.pos, Pos::new(5, 4));
        assert_eq!(room.blocker_for(north_left), Some(Pos::new(5, 6)));

        let east_bottom = room.door_slots()[7];
        assert_eq!(east_bottom.pos, Pos::new(9, 10));
        assert_eq!(room.blocker_for(east_bottom), Some(Pos::new(7, 10)));
    }

    #[test]
    fn shallow_rooms_get_no_blocker() {
        let room = Room::new(Rect::new(2, 2, 5, 2));
        let north = room.door_slots()[0];
        assert_eq!(room.blocker_for(north), None);
        let west = room.door_slots()[4];
        assert!(room.blocker_for(west).is_some());
    }

    #[test]
    fn carved_room_respects_leaf_margin() {
        let leaf = Rect::new(3, 4, 9, 7);
        for seed in 0..200 {
            let mut rng = RandomSource::from_seed(seed);
            let room = room_rect_for_leaf(leaf, 4, &mut rng).expect("leaf fits a room");
            assert!(leaf.encloses_with_margin(&room, 1), "room {room:?} leaks out of {leaf:?}");
            assert!(room.width >= 4 && room.height >= 4);
        }
    }

    #[test]
    fn undersized_leaf_gets_its_whole_interior() {
        let mut rng = RandomSource::from_seed(1);
        let room = room_rect_for_leaf(Rect::new(0, 0, 5, 9), 4, &mut rng).expect("interior fits");
        assert_eq!((room.x, room.y, room.width), (1, 1, 3));
        assert!(room.height >= 4 && room.height <= 7);
        assert_eq!(room_rect_for_leaf(Rect::new(0, 0, 2, 9), 4, &mut rng), None);
    }

    #[test]
    fn unsplittable_five_by_five_leaf_still_bears_a_room() {
        let config = GenerationConfig::default();
        let mut tree = PartitionTree::new(Rect::new(0, 0, 5, 5));
        let mut grid = TileGrid::filled(5, 5, TileKind::Wall);
        let mut rng = RandomSource::from_seed(42);
        let root = tree.root();
        assert!(!tree.split(root, SplitRules::from(&config), &mut rng));

        let rooms = carve_rooms(&mut tree, &mut grid, &config, &mut rng);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].rect, Rect::new(1, 1, 3, 3));
        assert_eq!(tree.leaf(root).and_then(|leaf| leaf.room), Some(0));
        assert_eq!(grid.count(TileKind::Floor), 9);
    }
}
