//! Row-major tile storage plus the tile-space queries shared by every stage.

use std::collections::{BTreeSet, VecDeque};

use crate::types::{Pos, TileKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    pub fn filled(width: usize, height: usize, tile: TileKind) -> Self {
        Self { width, height, tiles: vec![tile; width * height] }
    }

    /// Builds a grid from text rows using the glyphs of [`TileKind::glyph`].
    /// Unknown glyphs become walls. Short rows are padded with walls.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grid = Self::filled(width, height, TileKind::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let tile = match glyph {
                    '.' => TileKind::Floor,
                    'o' => TileKind::Obstacle,
                    '~' => TileKind::Hazard,
                    '$' => TileKind::Collectible,
                    '>' => TileKind::Exit,
                    _ => TileKind::Wall,
                };
                grid.tiles[y * width + x] = tile;
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    pub fn into_tiles(self) -> Vec<TileKind> {
        self.tiles
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn is_border(&self, pos: Pos) -> bool {
        pos.x == 0
            || pos.y == 0
            || pos.x as usize == self.width - 1
            || pos.y as usize == self.height - 1
    }

    /// Out-of-bounds reads as wall.
    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    /// Writes are ignored outside the grid.
    pub fn set(&mut self, pos: Pos, tile: TileKind) {
        if self.in_bounds(pos) {
            let index = self.index(pos);
            self.tiles[index] = tile;
        }
    }

    /// Like [`TileGrid::set`] but never touches the outer border ring.
    pub(super) fn set_interior(&mut self, pos: Pos, tile: TileKind) {
        if self.in_bounds(pos) && !self.is_border(pos) {
            self.set(pos, tile);
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    pub fn positions_of(&self, kind: TileKind) -> Vec<Pos> {
        self.positions().filter(|&pos| self.tile_at(pos) == kind).collect()
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|&&tile| tile == kind).count()
    }

    /// Tiles reachable from `start` by ordinary four-way walking over passable tiles.
    pub fn walk_connected(&self, start: Pos) -> BTreeSet<Pos> {
        let mut seen = BTreeSet::new();
        if !self.tile_at(start).is_passable() {
            return seen;
        }

        let mut open = VecDeque::from([start]);
        seen.insert(start);
        while let Some(pos) = open.pop_front() {
            for next in pos.orthogonal_neighbors() {
                if self.tile_at(next).is_passable() && seen.insert(next) {
                    open.push_back(next);
                }
            }
        }
        seen
    }

    /// Turns every floor tile not walk-connected to `start` into wall and
    /// returns how many tiles were culled.
    pub(super) fn cull_floor_unreachable_from(&mut self, start: Pos) -> usize {
        let connected = self.walk_connected(start);
        let mut culled = 0;
        for index in 0..self.tiles.len() {
            let pos = Pos { y: (index / self.width) as i32, x: (index % self.width) as i32 };
            if self.tiles[index] == TileKind::Floor && !connected.contains(&pos) {
                self.tiles[index] = TileKind::Wall;
                culled += 1;
            }
        }
        culled
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}
