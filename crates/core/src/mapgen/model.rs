//! The finished dungeon handed to callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Pos, TileKind};

use super::grid::TileGrid;
use super::layout::Room;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` entries.
    pub tiles: Vec<TileKind>,
    pub rooms: Vec<Room>,
    pub start: Pos,
    pub exit: Pos,
    pub collectible: Option<Pos>,
    /// Slide hops from start to exit.
    pub exit_distance: u32,
    /// Zero-based index of the attempt that succeeded.
    pub attempt: u32,
    pub attempt_seed: u64,
}

impl Dungeon {
    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if pos.x < 0 || pos.y < 0 {
            return TileKind::Wall;
        }
        let x = pos.x as usize;
        let y = pos.y as usize;
        if x >= self.width || y >= self.height {
            return TileKind::Wall;
        }
        self.tiles[y * self.width + x]
    }

    /// Copy of the tiles as a queryable grid, e.g. for re-running reachability.
    pub fn grid(&self) -> TileGrid {
        let mut grid = TileGrid::filled(self.width, self.height, TileKind::Wall);
        for (index, &tile) in self.tiles.iter().enumerate() {
            let pos = Pos { y: (index / self.width) as i32, x: (index % self.width) as i32 };
            grid.set(pos, tile);
        }
        grid
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|&&tile| tile == kind).count()
    }

    /// Stable byte encoding of everything a player could observe.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.tiles.len() + 64);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.tiles.iter().map(|tile| tile.code()));
        for pos in [self.start, self.exit] {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
        }
        match self.collectible {
            Some(pos) => {
                bytes.push(1);
                bytes.extend(pos.y.to_le_bytes());
                bytes.extend(pos.x.to_le_bytes());
            }
            None => bytes.push(0),
        }
        bytes.extend(self.exit_distance.to_le_bytes());
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One text row per grid row, `@` marking the start.
impl fmt::Display for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Pos { y: y as i32, x: x as i32 };
                let glyph = if pos == self.start { '@' } else { self.tile_at(pos).glyph() };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
