use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn orthogonal_neighbors(self) -> [Pos; 4] {
        Direction::ALL.map(|direction| self.step(direction))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    /// Impassable blocker dropped inside rooms next to doors.
    Obstacle,
    /// Lava. Sliding into it is fatal.
    Hazard,
    Collectible,
    Exit,
}

impl TileKind {
    /// Tiles a slide can travel across.
    pub fn is_passable(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Collectible | TileKind::Exit)
    }

    pub fn glyph(self) -> char {
        match self {
            TileKind::Wall => '#',
            TileKind::Floor => '.',
            TileKind::Obstacle => 'o',
            TileKind::Hazard => '~',
            TileKind::Collectible => '$',
            TileKind::Exit => '>',
        }
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            TileKind::Wall => 0,
            TileKind::Floor => 1,
            TileKind::Obstacle => 2,
            TileKind::Hazard => 3,
            TileKind::Collectible => 4,
            TileKind::Exit => 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    /// `(dx, dy)` with y growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }
}
