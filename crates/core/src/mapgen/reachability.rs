//! Breadth-first reachability where one move slides until something blocks it.
//!
//! A move from a tile travels in one cardinal direction across passable tiles
//! and lands on the last one before a wall, obstacle, or hazard. Each slide is
//! one hop no matter how far it travels, so distances measure decisions rather
//! than tiles walked.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::types::{Direction, Pos, TileKind};

use super::grid::TileGrid;

/// What happens to a slide that ends against lava.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardSlide {
    /// The mover would fall in, so the move does not exist.
    #[default]
    Lethal,
    /// The mover halts on the last safe tile in front of the lava.
    StopShort,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slide {
    pub landing: Pos,
    /// Tiles crossed after leaving the origin, landing included.
    pub crossed: Vec<Pos>,
    pub blocked_by: TileKind,
}

/// Slides from `from` toward `direction`. `None` when the mover cannot leave
/// its tile or the slide would end in lava under [`HazardSlide::Lethal`].
pub fn slide(grid: &TileGrid, from: Pos, direction: Direction, policy: HazardSlide) -> Option<Slide> {
    let mut crossed = Vec::new();
    let mut current = from;
    let blocked_by = loop {
        let next = current.step(direction);
        let tile = grid.tile_at(next);
        if !tile.is_passable() {
            break tile;
        }
        crossed.push(next);
        current = next;
    };

    if current == from {
        return None;
    }
    if blocked_by == TileKind::Hazard && policy == HazardSlide::Lethal {
        return None;
    }
    Some(Slide { landing: current, crossed, blocked_by })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReachabilityMap {
    start: Pos,
    distances: BTreeMap<Pos, u32>,
    predecessors: BTreeMap<Pos, Pos>,
    swept: BTreeSet<Pos>,
}

impl ReachabilityMap {
    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn distance(&self, pos: Pos) -> Option<u32> {
        self.distances.get(&pos).copied()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.distances.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Landing tiles with their hop distance, in row-major order.
    pub fn visited(&self) -> impl Iterator<Item = (Pos, u32)> + '_ {
        self.distances.iter().map(|(&pos, &distance)| (pos, distance))
    }

    /// Every tile a reachable slide passes over, landings included.
    pub fn swept(&self) -> &BTreeSet<Pos> {
        &self.swept
    }

    pub fn max_distance(&self) -> Option<u32> {
        self.distances.values().copied().max()
    }

    /// Landing tiles sitting at the greatest distance, provided it is at least
    /// `minimum`. Row-major order.
    pub fn farthest(&self, minimum: u32) -> Vec<Pos> {
        let Some(max_distance) = self.max_distance().filter(|&distance| distance >= minimum) else {
            return Vec::new();
        };
        self.visited()
            .filter(|&(_, distance)| distance == max_distance)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Landing sequence from the start to `goal`, both ends included.
    pub fn path_to(&self, goal: Pos) -> Option<Vec<Pos>> {
        if !self.contains(goal) {
            return None;
        }
        let mut path = vec![goal];
        let mut current = goal;
        while current != self.start {
            current = *self.predecessors.get(&current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

/// Hop distances from `start` to every landing tile. First visit wins, which
/// breadth-first order makes the shortest hop count. An impassable start
/// yields an empty map.
pub fn analyze(grid: &TileGrid, start: Pos, policy: HazardSlide) -> ReachabilityMap {
    let mut map = ReachabilityMap {
        start,
        distances: BTreeMap::new(),
        predecessors: BTreeMap::new(),
        swept: BTreeSet::new(),
    };
    if !grid.tile_at(start).is_passable() {
        return map;
    }

    map.distances.insert(start, 0);
    map.swept.insert(start);
    let mut open = VecDeque::from([(start, 0_u32)]);
    while let Some((current, distance)) = open.pop_front() {
        for direction in Direction::ALL {
            let Some(slide) = slide(grid, current, direction, policy) else {
                continue;
            };
            map.swept.extend(slide.crossed.iter().copied());
            if map.distances.contains_key(&slide.landing) {
                continue;
            }
            map.distances.insert(slide.landing, distance + 1);
            map.predecessors.insert(slide.landing, current);
            open.push_back((slide.landing, distance + 1));
        }
    }
    map
}
