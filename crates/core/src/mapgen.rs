//! Procedural dungeon generation: partition, carve, connect, scatter, validate.

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod partition;
pub mod random;
pub mod reachability;
pub mod seed;

mod corridors;
mod generator;
mod grid;

pub use config::{GenerationConfig, MIN_GRID_SIDE};
pub use error::{AttemptFailure, ConfigError, GenerationError};
pub use generator::DungeonGenerator;
pub use grid::TileGrid;
pub use layout::{Door, Rect, Room};
pub use model::Dungeon;
pub use partition::{Leaf, LeafId, PartitionTree, SplitRules};
pub use random::RandomSource;
pub use reachability::{HazardSlide, ReachabilityMap, Slide, analyze, slide};
pub use seed::DungeonSeed;

pub fn generate_dungeon(
    seed: impl Into<DungeonSeed>,
    config: &GenerationConfig,
) -> Result<Dungeon, GenerationError> {
    DungeonGenerator::new(config.clone())?.generate(&seed.into())
}
