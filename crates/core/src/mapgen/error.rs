//! Failure types for configuration, single attempts, and whole generation runs.

use std::io;

use thiserror::Error;

use crate::types::Pos;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small, both sides must be at least {minimum}")]
    GridTooSmall { width: usize, height: usize, minimum: usize },
    #[error("min_leaf_size {min_leaf_size} cannot hold a room of {min_room_size} plus margins")]
    LeafTooSmallForRoom { min_leaf_size: usize, min_room_size: usize },
    #[error("max_leaf_size {max_leaf_size} must be at least twice min_leaf_size {min_leaf_size}")]
    LeafBoundsInverted { min_leaf_size: usize, max_leaf_size: usize },
    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    #[error("split_aspect_ratio must be at least 1.0, got {0}")]
    AspectRatioTooLow(f64),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("failed to read or write config file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a single attempt was thrown away. Recovered by retrying.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("no floor tile available for the start")]
    NoFloor,
    #[error("no reachable tile at or beyond {required} hops from {start:?} (farthest was {farthest})")]
    ExitPlacement { start: Pos, farthest: u32, required: u32 },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid generation config: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("gave up after {attempts} attempts, last failure: {last_failure}")]
    Exhausted { attempts: u32, last_failure: AttemptFailure },
}
