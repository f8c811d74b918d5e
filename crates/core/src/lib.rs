pub mod mapgen;
pub mod types;

pub use mapgen::*;
pub use types::*;
