//! Seed normalization and per-attempt seed derivation.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Base seed for a generation run. Text seeds are hashed, never parsed, so
/// `DungeonSeed::from("42")` and `DungeonSeed::from(42)` are different dungeons.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DungeonSeed {
    Numeric(u64),
    Text(String),
}

impl DungeonSeed {
    pub fn base_seed(&self) -> u64 {
        match self {
            Self::Numeric(seed) => *seed,
            Self::Text(text) => hash_text_seed(text),
        }
    }
}

impl From<u64> for DungeonSeed {
    fn from(seed: u64) -> Self {
        Self::Numeric(seed)
    }
}

impl From<&str> for DungeonSeed {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for DungeonSeed {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl fmt::Display for DungeonSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(seed) => write!(f, "{seed}"),
            Self::Text(text) => write!(f, "{text:?}"),
        }
    }
}

fn hash_text_seed(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut head = [0_u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

/// Seed for one attempt of a run. Attempt zero still differs from the raw
/// base seed, so a numeric seed never feeds the generator unmixed.
pub(super) fn derive_attempt_seed(base_seed: u64, attempt: u32) -> u64 {
    let mut mixed = base_seed ^ u64::from(attempt).wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}
