//! Retry controller that turns failed attempts into fresh seeds.

mod hazards;
mod pipeline;

use super::config::GenerationConfig;
use super::error::{AttemptFailure, GenerationError};
use super::model::Dungeon;
use super::seed::{DungeonSeed, derive_attempt_seed};

#[derive(Clone, Debug)]
pub struct DungeonGenerator {
    config: GenerationConfig,
}

impl DungeonGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Runs attempts in order until one validates. Nothing from a failed
    /// attempt survives into the next one.
    pub fn generate(&self, seed: &DungeonSeed) -> Result<Dungeon, GenerationError> {
        let base_seed = seed.base_seed();
        let mut last_failure = AttemptFailure::NoFloor;
        for attempt in 0..self.config.max_attempts {
            match self.attempt(base_seed, attempt) {
                Ok(dungeon) => {
                    log::info!(
                        "seed {seed}: dungeon ready on attempt {attempt} ({} rooms, exit {} hops away)",
                        dungeon.rooms.len(),
                        dungeon.exit_distance
                    );
                    return Ok(dungeon);
                }
                Err(failure) => {
                    log::debug!("seed {seed}: attempt {attempt} rejected: {failure}");
                    last_failure = failure;
                }
            }
        }

        log::warn!("seed {seed}: all {} attempts failed", self.config.max_attempts);
        Err(GenerationError::Exhausted { attempts: self.config.max_attempts, last_failure })
    }

    /// A single attempt, exposed so tooling can replay the one that failed.
    pub fn attempt(&self, base_seed: u64, attempt: u32) -> Result<Dungeon, AttemptFailure> {
        pipeline::run_attempt(&self.config, attempt, derive_attempt_seed(base_seed, attempt))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::mapgen::reachability::analyze;
    use crate::types::{Pos, TileKind};

    fn generate(seed: impl Into<DungeonSeed>, config: GenerationConfig) -> Dungeon {
        DungeonGenerator::new(config)
            .expect("valid config")
            .generate(&seed.into())
            .expect("generation should succeed")
    }

    #[test]
    fn seed_42_on_default_grid_has_single_distant_exit() {
        let dungeon = generate("42", GenerationConfig::default());
        assert!(dungeon.attempt < 100);
        assert!(dungeon.exit_distance >= 5);
        assert_eq!(dungeon.count(TileKind::Exit), 1);
        assert_eq!(dungeon.tile_at(dungeon.exit), TileKind::Exit);
    }

    #[test]
    fn same_inputs_produce_byte_identical_dungeons() {
        let a = generate("42", GenerationConfig::default());
        let b = generate("42", GenerationConfig::default());
        assert_eq!(a.canonical_bytes(), b.canonical_bytes());
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_produce_different_dungeons() {
        let a = generate(1_u64, GenerationConfig::default());
        let b = generate(2_u64, GenerationConfig::default());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn border_stays_wall() {
        let dungeon = generate(7_u64, GenerationConfig::with_size(41, 27));
        for x in 0..dungeon.width as i32 {
            assert_eq!(dungeon.tile_at(Pos::new(x, 0)), TileKind::Wall);
            assert_eq!(dungeon.tile_at(Pos::new(x, dungeon.height as i32 - 1)), TileKind::Wall);
        }
        for y in 0..dungeon.height as i32 {
            assert_eq!(dungeon.tile_at(Pos::new(0, y)), TileKind::Wall);
            assert_eq!(dungeon.tile_at(Pos::new(dungeon.width as i32 - 1, y)), TileKind::Wall);
        }
    }

    #[test]
    fn impossible_distance_exhausts_attempts() {
        let config = GenerationConfig {
            min_exit_distance: 10_000,
            max_attempts: 3,
            ..GenerationConfig::default()
        };
        let result = DungeonGenerator::new(config).expect("valid config").generate(&"42".into());
        match result {
            Err(GenerationError::Exhausted { attempts, last_failure }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(last_failure, AttemptFailure::ExitPlacement { .. }));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn accepted_config_is_kept_verbatim() {
        let config = GenerationConfig { min_exit_distance: 3, ..GenerationConfig::with_size(21, 17) };
        let generator = DungeonGenerator::new(config.clone()).expect("valid config");
        assert_eq!(generator.config(), &config);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = GenerationConfig::with_size(10, 10);
        assert!(matches!(DungeonGenerator::new(config), Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn successful_attempt_replays_identically() {
        let generator = DungeonGenerator::new(GenerationConfig::default()).expect("valid config");
        let seed = DungeonSeed::from(99_u64);
        let dungeon = generator.generate(&seed).expect("generation should succeed");
        let replayed = generator.attempt(seed.base_seed(), dungeon.attempt).expect("same attempt");
        assert_eq!(dungeon, replayed);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn emitted_dungeons_are_solvable_and_fully_connected(
            seed in any::<u64>(),
            width in 15_usize..=45,
            height in 15_usize..=45,
        ) {
            let config = GenerationConfig::with_size(width, height);
            let Ok(dungeon) = DungeonGenerator::new(config.clone())
                .expect("valid config")
                .generate(&DungeonSeed::from(seed))
            else {
                return Ok(());
            };
            let grid = dungeon.grid();

            let reachability = analyze(&grid, dungeon.start, config.hazard_slide);
            prop_assert_eq!(reachability.distance(dungeon.exit), Some(dungeon.exit_distance));
            prop_assert!(dungeon.exit_distance >= config.min_exit_distance);
            prop_assert!(reachability.visited().all(|(pos, _)| grid.tile_at(pos) != TileKind::Hazard));

            let walkable = grid.walk_connected(dungeon.start);
            let floor: BTreeSet<Pos> = grid.positions_of(TileKind::Floor).into_iter().collect();
            prop_assert!(floor.is_subset(&walkable), "floor island left behind for seed {}", seed);
        }
    }
}
