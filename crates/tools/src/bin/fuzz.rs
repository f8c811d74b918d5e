use std::collections::BTreeSet;

use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::{
    DungeonGenerator, DungeonSeed, GenerationConfig, GenerationError, Pos, TileKind, analyze,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of dungeons to generate
    #[arg(short, long, default_value_t = 500)]
    runs: u32,
    #[arg(long, default_value_t = 15)]
    min_side: usize,
    #[arg(long, default_value_t = 60)]
    max_side: usize,
}

fn pick_side(rng: &mut ChaCha8Rng, min_side: usize, max_side: usize) -> usize {
    let span = (max_side - min_side + 1) as u64;
    min_side + (rng.next_u64() % span) as usize
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.min_side > args.max_side {
        bail!("--min-side {} exceeds --max-side {}", args.min_side, args.max_side);
    }

    println!("Starting dungeon fuzz from seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut exhausted = 0_u32;
    let mut total_attempts = 0_u64;

    for run in 0..args.runs {
        let dungeon_seed = rng.next_u64();
        let width = pick_side(&mut rng, args.min_side, args.max_side);
        let height = pick_side(&mut rng, args.min_side, args.max_side);
        let generator = DungeonGenerator::new(GenerationConfig::with_size(width, height))?;
        let config = generator.config();

        let dungeon = match generator.generate(&DungeonSeed::from(dungeon_seed)) {
            Ok(dungeon) => dungeon,
            Err(GenerationError::Exhausted { last_failure, .. }) => {
                println!("run {run}: seed {dungeon_seed} {width}x{height} exhausted ({last_failure})");
                exhausted += 1;
                continue;
            }
            Err(error) => return Err(error.into()),
        };
        total_attempts += u64::from(dungeon.attempt) + 1;

        // Assert invariants
        let grid = dungeon.grid();
        let reachability = analyze(&grid, dungeon.start, config.hazard_slide);
        let distance = reachability.distance(dungeon.exit);
        assert!(
            distance.is_some_and(|hops| hops >= config.min_exit_distance),
            "Invariant failed: exit unreachable or too close on seed {dungeon_seed}"
        );
        assert_eq!(
            dungeon.count(TileKind::Exit),
            1,
            "Invariant failed: exit count on seed {dungeon_seed}"
        );
        assert!(
            reachability.visited().all(|(pos, _)| grid.tile_at(pos) != TileKind::Hazard),
            "Invariant failed: landed on lava on seed {dungeon_seed}"
        );
        let walkable = grid.walk_connected(dungeon.start);
        let floor: BTreeSet<Pos> = grid.positions_of(TileKind::Floor).into_iter().collect();
        assert!(floor.is_subset(&walkable), "Invariant failed: floor island on seed {dungeon_seed}");
    }

    let succeeded = args.runs - exhausted;
    println!("Fuzzing completed: {succeeded} dungeons, {exhausted} exhausted.");
    if succeeded > 0 {
        println!("Mean attempts per dungeon: {:.2}", total_attempts as f64 / f64::from(succeeded));
    }
    Ok(())
}
