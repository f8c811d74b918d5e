use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dungeon_core::{DungeonGenerator, DungeonSeed, GenerationConfig, HazardSlide};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Ascii,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Generate a slide-maze dungeon", long_about = None)]
struct Args {
    /// Seed text; numeric-looking text is hashed like any other text
    #[arg(short, long, default_value = "42")]
    seed: String,
    /// Treat the seed as a raw u64 instead of hashing it
    #[arg(long)]
    numeric_seed: bool,
    /// JSON config file; flags below override its grid size
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    /// Let slides stop in front of lava instead of rejecting them
    #[arg(long)]
    forgiving_lava: bool,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GenerationConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if args.forgiving_lava {
        config.hazard_slide = HazardSlide::StopShort;
    }

    let seed = if args.numeric_seed {
        let value: u64 = args
            .seed
            .parse()
            .with_context(|| format!("--numeric-seed expects a u64, got {:?}", args.seed))?;
        DungeonSeed::from(value)
    } else {
        DungeonSeed::from(args.seed.as_str())
    };

    let generator = DungeonGenerator::new(config).context("Invalid generation config")?;
    let dungeon = generator.generate(&seed).context("Dungeon generation failed")?;

    match args.format {
        OutputFormat::Ascii => {
            print!("{dungeon}");
            println!("Seed: {seed}");
            println!("Attempt: {}", dungeon.attempt);
            println!("Exit distance: {} hops", dungeon.exit_distance);
            println!("Fingerprint: {:016x}", dungeon.fingerprint());
        }
        OutputFormat::Json => {
            println!("{}", dungeon.to_json().context("Failed to serialize dungeon")?);
        }
    }

    Ok(())
}
