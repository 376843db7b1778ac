use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use lumen::TraceConfig;
use lumen_json::{serde_json, serialize_scene};
use lumen_random::{
    rand::{self, rngs::StdRng, SeedableRng},
    random_scene,
};

/// Generates a random scene and writes it as JSON.
#[derive(Parser)]
#[command(name = "gen_rand_scene")]
struct Args {
    /// Where to write the scene
    output: PathBuf,

    /// Number of mirrors, lenses and spherical mirrors
    #[arg(short, long, default_value_t = 12)]
    elements: usize,

    /// Number of point sources
    #[arg(short, long, default_value_t = 2)]
    sources: usize,

    /// Seed of the generator, for reproducible scenes
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(rand::thread_rng())?,
    };

    let scene = random_scene(&mut rng, args.elements, args.sources);
    let json = serialize_scene(&scene, &TraceConfig::default());

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &json)?;

    info!(
        "wrote {} elements ({} sources) to {}",
        scene.len(),
        args.sources,
        args.output.display()
    );

    Ok(())
}
