use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use lumen::*;
use lumen_elements::{default_scene, Element};
use lumen_json::{deserialize_scene, serde_json, serialize_paths};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Traces a scene and writes the resulting ray paths as JSON.
#[derive(Parser)]
#[command(name = "run_scene_json")]
struct Args {
    /// Scene file to trace. The built-in demo scene is traced if omitted
    scene: Option<PathBuf>,

    /// Where to write the traced paths (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Bounce budget given to every source, overriding the scene's
    #[arg(long)]
    max_bounces: Option<u32>,

    /// Length of escaping rays, overriding the scene's
    #[arg(long)]
    max_ray_length: Option<Float>,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,

    /// Logging level, `RUST_LOG` takes precedence
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn load_scene(path: Option<&PathBuf>) -> Result<(Scene<Element>, TraceConfig)> {
    let Some(path) = path else {
        info!("no scene file given, tracing the demo scene");
        return Ok((default_scene(), TraceConfig::default()));
    };

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    deserialize_scene(&json).with_context(|| format!("invalid scene in {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let (mut scene, mut config) = load_scene(args.scene.as_ref())?;

    if let Some(bounces) = args.max_bounces {
        config.default_bounces = bounces;
        for i in scene.emitter_indices().to_vec() {
            if let Some(mut element) = scene.get_mut(i) {
                if let Element::Source(source) = &mut *element {
                    source.bounces = bounces;
                }
            }
        }
    }

    if let Some(length) = args.max_ray_length {
        anyhow::ensure!(
            length.is_finite() && length > EPSILON,
            "--max-ray-length must be positive"
        );
        config.max_ray_length = length;
    }

    let paths = Tracer::new(config).trace(&scene);

    let num_points: usize = paths.iter().map(RayPath::len).sum();
    info!(
        "traced {} elements ({} sources): {} paths, {} points",
        scene.len(),
        scene.emitter_indices().len(),
        paths.len(),
        num_points,
    );

    let json = serialize_paths(&paths);

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if args.pretty {
        serde_json::to_writer_pretty(&mut writer, &json)?;
    } else {
        serde_json::to_writer(&mut writer, &json)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
