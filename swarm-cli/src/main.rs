use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use swarm_cli::Runner;
use swarm_shared::SwarmSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless flocking simulation", long_about = None)]
struct Args {
    /// JSON settings file; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of boids (overrides the settings file)
    #[arg(short, long)]
    boids: Option<usize>,

    /// Number of scripted touch enemies (overrides the settings file)
    #[arg(short, long)]
    enemies: Option<usize>,

    /// Seed for initial placement (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds per step (overrides the settings file)
    #[arg(long)]
    dt: Option<f64>,

    /// Number of steps to run
    #[arg(short, long, default_value_t = 600)]
    steps: u64,

    /// Write a frame every N steps
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Output file for JSON-lines frames (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn load_settings(args: &Args) -> Result<SwarmSettings> {
    let mut settings = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            SwarmSettings::from_json(&json)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))?
        }
        None => SwarmSettings::default(),
    };

    if let Some(boids) = args.boids {
        settings.boid_count = boids;
    }
    if let Some(enemies) = args.enemies {
        settings.enemy_count = enemies;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(dt) = args.dt {
        settings.time_step = dt;
    }

    Ok(settings)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let settings = load_settings(&args)?;

    if args.print_config {
        println!("{}", settings.to_json_pretty()?);
        return Ok(());
    }

    log::info!("Swarm starting...");
    log::info!("Steps: {} (dt {}s), frame every {}", args.steps, settings.time_step, args.every);

    let mut runner = Runner::new(&settings).context("Failed to initialize simulation")?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            log::info!("Writing frames to {}", path.display());
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = runner
        .run(args.steps, args.every, &mut out)
        .context("Simulation error")?;

    log::info!("Wrote {} frames over {} steps", summary.frames, summary.steps);

    Ok(())
}
