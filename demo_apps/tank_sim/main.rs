//! Headless tank simulation.
//!
//! Runs an aquarium for a number of frames and prints selected frames as
//! JSON lines. Without `--config`, a tank of procedural fish is generated.
//!
//! ```text
//! tank_sim --fish 5 --frames 300 --every 30
//! tank_sim --config tank.json --assets ./assets --dt 0
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use aquarium::motion::BoundaryPolicy;
use aquarium::{
    Aquarium, AquariumConfig, AssetServer, CreatureConfig, FileLoader, FrameScheduler, LoadTicket, MemoryLoader,
};
use aquarium::assets::FishBuilder;
use clap::Parser;
use glam::Vec3;

#[derive(Parser, Debug)]
#[command(name = "tank_sim", version, about = "Headless aquarium simulation")]
struct Cli {
    /// Tank configuration (JSON). Procedural fish are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of JSON asset descriptors referenced by the config.
    #[arg(short, long, requires = "config")]
    assets: Option<PathBuf>,

    /// Number of procedural fish when no config is given.
    #[arg(long, default_value_t = 3)]
    fish: usize,

    /// Frames to simulate.
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Fixed delta in seconds; 0 measures wall-clock time between frames.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Print every Nth frame.
    #[arg(long, default_value_t = 60)]
    every: u64,

    /// Clamp creatures into their bounds instead of letting them overshoot.
    #[arg(long)]
    clamp: bool,

    /// Seed for creature random sources.
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // RUST_LOG, when set, still takes precedence over -v.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(cli.verbose))).init();

    let mut aquarium = build_aquarium(&cli)?;
    settle(&mut aquarium, Duration::from_secs(2));

    let mut scheduler = FrameScheduler::new();
    scheduler.resync();
    let every = cli.every.max(1);

    for _ in 0..cli.frames {
        let frame = if cli.dt > 0.0 {
            scheduler.step(&mut aquarium, cli.dt)
        } else {
            scheduler.frame(&mut aquarium)
        };
        if frame.frame % every == 0 {
            println!("{}", serde_json::to_string(&frame)?);
        }
    }

    log::info!("simulated {} frames, {:.2}s of tank time", scheduler.frame_count(), aquarium.time());
    Ok(())
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_aquarium(cli: &Cli) -> Result<Aquarium> {
    match &cli.config {
        Some(path) => {
            let mut config =
                AquariumConfig::from_file(path).with_context(|| format!("reading {}", path.display()))?;
            apply_overrides(cli, &mut config);
            let root = cli
                .assets
                .clone()
                .or_else(|| path.parent().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            let server: AssetServer<_, LoadTicket> = AssetServer::new(FileLoader::new(root))?;
            Ok(Aquarium::with_dispatcher(&config, server)?)
        }
        None => {
            let loader = MemoryLoader::new();
            let mut config = AquariumConfig::default();
            for i in 0..cli.fish {
                let name = format!("fish-{i}");
                let stretch = 1.0 + 0.25 * (i % 3) as f32;
                let mut builder = FishBuilder::new().size(Vec3::new(2.0 * stretch, 0.8, 0.5));
                if i % 4 == 3 {
                    builder = builder.without_animation();
                }
                loader.insert(name.as_str(), builder.build());
                config.creatures.push(CreatureConfig {
                    flip_on_turn: Some(i % 2 == 1),
                    ..CreatureConfig::with_source(name)
                });
            }
            apply_overrides(cli, &mut config);
            let server: AssetServer<_, LoadTicket> = AssetServer::new(loader)?;
            Ok(Aquarium::with_dispatcher(&config, server)?)
        }
    }
}

fn apply_overrides(cli: &Cli, config: &mut AquariumConfig) {
    if cli.clamp {
        config.motion.boundary_policy = BoundaryPolicy::Clamp;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
}

/// Polls with zero deltas until every creature is placed or `timeout`
/// passes, so the first printed frame already shows the whole tank.
fn settle(aquarium: &mut Aquarium, timeout: Duration) {
    let start = Instant::now();
    loop {
        let frame = aquarium.tick(0.0);
        if frame.placed == frame.live || start.elapsed() >= timeout {
            if frame.placed < frame.live {
                log::warn!("{} of {} creatures still unplaced", frame.live - frame.placed, frame.live);
            }
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_the_log_filter() {
        assert_eq!(log_filter(0), "warn");
        assert_eq!(log_filter(1), "info");
        assert_eq!(log_filter(2), "debug");
        assert_eq!(log_filter(3), "trace");
        assert_eq!(log_filter(9), "trace");
    }

    #[test]
    fn repeated_v_flags_are_counted() {
        let cli = Cli::try_parse_from(["tank_sim", "-vv"]).unwrap();
        assert_eq!(log_filter(cli.verbose), "debug");
    }
}
