//! Plat headless runner
//!
//! Loads a level, plays a scripted controller through the fixed-step clock
//! and prints where every body ended up.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::Vec2;

use plat::sim::{Controller, FixedStep, Session, TickInput, TileMap, tick};
use plat::{MotionTuning, PhysicsConfig};

/// Run the platformer physics without a window.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Level text file (`.` empty, `#` solid, digits for tile ids)
    #[arg(short, long, value_name = "FILE", conflicts_with = "no_map")]
    level: Option<PathBuf>,

    /// Collide against the screen rectangle instead of a tile map
    #[arg(long)]
    no_map: bool,

    /// JSON physics configuration; missing fields keep defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Controller script: steps like `R30 RJ1 .20 L15` (intents, then tick count)
    #[arg(short, long, default_value = "R40 RJ1 R20 .30 L25 .20")]
    script: String,

    /// Simulated frame time in milliseconds
    #[arg(long, default_value_t = 16.7)]
    frame_ms: f32,

    /// Player spawn position as X,Y
    #[arg(long, default_value = "160,100", value_parser = parse_point)]
    spawn: Vec2,
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok(Vec2::new(x, y))
}

/// Expand a script into one controller snapshot per tick.
fn parse_script(script: &str) -> Result<Vec<Controller>> {
    let mut frames = Vec::new();
    for step in script.split_whitespace() {
        let split = step
            .find(|c: char| c.is_ascii_digit())
            .with_context(|| format!("script step {step:?} has no tick count"))?;
        let (intents, count) = step.split_at(split);
        let count: usize = count
            .parse()
            .with_context(|| format!("bad tick count in {step:?}"))?;

        let mut controller = Controller::default();
        for ch in intents.chars() {
            match ch.to_ascii_uppercase() {
                'L' => controller.move_left = true,
                'R' => controller.move_right = true,
                'J' => controller.jump = true,
                'D' => controller.move_down = true,
                '.' => {}
                other => bail!("unknown intent {other:?} in script step {step:?}"),
            }
        }
        frames.extend(std::iter::repeat_n(controller, count));
    }
    Ok(frames)
}

fn load_config(path: Option<&PathBuf>) -> Result<PhysicsConfig> {
    let Some(path) = path else {
        return Ok(PhysicsConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    PhysicsConfig::from_json(&json).with_context(|| format!("loading config {}", path.display()))
}

fn load_map(args: &CliArgs, config: &PhysicsConfig) -> Result<Option<TileMap>> {
    if args.no_map {
        return Ok(None);
    }
    let Some(path) = &args.level else {
        return Ok(Some(TileMap::demo()));
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading level {}", path.display()))?;
    let map = TileMap::from_ascii(&text, config.tile_size)
        .with_context(|| format!("parsing level {}", path.display()))?;
    Ok(Some(map))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();
    log::info!("Plat (headless) starting...");

    let config = load_config(args.config.as_ref())?;
    let map = load_map(&args, &config)?;
    let script = parse_script(&args.script)?;

    let mut session = Session::new(config, map);
    session.spawn_with(args.spawn, Vec2::new(30.0, 40.0), MotionTuning::player());

    let mut clock = FixedStep::default();
    let frame_dt = args.frame_ms / 1000.0;
    if !(frame_dt > 0.0) {
        bail!("frame time must be positive, got {} ms", args.frame_ms);
    }
    let mut frames = script.iter();
    let mut frame = 0u64;

    'outer: loop {
        for _ in 0..clock.advance(frame_dt) {
            let Some(&player) = frames.next() else {
                break 'outer;
            };
            tick(&mut session, &TickInput { player });
            for event in session.drain_events() {
                log::info!("tick {}: {:?}", session.time_ticks, event);
            }
        }
        if let Some(player) = session.player() {
            log::trace!(
                "frame {} alpha {:.2} draw at {}",
                frame,
                clock.alpha(),
                player.interpolated_pos(clock.alpha())
            );
        }
        frame += 1;
    }

    log::info!("Ran {} ticks over {} frames", session.time_ticks, frame);
    println!("{}", serde_json::to_string_pretty(&session.views())?);
    Ok(())
}
