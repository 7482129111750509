#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Path Defence headlessly.

mod autopilot;
mod layout_transfer;

use std::{
    fs,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use path_defence_core::{Command, Event, RunSummary, UpgradeStat};
use path_defence_rendering::{draw_scene, AsciiCanvas, Scene, ScreenTransform};
use path_defence_system_bootstrap::Bootstrap;
use path_defence_world::{self as world, query, World};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::filter::EnvFilter;

use crate::{autopilot::Autopilot, layout_transfer::TowerLayoutSnapshot};

const AUTOPILOT_CADENCE: u64 = 20;
const WALL_CLOCK_FRAME: Duration = Duration::from_millis(16);
const MAP_CELL: f32 = 10.0;
const UPGRADE_STATS: [UpgradeStat; 3] = [UpgradeStat::Damage, UpgradeStat::Range, UpgradeStat::Speed];

#[derive(Parser, Debug)]
#[command(name = "path-defence")]
#[command(about = "Runs a Path Defence simulation without a window and reports the outcome")]
struct CliArgs {
    /// Directory holding towers.json, enemies.json and powerups.json
    #[arg(long, default_value = "data")]
    data: PathBuf,
    /// Tuning file; defaults to tuning.toml inside the data directory when present
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Fixed tick length in milliseconds; 0 follows the wall clock
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,
    /// Overrides the gameplay seed
    #[arg(long)]
    seed: Option<u64>,
    /// Lets a scripted player build towers and pick power-ups
    #[arg(long, default_value_t = false)]
    autopilot: bool,
    /// Writes the run report to this file instead of stdout
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Prints an ASCII map of the final frame
    #[arg(long, default_value_t = false)]
    map: bool,
    /// Tower layout code to build before the first tick
    #[arg(long)]
    layout: Option<String>,
    /// Viewport width in world units
    #[arg(long, default_value_t = 800.0)]
    width: f32,
    /// Viewport height in world units
    #[arg(long, default_value_t = 600.0)]
    height: f32,
}

/// Outcome written once the simulation stops.
#[derive(Debug, Serialize)]
struct RunReport {
    #[serde(flatten)]
    summary: RunSummary,
    ticks: u64,
    game_over: bool,
    towers: usize,
    layout: String,
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = CliArgs::parse();
    let mut bootstrap = match &args.tuning {
        Some(tuning) => Bootstrap::load_with_tuning(&args.data, Some(tuning.as_path())),
        None => Bootstrap::load(&args.data),
    }
    .with_context(|| format!("failed to load configuration from {}", args.data.display()))?;
    if let Some(seed) = args.seed {
        bootstrap = bootstrap.with_seed(seed);
    }

    let mut world = bootstrap.into_world();
    println!("{}", query::welcome_banner(&world));

    let layout = args
        .layout
        .as_deref()
        .map(TowerLayoutSnapshot::decode)
        .transpose()
        .context("invalid tower layout code")?;
    let (width, height) = match &layout {
        Some(layout) => (layout.width as f32, layout.height as f32),
        None => (args.width, args.height),
    };

    let mut log = Vec::new();
    world::apply(&mut world, Command::ConfigureViewport { width, height }, &mut log);
    world::apply(&mut world, Command::StartRun, &mut log);
    ensure_accepted(&log).context("failed to start the run")?;
    if let Some(layout) = &layout {
        import_layout(&mut world, layout)?;
    }

    let ticks = run(&mut world, &args)?;
    let summary = query::summary(&world);
    info!(
        ticks,
        score = summary.score,
        wave = summary.wave,
        kills = summary.kills,
        "simulation finished"
    );

    if args.map {
        println!("{}", render_map(&world)?);
    }

    let report = RunReport {
        summary,
        ticks,
        game_over: query::is_game_over(&world),
        towers: query::tower_view(&world).len(),
        layout: TowerLayoutSnapshot::capture(&world).encode()?,
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialise run report")?;
    match &args.summary {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write run report to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

/// Ticks the world until the budget runs out or the run ends, returning the ticks taken.
fn run(world: &mut World, args: &CliArgs) -> Result<u64> {
    let mut pilot = args
        .autopilot
        .then(|| Autopilot::new(query::path(world), AUTOPILOT_CADENCE));
    let fixed_dt = (args.dt_ms > 0).then(|| Duration::from_millis(args.dt_ms));
    let started = Instant::now();
    let mut previous = Duration::ZERO;
    let mut simulated = Duration::ZERO;
    let mut events = Vec::new();

    for tick in 0..args.ticks {
        if query::is_game_over(world) {
            return Ok(tick);
        }

        match pilot.as_mut() {
            Some(pilot) => pilot.act(world, tick, simulated, &mut events),
            None if query::pending_offer(world).is_some() => {
                world::apply(world, Command::DeclinePowerUps, &mut events)
            }
            None => {}
        }

        let (dt, now) = match fixed_dt {
            Some(dt) => (dt, simulated + dt),
            None => {
                thread::sleep(WALL_CLOCK_FRAME);
                let now = started.elapsed();
                (now - previous, now)
            }
        };
        previous = now;
        simulated = now;

        let first = events.len();
        world::apply(world, Command::Tick { dt, now }, &mut events);
        if let Some(pilot) = pilot.as_mut() {
            pilot.observe(&events[first..]);
        }
        for event in events.drain(..) {
            if let Event::CommandRejected { error } = event {
                warn!(%error, tick, "command rejected");
            }
        }
    }
    Ok(args.ticks)
}

/// Builds every tower of `layout` and replays its upgrades.
fn import_layout(world: &mut World, layout: &TowerLayoutSnapshot) -> Result<()> {
    for entry in &layout.towers {
        let mut events = Vec::new();
        world::apply(world, Command::SelectTowerType { kind: entry.kind.clone() }, &mut events);
        world::apply(
            world,
            Command::PlaceTower {
                kind: entry.kind.clone(),
                position: entry.position,
            },
            &mut events,
        );
        ensure_accepted(&events)
            .with_context(|| format!("layout tower `{}` could not be placed", entry.kind))?;
        let Some(tower) = events.iter().find_map(|event| match event {
            Event::TowerPlaced { tower, .. } => Some(*tower),
            _ => None,
        }) else {
            bail!("layout tower `{}` was not placed", entry.kind);
        };

        events.clear();
        for stat in UPGRADE_STATS {
            for _ in 0..entry.upgrades.get(stat) {
                world::apply(world, Command::UpgradeTower { tower, stat }, &mut events);
            }
        }
        ensure_accepted(&events)
            .with_context(|| format!("layout upgrades for tower {tower} were rejected"))?;
    }
    info!(towers = layout.towers.len(), "tower layout imported");
    Ok(())
}

fn ensure_accepted(events: &[Event]) -> Result<()> {
    match events.iter().find_map(|event| match event {
        Event::CommandRejected { error } => Some(error),
        _ => None,
    }) {
        Some(error) => Err(error.clone().into()),
        None => Ok(()),
    }
}

fn render_map(world: &World) -> Result<String> {
    let (width, height) = query::camera(world).viewport();
    let columns = (width / MAP_CELL).ceil() as usize;
    let rows = (height / MAP_CELL).ceil() as usize;
    let mut canvas = AsciiCanvas::new(columns, rows, MAP_CELL)?;

    let camera = query::camera(world);
    let transform = ScreenTransform::new(camera.origin(), camera.zoom());
    let enemies = query::enemy_view(world);
    let towers = query::tower_view(world);
    let projectiles = query::projectile_view(world);
    let particles = query::particle_view(world);
    let scene = Scene {
        path: query::path(world),
        enemies: &enemies,
        towers: &towers,
        projectiles: &projectiles,
        particles: &particles,
        selected_tower: None,
    };
    draw_scene(&mut canvas, &transform, &scene)?;
    Ok(canvas.render())
}
