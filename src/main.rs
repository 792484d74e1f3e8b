use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use smoke_sim::{Fluid, FluidParams, Obstacle, Scene};

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum CliScene {
    Tank,
    #[value(name = "wind-tunnel")]
    WindTunnel,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum SnapshotField {
    Smoke,
    Pressure,
}

/// Headless driver for the smoke solver
#[derive(Parser, Debug)]
#[command(name = "smoke-sim", version, about)]
struct Cli {
    #[arg(long, value_enum, default_value_t = CliScene::WindTunnel)]
    scene: CliScene,

    /// Interior cells along x
    #[arg(long, default_value_t = 160)]
    width: usize,

    /// Interior cells along y
    #[arg(long, default_value_t = 90)]
    height: usize,

    #[arg(long, default_value_t = 300)]
    steps: usize,

    /// Pressure sweeps per step
    #[arg(long, default_value_t = 40)]
    iterations: usize,

    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Wind tunnel inflow speed
    #[arg(long, default_value_t = 2.0)]
    inflow: f32,

    /// Gravity magnitude. Defaults to the config value in the tank and 0 in the wind tunnel.
    #[arg(long)]
    gravity: Option<f32>,

    /// Radius of a resting circular obstacle, in grid units. 0 disables it.
    #[arg(long, default_value_t = 0.0)]
    obstacle_radius: f32,

    /// JSON file with solver parameters; missing keys keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the final field as a binary PGM image
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = SnapshotField::Smoke)]
    field: SnapshotField,

    /// Value mapped to white in the snapshot
    #[arg(long)]
    scale: Option<f32>,

    /// Log stats every N steps (0 logs only the final state)
    #[arg(long, default_value_t = 50)]
    report_every: usize,
}

fn load_params(path: Option<&Path>) -> Result<FluidParams> {
    let params = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => FluidParams::default(),
    };
    Ok(params.with_env_overrides())
}

fn write_pgm(path: &Path, fluid: &Fluid, field: SnapshotField, scale: f32) -> Result<()> {
    let grid = fluid.grid();
    let values = match field {
        SnapshotField::Smoke => fluid.smoke_grid().normalized(scale),
        SnapshotField::Pressure => fluid.pressure_grid().normalized(scale),
    };
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write!(out, "P5\n{} {}\n255\n", grid.width(), grid.height())?;
    let mut row = Vec::with_capacity(grid.width());
    // PGM rows run top to bottom; j grows upward.
    for j in (1..=grid.height()).rev() {
        row.clear();
        for i in 1..=grid.width() {
            row.push((values[grid.idx(i, j)] * 255.0).round() as u8);
        }
        out.write_all(&row)?;
    }
    out.flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let params = load_params(cli.config.as_deref())?;
    let scene = match cli.scene {
        CliScene::Tank => Scene::Tank,
        CliScene::WindTunnel => Scene::WindTunnel { inflow: cli.inflow },
    };
    anyhow::ensure!(
        cli.dt.is_finite() && cli.dt >= 0.0,
        "dt must be finite and >= 0, got {}",
        cli.dt
    );

    let mut fluid = Fluid::new(cli.width, cli.height, params).context("building solver")?;
    scene.setup(&mut fluid);
    let gravity = cli.gravity.unwrap_or(match scene {
        Scene::Tank => fluid.params().gravity,
        Scene::WindTunnel { .. } => 0.0,
    });
    if cli.obstacle_radius > 0.0 {
        let h = fluid.grid().h();
        let center = (
            (fluid.width() as f32 * 0.35 + 1.0) * h,
            (fluid.height() as f32 * 0.5 + 1.0) * h,
        );
        let obstacle = Obstacle::new(center, cli.obstacle_radius * h);
        obstacle.stamp(&mut fluid, scene);
    }
    log::info!(
        "{:?} {}x{}: {} steps, dt={}, {} sweeps, gravity={}",
        cli.scene,
        cli.width,
        cli.height,
        cli.steps,
        cli.dt,
        cli.iterations,
        gravity
    );

    let start = Instant::now();
    for step in 1..=cli.steps {
        scene.apply_sources(&mut fluid);
        fluid.advance(cli.dt, cli.iterations, gravity);
        if cli.report_every > 0 && step % cli.report_every == 0 {
            log::info!("step {step}: {}", fluid.stats());
        }
    }
    let elapsed = start.elapsed();
    log::info!(
        "done in {:.3?} ({:.3?}/step): {}",
        elapsed,
        elapsed / cli.steps.max(1) as u32,
        fluid.stats()
    );

    if let Some(path) = cli.snapshot.as_deref() {
        let scale = cli.scale.unwrap_or(match cli.field {
            SnapshotField::Smoke => 1.0,
            SnapshotField::Pressure => 10.0,
        });
        write_pgm(path, &fluid, cli.field, scale)?;
        log::info!("wrote {:?} snapshot to {}", cli.field, path.display());
    }
    Ok(())
}
