//! Sweep demo
//!
//! Loads a scenario file (RON or TOML), sweeps every mover against the
//! placed shapes and logs the nearest contact of each.
//!
//! ```text
//! sweep_app [scenario.ron] [--dump-state out.ron]
//! ```

mod scenario;

use scenario::{run, ShapeSpec, SweepScenario};
use thiserror::Error;
use world_collision::{foundation::logging, prelude::*};

#[derive(Error, Debug)]
enum AppError {
    #[error("failed to load scenario: {0}")]
    Config(#[from] ConfigError),

    #[error("sweep failed: {0}")]
    Collision(#[from] CollisionError),

    #[error("failed to write shape state: {0}")]
    State(#[from] StateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing value for {0}")]
    MissingArgument(&'static str),
}

struct Args {
    scenario: Option<String>,
    dump_state: Option<String>,
}

fn parse_args() -> Result<Args, AppError> {
    let mut args = Args {
        scenario: None,
        dump_state: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--dump-state" {
            args.dump_state = Some(iter.next().ok_or(AppError::MissingArgument("--dump-state"))?);
        } else {
            args.scenario = Some(arg);
        }
    }
    Ok(args)
}

fn load_scenario(path: Option<&str>) -> Result<SweepScenario, AppError> {
    let scenario = match path {
        Some(path) => {
            log::info!("Loading scenario from {}", path);
            SweepScenario::load_from_file(path)?
        }
        None => {
            log::info!("No scenario given, using the built-in drop test");
            SweepScenario::default()
        }
    };
    scenario.settings.validate()?;
    Ok(scenario)
}

fn dump_state(shapes: &[ShapeSpec], path: &str) -> Result<(), AppError> {
    let mut file = Record::new();
    for spec in shapes {
        let (shape, _) = spec.build();
        shape.put_state(&mut file);
    }
    std::fs::write(path, file.to_ron()?)?;
    log::info!("Wrote state of {} shape(s) to {}", shapes.len(), path);
    Ok(())
}

fn main() -> Result<(), AppError> {
    logging::init_with_default("info");

    let args = parse_args()?;
    let scenario = load_scenario(args.scenario.as_deref())?;
    log::info!(
        "Sweeping {} mover(s) against {} shape(s)",
        scenario.movers.len(),
        scenario.shapes.len()
    );

    for report in run(&scenario)? {
        match (report.time_of_impact, report.contact) {
            (Some(t), Some(point)) => log::info!(
                "{}: contact at t = {:.4}, point ({:.3}, {:.3}, {:.3})",
                report.mover,
                t,
                point.x,
                point.y,
                point.z
            ),
            _ => log::info!("{}: path is clear", report.mover),
        }
    }

    if let Some(path) = args.dump_state.as_deref() {
        dump_state(&scenario.shapes, path)?;
    }

    Ok(())
}
