//! Track Racer headless driver
//!
//! Loads a track and sprite, holds the throttle for a number of ticks and
//! prints a JSON telemetry line every second of simulated time. Windowing,
//! keyboard handling and drawing belong to a front end, not this binary.

use std::error::Error;
use std::process::ExitCode;

use track_racer::Settings;
use track_racer::sim::{Session, TickInput};

/// Ticks per simulated second
const FPS: u64 = 60;
const DEFAULT_TICKS: u64 = 10 * FPS;

const USAGE: &str = "usage: track-racer <track-image> <sprite-image> [settings.json] [ticks]";

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (track, sprite) = match (args.first(), args.get(1)) {
        (Some(t), Some(s)) => (t, s),
        _ => return Err(USAGE.into()),
    };
    let settings = match args.get(2) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let ticks = match args.get(3) {
        Some(n) => n.parse::<u64>().map_err(|e| format!("invalid tick count {n:?}: {e}"))?,
        None => DEFAULT_TICKS,
    };

    log::info!("Track Racer (headless) starting...");
    let mut session = Session::new(track, sprite, settings)?;

    let throttle = TickInput {
        accelerate: true,
        ..Default::default()
    };
    let restart = TickInput {
        restart: true,
        ..Default::default()
    };

    for _ in 0..ticks {
        let input = if session.vehicle().state().is_alive() {
            &throttle
        } else {
            log::info!("Off track after {:.0} px", session.vehicle().state().distance_traveled());
            &restart
        };
        session.step(input);

        if session.tick_count() % FPS == 0 {
            println!("{}", serde_json::to_string(&session.telemetry())?);
        }
    }

    let telemetry = session.telemetry();
    log::info!(
        "Finished {} ticks: {} at {:.0} px",
        telemetry.tick,
        telemetry.status(),
        telemetry.distance
    );
    Ok(())
}
