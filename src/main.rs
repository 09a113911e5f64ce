//! Spring Wheel entry point
//!
//! Builds the wheel from settings, runs the tick loop on its own thread and
//! plays the render collaborator: it reads snapshots at display rate while a
//! scripted cursor sweeps back and forth through the wheel.
//!
//! Usage: `spring-wheel [settings.json] [seconds]`

use std::time::{Duration, Instant};

use glam::DVec3;

use spring_wheel::platform::{MonotonicClock, pace};
use spring_wheel::sim::{Cursor, Snapshot};
use spring_wheel::{Settings, SharedCursor, SimulationDriver, centroid};

/// Display frame period (~60 Hz)
const FRAME: Duration = Duration::from_millis(16);
const DEFAULT_RUN_SECONDS: f64 = 5.0;
/// Half width of the cursor sweep
const SWEEP_AMPLITUDE: f64 = 0.3;

fn main() {
    env_logger::init();
    log::info!("Spring Wheel starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let seconds = match args.next() {
        Some(s) => s.parse::<f64>()?,
        None => DEFAULT_RUN_SECONDS,
    };

    let sim = settings.build_simulation()?;
    let cursor = SharedCursor::new();
    let mut driver = SimulationDriver::new(
        sim,
        MonotonicClock::new(),
        cursor.clone(),
        settings.driver_options(),
    );
    let snapshots = driver.snapshots();
    driver.start()?;
    log::info!("Spring Wheel running for {seconds:.1}s");

    let started = Instant::now();
    let mut last_report = 0;
    while started.elapsed().as_secs_f64() < seconds {
        let frame_start = Instant::now();
        let t = started.elapsed().as_secs_f64();
        let snap = snapshots.latest();

        // Sweep across the wheel's current center
        let center = wheel_center(&snap);
        let sweep = DVec3::new(SWEEP_AMPLITUDE * (t * 1.5).sin(), 0.0, 0.0);
        cursor.set(Cursor::new(center + sweep, settings.cursor_radius));

        let second = t as u64;
        if second > last_report {
            last_report = second;
            log::info!(
                "t={t:.1}s tick={} center=({:.3}, {:.3}, {:.3}) max speed={:.4}",
                snap.tick,
                center.x,
                center.y,
                center.z,
                snap.max_speed()
            );
        }

        pace(frame_start, FRAME);
    }

    cursor.clear();
    let sim = driver.stop_and_join()?;

    println!("\nRan {} ticks ({:.3}s simulated)", sim.tick_count(), sim.elapsed());
    for (i, length) in sim.rim_lengths().iter().enumerate() {
        println!("  rim spring {i}: length {length:.4}");
    }
    if sim.is_finite() {
        println!("✓ Simulation state finite");
    } else {
        println!("✗ Simulation state contains non-finite values");
    }
    Ok(())
}

/// Centroid of the visible points of a snapshot
fn wheel_center(snap: &Snapshot) -> DVec3 {
    let visible: Vec<DVec3> = snap
        .points
        .iter()
        .filter(|p| p.visible)
        .map(|p| p.position)
        .collect();
    centroid(&visible)
}
