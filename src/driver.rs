//! Tick loop driver
//!
//! Runs the stepper on its own thread:
//!
//! ```text
//! Idle --start--> Running --stop--> Stopping --current tick returns--> Stopped
//! ```
//!
//! The stop request is a cooperative flag checked at the top of every tick, so
//! the tick in flight always completes. After each tick the driver publishes a
//! [`Snapshot`] that readers can take at any time without seeing a half-updated
//! tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::consts::*;
use crate::error::{ConfigError, DriverError};
use crate::platform::{Clock, pace};
use crate::sim::{Cursor, Simulation, Snapshot, SnapshotBuffer, TickInput, tick};

/// Ticks between periodic debug logs
const LOG_EVERY_TICKS: u64 = 1000;

/// Lifecycle of the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, not started
    Idle,
    /// Ticking
    Running,
    /// Stop requested, the last tick is finishing
    Stopping,
    /// Terminal, no further ticks
    Stopped,
}

/// Where the tick loop reads the interaction point from
pub trait CursorSource: Send {
    fn sample(&mut self) -> Option<Cursor>;
}

impl<F> CursorSource for F
where
    F: FnMut() -> Option<Cursor> + Send,
{
    fn sample(&mut self) -> Option<Cursor> {
        self()
    }
}

/// Cursor written by an input collaborator and read by the tick loop
#[derive(Debug, Clone, Default)]
pub struct SharedCursor {
    inner: Arc<Mutex<Option<Cursor>>>,
}

impl SharedCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, cursor: Cursor) {
        *self.inner.lock() = Some(cursor);
    }

    pub fn clear(&self) {
        *self.inner.lock() = None;
    }

    pub fn get(&self) -> Option<Cursor> {
        *self.inner.lock()
    }
}

impl CursorSource for SharedCursor {
    fn sample(&mut self) -> Option<Cursor> {
        self.get()
    }
}

/// Pacing and dt limits for the loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverOptions {
    /// Target tick rate; `None` ticks back to back
    pub tick_rate_hz: Option<f64>,
    /// Measured dt is clamped to this before reaching the tick
    pub max_dt: f64,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            tick_rate_hz: Some(HAPTIC_RATE_HZ),
            max_dt: MAX_TICK_DT,
        }
    }
}

impl DriverOptions {
    /// Reject a non-positive `max_dt` or tick rate
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_dt.is_finite() || self.max_dt <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_dt",
                value: self.max_dt,
            });
        }
        match self.tick_rate_hz {
            Some(hz) if !hz.is_finite() || hz <= 0.0 => Err(ConfigError::InvalidParameter {
                name: "tick_rate_hz",
                value: hz,
            }),
            _ => Ok(()),
        }
    }

    fn period(&self) -> Option<Duration> {
        self.tick_rate_hz
            .filter(|hz| hz.is_finite() && *hz > 0.0)
            .map(|hz| Duration::from_secs_f64(1.0 / hz))
    }
}

/// Everything the loop thread takes ownership of on start
struct LoopParts {
    sim: Simulation,
    clock: Box<dyn Clock>,
    cursor: Box<dyn CursorSource>,
}

/// Owns the tick thread of one simulation
pub struct SimulationDriver {
    state: Arc<Mutex<RunState>>,
    stop: Arc<AtomicBool>,
    snapshots: SnapshotBuffer,
    options: DriverOptions,
    parts: Option<LoopParts>,
    handle: Option<JoinHandle<Option<Simulation>>>,
}

impl SimulationDriver {
    pub fn new<C, S>(sim: Simulation, clock: C, cursor: S, options: DriverOptions) -> Self
    where
        C: Clock + 'static,
        S: CursorSource + 'static,
    {
        let snapshots = SnapshotBuffer::new(Snapshot::capture(&sim));
        Self {
            state: Arc::new(Mutex::new(RunState::Idle)),
            stop: Arc::new(AtomicBool::new(false)),
            snapshots,
            options,
            parts: Some(LoopParts {
                sim,
                clock: Box::new(clock),
                cursor: Box::new(cursor),
            }),
            handle: None,
        }
    }

    pub fn state(&self) -> RunState {
        *self.state.lock()
    }

    /// Handle for reading published snapshots
    pub fn snapshots(&self) -> SnapshotBuffer {
        self.snapshots.clone()
    }

    /// Spawn the tick thread (`Idle -> Running`)
    ///
    /// Invalid options are rejected with the driver still `Idle`. If the
    /// thread cannot be spawned the driver is `Stopped` and [`Self::join`]
    /// still returns the untouched simulation.
    pub fn start(&mut self) -> Result<(), DriverError> {
        self.options.validate()?;
        {
            let mut state = self.state.lock();
            if *state != RunState::Idle {
                return Err(DriverError::AlreadyStarted);
            }
            *state = RunState::Running;
        }
        let Some(parts) = self.parts.take() else {
            return Err(DriverError::AlreadyStarted);
        };

        // The thread takes the parts out of the slot; a failed spawn leaves them
        let slot = Arc::new(Mutex::new(Some(parts)));
        let thread_slot = Arc::clone(&slot);
        let state = Arc::clone(&self.state);
        let stop = Arc::clone(&self.stop);
        let snapshots = self.snapshots.clone();
        let options = self.options;

        let spawned = std::thread::Builder::new()
            .name("spring-wheel-tick".into())
            .spawn(move || {
                let parts = thread_slot.lock().take();
                parts.map(|parts| run_loop(parts, options, &stop, &state, &snapshots))
            });

        match spawned {
            Ok(handle) => {
                log::info!("Simulation driver started ({:?})", self.options.tick_rate_hz);
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to spawn simulation thread: {e}");
                self.parts = slot.lock().take();
                *self.state.lock() = RunState::Stopped;
                Err(DriverError::Spawn(e))
            }
        }
    }

    /// Request a cooperative stop (`Running -> Stopping`)
    ///
    /// A driver that never started goes straight to `Stopped`.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        match *state {
            RunState::Idle => *state = RunState::Stopped,
            RunState::Running => {
                *state = RunState::Stopping;
                self.stop.store(true, Ordering::Release);
            }
            RunState::Stopping | RunState::Stopped => {}
        }
    }

    /// Wait for the tick thread and take the simulation back
    pub fn join(&mut self) -> Result<Simulation, DriverError> {
        if let Some(handle) = self.handle.take() {
            let sim = handle.join().map_err(|_| DriverError::ThreadPanicked)?;
            *self.state.lock() = RunState::Stopped;
            return sim.ok_or(DriverError::AlreadyJoined);
        }
        match self.parts.take() {
            Some(parts) => {
                *self.state.lock() = RunState::Stopped;
                Ok(parts.sim)
            }
            None => Err(DriverError::AlreadyJoined),
        }
    }

    pub fn stop_and_join(&mut self) -> Result<Simulation, DriverError> {
        self.stop();
        self.join()
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.stop();
            let _ = handle.join();
        }
    }
}

fn run_loop(
    parts: LoopParts,
    options: DriverOptions,
    stop: &AtomicBool,
    state: &Mutex<RunState>,
    snapshots: &SnapshotBuffer,
) -> Simulation {
    let LoopParts {
        mut sim,
        mut clock,
        mut cursor,
    } = parts;
    let period = options.period();
    let mut warned_non_finite = false;

    clock.reset();
    while !stop.load(Ordering::Acquire) {
        let started = Instant::now();

        let mut dt = clock.lap();
        if dt > options.max_dt {
            log::warn!("Tick dt {:.4}s clamped to {:.4}s", dt, options.max_dt);
            dt = options.max_dt;
        }

        let input = TickInput {
            dt,
            cursor: cursor.sample(),
        };
        tick(&mut sim, &input);
        snapshots.publish(Snapshot::capture(&sim));

        if !warned_non_finite && !sim.is_finite() {
            log::warn!("Non-finite point state at tick {}", sim.tick_count());
            warned_non_finite = true;
        }
        if sim.tick_count() % LOG_EVERY_TICKS == 0 {
            log::debug!(
                "tick {}: dt={:.6}s elapsed={:.3}s",
                sim.tick_count(),
                dt,
                sim.elapsed()
            );
        }

        if let Some(period) = period {
            pace(started, period);
        }
    }

    *state.lock() = RunState::Stopped;
    log::info!(
        "Simulation driver stopped after {} ticks ({:.3}s simulated)",
        sim.tick_count(),
        sim.elapsed()
    );
    sim
}
