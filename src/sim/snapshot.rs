//! Per-tick snapshots for readers outside the tick thread
//!
//! The stepper builds a complete [`Snapshot`] after a tick and swaps it into
//! the [`SnapshotBuffer`] under one lock. Readers clone the latest snapshot,
//! so they only ever see whole ticks.

use std::sync::Arc;

use glam::DVec3;
use parking_lot::Mutex;

use super::point::PointId;
use super::spring::SpringKind;
use super::state::Simulation;

/// Read-only view of one point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointView {
    pub position: DVec3,
    pub velocity: DVec3,
    pub radius: f64,
    pub visible: bool,
}

/// Read-only view of one spring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringView {
    pub a: PointId,
    pub b: PointId,
    pub kind: SpringKind,
    pub endpoints: [DVec3; 2],
    pub visible: bool,
}

/// State of the whole wheel after a completed tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Ticks completed when the snapshot was taken
    pub tick: u64,
    /// Simulated seconds (sum of tick dts)
    pub elapsed: f64,
    pub points: Vec<PointView>,
    pub springs: Vec<SpringView>,
}

impl Snapshot {
    pub fn capture(sim: &Simulation) -> Self {
        Self {
            tick: sim.tick_count(),
            elapsed: sim.elapsed(),
            points: sim
                .points()
                .iter()
                .map(|p| PointView {
                    position: p.position,
                    velocity: p.velocity,
                    radius: p.radius(),
                    visible: p.visible,
                })
                .collect(),
            springs: sim
                .springs()
                .iter()
                .map(|s| {
                    let (a, b) = s.endpoints();
                    SpringView {
                        a,
                        b,
                        kind: s.kind(),
                        endpoints: s.display_endpoints(),
                        visible: s.visible,
                    }
                })
                .collect(),
        }
    }

    /// Largest point speed in the snapshot
    pub fn max_speed(&self) -> f64 {
        self.points.iter().map(|p| p.velocity.length()).fold(0.0, f64::max)
    }
}

/// Latest published snapshot, shared between the stepper and readers
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuffer {
    inner: Arc<Mutex<Snapshot>>,
}

impl SnapshotBuffer {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Replace the published snapshot
    pub fn publish(&self, snapshot: Snapshot) {
        *self.inner.lock() = snapshot;
    }

    /// Clone of the latest snapshot
    pub fn latest(&self) -> Snapshot {
        self.inner.lock().clone()
    }

    /// Tick number of the latest snapshot without cloning it
    pub fn latest_tick(&self) -> u64 {
        self.inner.lock().tick
    }
}
