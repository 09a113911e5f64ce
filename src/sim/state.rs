//! Simulation context
//!
//! The [`Simulation`] exclusively owns the points and springs of one wheel,
//! the physics parameters and the ground it stands on. Only the stepper
//! mutates it; everything else reads through accessors or snapshots.

use super::collision::Ground;
use super::params::PhysicsParams;
use super::point::{MassPoint, PointId};
use super::spring::Spring;
use super::topology::Topology;
use crate::error::ConfigError;

/// One wheel and everything a tick needs
pub struct Simulation {
    points: Vec<MassPoint>,
    springs: Vec<Spring>,
    perimeter_count: usize,
    hub: Option<PointId>,
    pub(crate) params: PhysicsParams,
    ground: Box<dyn Ground>,
    tick_count: u64,
    elapsed: f64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("points", &self.points.len())
            .field("springs", &self.springs.len())
            .field("hub", &self.hub)
            .field("tick_count", &self.tick_count)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Take ownership of a built topology
    pub fn new<G: Ground + 'static>(
        topology: Topology,
        params: PhysicsParams,
        ground: G,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let Topology {
            points,
            springs,
            perimeter_count,
            hub,
        } = topology;
        Ok(Self {
            points,
            springs,
            perimeter_count,
            hub,
            params,
            ground: Box::new(ground),
            tick_count: 0,
            elapsed: 0.0,
        })
    }

    pub fn points(&self) -> &[MassPoint] {
        &self.points
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn point(&self, id: PointId) -> &MassPoint {
        &self.points[id.index()]
    }

    /// Perimeter points (the hub excluded)
    pub fn perimeter(&self) -> &[MassPoint] {
        &self.points[..self.perimeter_count]
    }

    pub fn perimeter_count(&self) -> usize {
        self.perimeter_count
    }

    pub fn hub(&self) -> Option<PointId> {
        self.hub
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    pub fn ground(&self) -> &dyn Ground {
        self.ground.as_ref()
    }

    /// Completed ticks
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Sum of all tick dts (seconds)
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Whether every point position and velocity is finite
    pub fn is_finite(&self) -> bool {
        self.points
            .iter()
            .all(|p| p.position.is_finite() && p.velocity.is_finite())
    }

    /// Current length of every rim spring
    pub fn rim_lengths(&self) -> Vec<f64> {
        self.springs
            .iter()
            .filter(|s| s.kind() == super::spring::SpringKind::Rim)
            .map(|s| s.length(&self.points))
            .collect()
    }

    /// Split borrow used by the stepper
    pub(crate) fn parts_mut(&mut self) -> (&mut [MassPoint], &mut [Spring], &dyn Ground) {
        (&mut self.points, &mut self.springs, self.ground.as_ref())
    }

    pub(crate) fn advance_clock(&mut self, dt: f64) {
        self.tick_count += 1;
        self.elapsed += dt;
    }
}
