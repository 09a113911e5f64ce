//! Ring + hub topology construction
//!
//! N perimeter points are joined in a cycle by N rim springs. An invisible hub
//! at the centroid is joined to every perimeter point by a spoke whose rest
//! length is the circumradius of the regular N-gon with edge L, which
//! pre-tensions the rim into a wheel that resists collapsing.
//!
//! Runs once; the resulting point and spring counts never change.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::point::{MassPoint, PointId};
use super::spring::{Spring, SpringKind};
use crate::consts::*;
use crate::error::ConfigError;
use crate::{centroid, regular_polygon_circumradius, ring_position};

/// Construction parameters for a wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Perimeter point count (3..=6)
    pub perimeter_count: usize,
    /// Rim spring rest length
    pub rim_length: f64,
    /// Stiffness shared by rim and spoke springs
    pub stiffness: f64,
    /// Mass of every point, hub included
    pub mass: f64,
    /// Collision radius of every point, hub included
    pub radius: f64,
    /// Add the hub and its spokes (false gives the bare polygon)
    pub hub: bool,
    /// Center of the default regular placement
    pub center: DVec3,
    /// Explicit perimeter positions, overriding the regular placement
    pub initial_positions: Option<Vec<DVec3>>,
    /// Max horizontal offset applied to each perimeter point
    pub jitter: f64,
    /// Seed for the jitter RNG
    pub seed: u64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            perimeter_count: MIN_PERIMETER_POINTS,
            rim_length: DEFAULT_RIM_LENGTH,
            stiffness: DEFAULT_STIFFNESS,
            mass: DEFAULT_MASS,
            radius: DEFAULT_POINT_RADIUS,
            hub: true,
            center: DVec3::new(0.0, 0.3, 0.4),
            initial_positions: None,
            jitter: 0.0,
            seed: 0,
        }
    }
}

/// Built points and springs, ready to hand to a simulation
#[derive(Debug, Clone)]
pub struct Topology {
    /// Perimeter points first (indices 0..N), then the hub if any
    pub points: Vec<MassPoint>,
    /// Rim springs first (rim i joins i and i+1 mod N), then spokes
    pub springs: Vec<Spring>,
    pub perimeter_count: usize,
    pub hub: Option<PointId>,
}

impl Topology {
    /// Rest length of a spoke for `sides` rim springs of length `rim_length`
    pub fn spoke_rest_length(rim_length: f64, sides: usize) -> f64 {
        regular_polygon_circumradius(rim_length, sides)
    }

    pub fn rim_springs(&self) -> impl Iterator<Item = &Spring> {
        self.springs.iter().filter(|s| s.kind() == SpringKind::Rim)
    }

    pub fn spoke_springs(&self) -> impl Iterator<Item = &Spring> {
        self.springs.iter().filter(|s| s.kind() == SpringKind::Spoke)
    }
}

impl RingConfig {
    /// Config for an `n`-gon with every other field at its default
    pub fn with_perimeter(perimeter_count: usize) -> Self {
        Self {
            perimeter_count,
            ..Default::default()
        }
    }

    /// Check the configuration without building anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.perimeter_count;
        if !(MIN_PERIMETER_POINTS..=MAX_PERIMETER_POINTS).contains(&n) {
            return Err(ConfigError::PerimeterCount {
                count: n,
                min: MIN_PERIMETER_POINTS,
                max: MAX_PERIMETER_POINTS,
            });
        }
        if !self.rim_length.is_finite() || self.rim_length <= 0.0 {
            return Err(ConfigError::DegenerateRestLength(self.rim_length));
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(ConfigError::InvalidMass(self.mass));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if !self.stiffness.is_finite() || self.stiffness < 0.0 {
            return Err(ConfigError::InvalidStiffness(self.stiffness));
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "jitter",
                value: self.jitter,
            });
        }
        if !self.center.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "center",
                value: self.center.length(),
            });
        }
        if let Some(positions) = &self.initial_positions {
            if positions.len() != n {
                return Err(ConfigError::InitialPositionCount {
                    expected: n,
                    got: positions.len(),
                });
            }
            if let Some(bad) = positions.iter().find(|p| !p.is_finite()) {
                return Err(ConfigError::InvalidParameter {
                    name: "initial_positions",
                    value: bad.length(),
                });
            }
        }
        Ok(())
    }

    /// Perimeter positions before jitter
    fn base_positions(&self) -> Vec<DVec3> {
        if let Some(positions) = &self.initial_positions {
            return positions.clone();
        }
        let n = self.perimeter_count;
        let circumradius = regular_polygon_circumradius(self.rim_length, n);
        let step = std::f64::consts::TAU / n as f64;
        (0..n)
            .map(|i| ring_position(self.center, circumradius, i as f64 * step))
            .collect()
    }

    /// Validate and build the wheel
    pub fn build(&self) -> Result<Topology, ConfigError> {
        self.validate()?;
        let n = self.perimeter_count;

        let mut positions = self.base_positions();
        if self.jitter > 0.0 {
            let mut rng = Pcg32::seed_from_u64(self.seed);
            for p in &mut positions {
                p.x += rng.random_range(-self.jitter..=self.jitter);
                p.y += rng.random_range(-self.jitter..=self.jitter);
            }
        }

        let mut points: Vec<MassPoint> = positions
            .iter()
            .map(|&p| MassPoint::new(p, self.mass, self.radius))
            .collect();

        let hub = if self.hub {
            let mut hub_point = MassPoint::new(centroid(&positions), self.mass, self.radius);
            hub_point.visible = false;
            points.push(hub_point);
            Some(PointId(n))
        } else {
            None
        };

        let mut springs = Vec::with_capacity(if hub.is_some() { 2 * n } else { n });
        for i in 0..n {
            springs.push(Spring::new(
                &points,
                PointId(i),
                PointId((i + 1) % n),
                self.rim_length,
                self.stiffness,
                SpringKind::Rim,
            ));
        }
        if let Some(hub_id) = hub {
            let spoke_length = Topology::spoke_rest_length(self.rim_length, n);
            for i in 0..n {
                springs.push(Spring::new(
                    &points,
                    hub_id,
                    PointId(i),
                    spoke_length,
                    self.stiffness,
                    SpringKind::Spoke,
                ));
            }
        }

        log::info!(
            "Built wheel: {} perimeter points, hub={}, {} springs (rim {:.4}, spoke {:.4})",
            n,
            hub.is_some(),
            springs.len(),
            self.rim_length,
            Topology::spoke_rest_length(self.rim_length, n)
        );

        Ok(Topology {
            points,
            springs,
            perimeter_count: n,
            hub,
        })
    }
}
