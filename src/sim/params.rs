//! Tunable physics parameters
//!
//! Everything the tick reads besides the topology itself. Defaults reproduce
//! the constants of the haptic demo; position integration is time-scaled.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// How a point's position advances from its velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionIntegration {
    /// Translate by `velocity * dt`
    #[default]
    TimeScaled,
    /// Translate by the raw velocity vector every tick, ignoring dt
    ///
    /// Kept for parity with the haptic demo. A falling wheel never comes to
    /// rest in this mode: each tick moves a point by a full second of travel.
    RawVelocity,
}

/// Physics constants applied every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Gravity acceleration, applied independently of mass
    pub gravity: DVec3,
    /// Velocity damping gain (1/s)
    pub damping_gain: f64,
    /// Vertical restitution on ground contact
    pub restitution: f64,
    /// Penalty gain for point/point and point/cursor contact
    pub penalty_gain: f64,
    /// Speed below which a point is not moved
    pub velocity_epsilon: f64,
    /// Position integration scheme
    pub integration: PositionIntegration,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            damping_gain: DAMPING_GAIN,
            restitution: GROUND_RESTITUTION,
            penalty_gain: PENALTY_GAIN,
            velocity_epsilon: VELOCITY_EPSILON,
            integration: PositionIntegration::TimeScaled,
        }
    }
}

impl PhysicsParams {
    /// Reject non-finite or out-of-range values before the loop starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "gravity",
                value: self.gravity.length(),
            });
        }
        let checks = [
            ("damping_gain", self.damping_gain),
            ("restitution", self.restitution),
            ("penalty_gain", self.penalty_gain),
            ("velocity_epsilon", self.velocity_epsilon),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        if self.restitution > 1.0 {
            return Err(ConfigError::InvalidParameter {
                name: "restitution",
                value: self.restitution,
            });
        }
        Ok(())
    }
}
