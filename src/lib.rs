//! Spring Wheel - a real-time mass-spring-damper wheel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (points, springs, collisions, tick)
//! - `driver`: Tick loop thread with cooperative stop and snapshot publishing
//! - `platform`: Timing sources for the tick loop
//! - `settings`: Data-driven configuration loaded from JSON
//! - `error`: Configuration, settings and driver errors

pub mod driver;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use driver::{CursorSource, RunState, SharedCursor, SimulationDriver};
pub use error::{ConfigError, DriverError, SettingsError};
pub use settings::{Settings, ShapePreset};

use glam::DVec3;

/// Simulation configuration constants
pub mod consts {
    use glam::DVec3;

    /// Gravity acceleration (z is up)
    pub const GRAVITY: DVec3 = DVec3::new(0.0, 0.0, -9.81);
    /// Global velocity damping (1/s)
    pub const DAMPING_GAIN: f64 = 0.6;
    /// Vertical restitution on ground contact
    pub const GROUND_RESTITUTION: f64 = 0.9;
    /// Penalty gain for point-vs-point and point-vs-cursor contact
    pub const PENALTY_GAIN: f64 = 500.0;
    /// Speeds at or below this do not move a point (floating-point jitter)
    pub const VELOCITY_EPSILON: f64 = 1e-7;

    /// Point defaults - heavy so forces give small, stable displacements
    pub const DEFAULT_MASS: f64 = 100_000.0;
    pub const DEFAULT_POINT_RADIUS: f64 = 0.05;

    /// Spring defaults
    pub const DEFAULT_STIFFNESS: f64 = 100.0;
    pub const DEFAULT_RIM_LENGTH: f64 = 0.4;

    /// Perimeter point count range (inclusive)
    pub const MIN_PERIMETER_POINTS: usize = 3;
    pub const MAX_PERIMETER_POINTS: usize = 6;

    /// Haptic loop rate
    pub const HAPTIC_RATE_HZ: f64 = 1000.0;
    /// Largest measured dt handed to a tick (stalls, debugger pauses)
    pub const MAX_TICK_DT: f64 = 0.1;

    /// Interaction proxy radius
    pub const DEFAULT_CURSOR_RADIUS: f64 = 0.03;

    /// Ground quad under the wheel: 2x2 at z = -0.5
    pub const DEFAULT_GROUND_HEIGHT: f64 = -0.5;
    pub const DEFAULT_GROUND_HALF_EXTENT: f64 = 1.0;
}

/// Circumradius of a regular polygon with `sides` edges of length `edge`
///
/// This is the spoke rest length: `L / (2 sin(π / N))`.
#[inline]
pub fn regular_polygon_circumradius(edge: f64, sides: usize) -> f64 {
    edge / (2.0 * (std::f64::consts::PI / sides as f64).sin())
}

/// Point on a horizontal circle around `center` at angle `theta`
#[inline]
pub fn ring_position(center: DVec3, radius: f64, theta: f64) -> DVec3 {
    center + DVec3::new(radius * theta.cos(), radius * theta.sin(), 0.0)
}

/// Mean of a set of positions (zero for an empty set)
pub fn centroid(positions: &[DVec3]) -> DVec3 {
    if positions.is_empty() {
        return DVec3::ZERO;
    }
    positions.iter().copied().sum::<DVec3>() / positions.len() as f64
}
