//! Point masses
//!
//! A point accumulates `force / mass` into its acceleration during a tick,
//! then integrates velocity and position. The acceleration only ever holds
//! contributions from the current tick.

use glam::DVec3;

use super::collision::Ground;
use super::params::PositionIntegration;
use crate::consts::*;

/// Handle of a point inside a [`super::Simulation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(pub usize);

impl PointId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A simulated point mass with a collision radius
#[derive(Debug, Clone, PartialEq)]
pub struct MassPoint {
    pub position: DVec3,
    pub velocity: DVec3,
    acceleration: DVec3,
    mass: f64,
    radius: f64,
    /// Rendered by display collaborators (the hub is not)
    pub visible: bool,
}

impl MassPoint {
    pub fn new(position: DVec3, mass: f64, radius: f64) -> Self {
        Self {
            position,
            velocity: DVec3::ZERO,
            acceleration: DVec3::ZERO,
            mass,
            radius,
            visible: true,
        }
    }

    /// A point with the default heavy mass and radius
    pub fn with_defaults(position: DVec3) -> Self {
        Self::new(position, DEFAULT_MASS, DEFAULT_POINT_RADIUS)
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Acceleration accumulated so far in the current tick
    #[inline]
    pub fn acceleration(&self) -> DVec3 {
        self.acceleration
    }

    /// Accumulate `force / mass`
    ///
    /// No bounds checking: callers must not pass NaN or infinite forces.
    #[inline]
    pub fn apply_acceleration(&mut self, force: DVec3) {
        self.acceleration += force / self.mass;
    }

    /// Zero the accumulated acceleration (first step of every tick)
    #[inline]
    pub fn reset_acceleration(&mut self) {
        self.acceleration = DVec3::ZERO;
    }

    /// `velocity += dt * acceleration`
    #[inline]
    pub fn update_velocity(&mut self, dt: f64) {
        self.velocity += dt * self.acceleration;
    }

    /// Scale velocity by `1 - gain * dt`, clamped to [0, 1]
    ///
    /// The clamp keeps an oversized tick from inverting the velocity.
    pub fn apply_damping(&mut self, gain: f64, dt: f64) {
        let factor = (1.0 - gain * dt).clamp(0.0, 1.0);
        self.velocity *= factor;
    }

    /// Bounce off the ground: `vz = -restitution * vz` while penetrating
    ///
    /// Velocity-only response; a residual penetration may persist for a tick.
    /// Returns true if the velocity was reflected.
    pub fn resolve_ground_collision<G: Ground + ?Sized>(&mut self, ground: &G, restitution: f64) -> bool {
        if self.velocity.z < 0.0 && ground.penetrates(self.position, self.radius) {
            self.velocity.z *= -restitution;
            return true;
        }
        false
    }

    /// Advance the position from the velocity
    ///
    /// Speeds at or below `epsilon` leave the point where it is.
    pub fn integrate_position(&mut self, dt: f64, epsilon: f64, mode: PositionIntegration) {
        if self.velocity.length() <= epsilon {
            return;
        }
        match mode {
            PositionIntegration::RawVelocity => self.position += self.velocity,
            PositionIntegration::TimeScaled => self.position += self.velocity * dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::GroundPlane;

    fn approx(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-12
    }

    #[test]
    fn test_apply_acceleration_divides_by_mass() {
        let mut p = MassPoint::new(DVec3::ZERO, 4.0, 0.05);
        p.reset_acceleration();
        p.apply_acceleration(DVec3::new(8.0, -4.0, 2.0));
        assert!(approx(p.acceleration(), DVec3::new(2.0, -1.0, 0.5)));

        // Additive across calls
        p.apply_acceleration(DVec3::new(4.0, 0.0, 0.0));
        assert!(approx(p.acceleration(), DVec3::new(3.0, -1.0, 0.5)));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut p = MassPoint::with_defaults(DVec3::ZERO);
        p.apply_acceleration(DVec3::ONE);
        p.reset_acceleration();
        assert_eq!(p.acceleration(), DVec3::ZERO);
        p.reset_acceleration();
        assert_eq!(p.acceleration(), DVec3::ZERO);
    }

    #[test]
    fn test_update_velocity_zero_dt_is_noop() {
        let mut p = MassPoint::new(DVec3::ZERO, 1.0, 0.05);
        p.velocity = DVec3::new(1.0, 2.0, 3.0);
        p.apply_acceleration(DVec3::splat(100.0));
        p.update_velocity(0.0);
        assert_eq!(p.velocity, DVec3::new(1.0, 2.0, 3.0));

        p.update_velocity(0.5);
        assert!(approx(p.velocity, DVec3::new(51.0, 52.0, 53.0)));
    }

    #[test]
    fn test_damping_scales_velocity() {
        let mut p = MassPoint::with_defaults(DVec3::ZERO);
        p.velocity = DVec3::new(1.0, -2.0, 0.5);
        p.apply_damping(0.6, 0.1);
        assert!(approx(p.velocity, DVec3::new(0.94, -1.88, 0.47)));
    }

    #[test]
    fn test_damping_never_inverts_sign() {
        let mut p = MassPoint::with_defaults(DVec3::ZERO);
        p.velocity = DVec3::new(1.0, -2.0, 3.0);
        p.apply_damping(0.6, 10.0);
        assert_eq!(p.velocity, DVec3::ZERO);
        assert!(p.velocity.x >= 0.0 && p.velocity.z >= 0.0);
    }

    #[test]
    fn test_ground_collision_reflects_vertical_velocity() {
        let ground = GroundPlane::infinite(0.0);
        let mut p = MassPoint::new(DVec3::new(0.0, 0.0, 0.01), 1.0, 0.05);
        p.velocity = DVec3::new(0.3, -0.2, -2.0);

        assert!(p.resolve_ground_collision(&ground, 0.9));
        assert!(approx(p.velocity, DVec3::new(0.3, -0.2, 1.8)));
    }

    #[test]
    fn test_ground_collision_ignores_rising_point() {
        let ground = GroundPlane::infinite(0.0);
        let mut p = MassPoint::new(DVec3::new(0.0, 0.0, 0.01), 1.0, 0.05);
        p.velocity = DVec3::new(0.0, 0.0, 1.0);

        assert!(!p.resolve_ground_collision(&ground, 0.9));
        assert_eq!(p.velocity.z, 1.0);
    }

    #[test]
    fn test_ground_collision_miss_above_plane() {
        let ground = GroundPlane::infinite(0.0);
        let mut p = MassPoint::new(DVec3::new(0.0, 0.0, 1.0), 1.0, 0.05);
        p.velocity = DVec3::new(0.0, 0.0, -1.0);

        assert!(!p.resolve_ground_collision(&ground, 0.9));
        assert_eq!(p.velocity.z, -1.0);
    }

    #[test]
    fn test_integrate_raw_velocity() {
        let mut p = MassPoint::with_defaults(DVec3::ZERO);
        p.velocity = DVec3::new(0.1, 0.0, -0.2);
        p.integrate_position(0.001, VELOCITY_EPSILON, PositionIntegration::RawVelocity);
        assert!(approx(p.position, DVec3::new(0.1, 0.0, -0.2)));
    }

    #[test]
    fn test_integrate_time_scaled() {
        let mut p = MassPoint::with_defaults(DVec3::ZERO);
        p.velocity = DVec3::new(1.0, 0.0, -2.0);
        p.integrate_position(0.01, VELOCITY_EPSILON, PositionIntegration::TimeScaled);
        assert!(approx(p.position, DVec3::new(0.01, 0.0, -0.02)));
    }

    #[test]
    fn test_integrate_skips_tiny_velocity() {
        let mut p = MassPoint::with_defaults(DVec3::new(1.0, 1.0, 1.0));
        p.velocity = DVec3::new(1e-9, 0.0, 0.0);
        p.integrate_position(1.0, VELOCITY_EPSILON, PositionIntegration::RawVelocity);
        assert_eq!(p.position, DVec3::new(1.0, 1.0, 1.0));
    }
}
