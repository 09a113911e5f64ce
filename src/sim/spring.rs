//! Hookean springs between two points
//!
//! Springs never own their endpoints; they hold [`PointId`] handles into the
//! point container of the simulation. There is no damping term on the spring
//! itself, all damping is global per point.

use glam::DVec3;

use super::point::{MassPoint, PointId};

/// Below this distance two endpoints are treated as coincident (no direction)
const MIN_SPRING_LENGTH: f64 = 1e-12;

/// Role of a spring in the wheel topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpringKind {
    /// Joins two adjacent perimeter points
    Rim,
    /// Joins the hub to a perimeter point
    Spoke,
}

/// A spring with fixed rest length and stiffness
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    a: PointId,
    b: PointId,
    rest_length: f64,
    stiffness: f64,
    kind: SpringKind,
    /// Rendered by display collaborators
    pub visible: bool,
    /// Endpoint positions as of the last completed tick
    display: [DVec3; 2],
}

impl Spring {
    /// Create a spring between two distinct points
    ///
    /// Display endpoints start at the points' current positions.
    pub fn new(
        points: &[MassPoint],
        a: PointId,
        b: PointId,
        rest_length: f64,
        stiffness: f64,
        kind: SpringKind,
    ) -> Self {
        debug_assert_ne!(a, b, "spring endpoints must be distinct");
        Self {
            a,
            b,
            rest_length,
            stiffness,
            kind,
            visible: kind == SpringKind::Rim,
            display: [points[a.index()].position, points[b.index()].position],
        }
    }

    #[inline]
    pub fn endpoints(&self) -> (PointId, PointId) {
        (self.a, self.b)
    }

    #[inline]
    pub fn rest_length(&self) -> f64 {
        self.rest_length
    }

    #[inline]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    pub fn kind(&self) -> SpringKind {
        self.kind
    }

    /// Endpoint positions handed to the renderer
    #[inline]
    pub fn display_endpoints(&self) -> [DVec3; 2] {
        self.display
    }

    /// Current distance between the endpoints
    pub fn length(&self, points: &[MassPoint]) -> f64 {
        (points[self.b.index()].position - points[self.a.index()].position).length()
    }

    /// Force this spring exerts on endpoint `a` (endpoint `b` gets the negation)
    ///
    /// Positive when stretched (pulls `a` toward `b`), pushes `a` away when
    /// compressed. Coincident endpoints have no axis and yield zero.
    pub fn force_on_a(&self, points: &[MassPoint]) -> DVec3 {
        let delta = points[self.b.index()].position - points[self.a.index()].position;
        let distance = delta.length();
        if distance < MIN_SPRING_LENGTH {
            return DVec3::ZERO;
        }
        let stretch = distance - self.rest_length;
        if stretch == 0.0 {
            return DVec3::ZERO;
        }
        (delta / distance) * (self.stiffness * stretch)
    }

    /// Apply equal and opposite forces to both endpoints
    pub fn apply_force(&self, points: &mut [MassPoint]) {
        let force = self.force_on_a(points);
        if force == DVec3::ZERO {
            return;
        }
        points[self.a.index()].apply_acceleration(force);
        points[self.b.index()].apply_acceleration(-force);
    }

    /// Copy the endpoints' positions into the display segment
    pub fn sync_display_endpoints(&mut self, points: &[MassPoint]) {
        self.display = [points[self.a.index()].position, points[self.b.index()].position];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(distance: f64) -> Vec<MassPoint> {
        vec![
            MassPoint::new(DVec3::ZERO, 2.0, 0.05),
            MassPoint::new(DVec3::new(distance, 0.0, 0.0), 2.0, 0.05),
        ]
    }

    fn spring(points: &[MassPoint], rest: f64, k: f64) -> Spring {
        Spring::new(points, PointId(0), PointId(1), rest, k, SpringKind::Rim)
    }

    #[test]
    fn test_rest_length_gives_no_force() {
        let mut points = pair(0.4);
        let s = spring(&points, 0.4, 100.0);
        s.apply_force(&mut points);
        assert_eq!(points[0].acceleration(), DVec3::ZERO);
        assert_eq!(points[1].acceleration(), DVec3::ZERO);
    }

    #[test]
    fn test_stretched_spring_pulls_together() {
        let mut points = pair(0.5);
        let s = spring(&points, 0.4, 100.0);
        s.apply_force(&mut points);

        let f_a = points[0].acceleration() * points[0].mass();
        let f_b = points[1].acceleration() * points[1].mass();
        // Equal and opposite, magnitude k * (d - L) = 10
        assert!((f_a + f_b).length() < 1e-9);
        assert!((f_a.length() - 10.0).abs() < 1e-9);
        // a is pulled toward b (+x)
        assert!(f_a.x > 0.0 && f_b.x < 0.0);
    }

    #[test]
    fn test_compressed_spring_pushes_apart() {
        let mut points = pair(0.3);
        let s = spring(&points, 0.4, 100.0);
        s.apply_force(&mut points);

        let f_a = points[0].acceleration() * points[0].mass();
        assert!((f_a.length() - 10.0).abs() < 1e-9);
        assert!(f_a.x < 0.0);
        assert!(points[1].acceleration().x > 0.0);
    }

    #[test]
    fn test_coincident_endpoints_yield_no_force() {
        let mut points = pair(0.0);
        let s = spring(&points, 0.4, 100.0);
        s.apply_force(&mut points);
        assert!(points[0].acceleration().is_finite());
        assert_eq!(points[0].acceleration(), DVec3::ZERO);
        assert_eq!(points[1].acceleration(), DVec3::ZERO);
    }

    #[test]
    fn test_sync_display_endpoints() {
        let mut points = pair(0.4);
        let mut s = spring(&points, 0.4, 100.0);
        points[1].position = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(s.display_endpoints()[1], DVec3::new(0.4, 0.0, 0.0));

        s.sync_display_endpoints(&points);
        assert_eq!(s.display_endpoints(), [DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_spoke_hidden_by_default() {
        let points = pair(0.4);
        let s = Spring::new(&points, PointId(0), PointId(1), 0.4, 1.0, SpringKind::Spoke);
        assert!(!s.visible);
        assert!(spring(&points, 0.4, 1.0).visible);
    }
}
