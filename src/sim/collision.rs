//! Collision detection and response
//!
//! Contacts are resolved with penalty forces rather than a constraint solve:
//! an overlapping pair each receives `(own - other) * gain` through the
//! regular force accumulation, so no separate solver pass is needed.
//!
//! The point/point scan is a full O(N²) pass over every unordered pair. That
//! is fine for the 3..=6 perimeter points a wheel has; a larger point set
//! would need a spatial index (uniform grid or BVH) behind the same
//! `resolve_point_collisions` entry point.

use std::ops::Range;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::point::MassPoint;

/// Collision surface the points can bounce on
pub trait Ground: Send + Sync {
    /// Whether a sphere at `position` with `radius` penetrates the surface
    fn penetrates(&self, position: DVec3, radius: f64) -> bool;
}

/// Horizontal plane at `z = height`, optionally bounded to a square
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPlane {
    pub height: f64,
    /// Half side length of the square around the origin; `None` is unbounded
    #[serde(default)]
    pub half_extent: Option<f64>,
}

impl GroundPlane {
    pub fn new(height: f64, half_extent: f64) -> Self {
        Self {
            height,
            half_extent: Some(half_extent),
        }
    }

    pub fn infinite(height: f64) -> Self {
        Self {
            height,
            half_extent: None,
        }
    }

    /// Whether a point lies over the plane's footprint
    #[inline]
    pub fn covers(&self, position: DVec3) -> bool {
        match self.half_extent {
            Some(h) => position.x.abs() <= h && position.y.abs() <= h,
            None => true,
        }
    }
}

impl Ground for GroundPlane {
    fn penetrates(&self, position: DVec3, radius: f64) -> bool {
        position.z - radius < self.height && self.covers(position)
    }
}

/// External interaction proxy (haptic cursor)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub position: DVec3,
    pub radius: f64,
}

impl Cursor {
    pub fn new(position: DVec3, radius: f64) -> Self {
        Self { position, radius }
    }
}

/// Whether two spheres overlap
///
/// A non-positive (or NaN) combined reach never overlaps.
#[inline]
pub fn spheres_overlap(a: DVec3, radius_a: f64, b: DVec3, radius_b: f64) -> bool {
    let reach = radius_a + radius_b;
    if reach.is_nan() || reach <= 0.0 {
        return false;
    }
    a.distance_squared(b) < reach * reach
}

/// Penalty force pushing `own` away from `other`
///
/// Coincident centers have no separating axis and produce zero.
#[inline]
pub fn penalty_force(own: DVec3, other: DVec3, gain: f64) -> DVec3 {
    (own - other) * gain
}

/// Penalty response for every overlapping pair of points in `range`
///
/// Returns the number of contacts found.
pub fn resolve_point_collisions(points: &mut [MassPoint], range: Range<usize>, gain: f64) -> usize {
    let mut contacts = 0;
    for i in range.clone() {
        for j in (i + 1)..range.end {
            let (a, b) = (&points[i], &points[j]);
            if !spheres_overlap(a.position, a.radius(), b.position, b.radius()) {
                continue;
            }
            let force = penalty_force(a.position, b.position, gain);
            points[i].apply_acceleration(force);
            points[j].apply_acceleration(-force);
            contacts += 1;
        }
    }
    contacts
}

/// Penalty response between every point and the cursor
///
/// Only the points are pushed; the cursor is an external proxy.
pub fn resolve_cursor_collisions(points: &mut [MassPoint], cursor: &Cursor, gain: f64) -> usize {
    let mut contacts = 0;
    for point in points.iter_mut() {
        if spheres_overlap(point.position, point.radius(), cursor.position, cursor.radius) {
            point.apply_acceleration(penalty_force(point.position, cursor.position, gain));
            contacts += 1;
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_at(x: f64, y: f64, z: f64) -> MassPoint {
        MassPoint::new(DVec3::new(x, y, z), 1.0, 0.05)
    }

    #[test]
    fn test_overlapping_points_pushed_apart() {
        let mut points = vec![point_at(0.0, 0.0, 0.0), point_at(0.06, 0.0, 0.0)];
        let contacts = resolve_point_collisions(&mut points, 0..2, 500.0);
        assert_eq!(contacts, 1);

        let a0 = points[0].acceleration();
        let a1 = points[1].acceleration();
        // Along the connecting line, away from each other
        assert!(a0.x < 0.0 && a1.x > 0.0);
        assert_eq!(a0.y, 0.0);
        assert_eq!(a0.z, 0.0);
        assert!((a0.x + 30.0).abs() < 1e-9);
        assert!((a0 + a1).length() < 1e-12);
    }

    #[test]
    fn test_separated_points_untouched() {
        let mut points = vec![point_at(0.0, 0.0, 0.0), point_at(0.2, 0.0, 0.0)];
        assert_eq!(resolve_point_collisions(&mut points, 0..2, 500.0), 0);
        assert_eq!(points[0].acceleration(), DVec3::ZERO);
    }

    #[test]
    fn test_range_excludes_points() {
        // Third point overlaps the second but sits outside the scanned range
        let mut points = vec![
            point_at(0.0, 0.0, 0.0),
            point_at(1.0, 0.0, 0.0),
            point_at(1.01, 0.0, 0.0),
        ];
        assert_eq!(resolve_point_collisions(&mut points, 0..2, 500.0), 0);
        assert_eq!(resolve_point_collisions(&mut points, 0..3, 500.0), 1);
    }

    #[test]
    fn test_coincident_points_stay_finite() {
        let mut points = vec![point_at(0.5, 0.5, 0.5), point_at(0.5, 0.5, 0.5)];
        assert_eq!(resolve_point_collisions(&mut points, 0..2, 500.0), 1);
        assert!(points[0].acceleration().is_finite());
        assert_eq!(points[0].acceleration(), DVec3::ZERO);
    }

    #[test]
    fn test_cursor_pushes_points_away() {
        let mut points = vec![point_at(0.0, 0.0, 0.0), point_at(0.0, 1.0, 0.0)];
        let cursor = Cursor::new(DVec3::new(0.0, 0.0, 0.05), 0.03);
        assert_eq!(resolve_cursor_collisions(&mut points, &cursor, 500.0), 1);
        // Cursor is above the first point, so it is pushed down
        assert!(points[0].acceleration().z < 0.0);
        assert_eq!(points[1].acceleration(), DVec3::ZERO);
    }

    #[test]
    fn test_negative_cursor_radius_never_touches() {
        // Reach of -0.15 must not square into a positive overlap distance
        let mut points = vec![point_at(0.0, 0.0, 0.0)];
        let cursor = Cursor::new(DVec3::new(0.1, 0.0, 0.0), -0.2);
        assert_eq!(resolve_cursor_collisions(&mut points, &cursor, 500.0), 0);
        assert_eq!(points[0].acceleration(), DVec3::ZERO);
        assert!(!spheres_overlap(DVec3::ZERO, 0.0, DVec3::ZERO, 0.0));
        assert!(!spheres_overlap(DVec3::ZERO, f64::NAN, DVec3::ZERO, 0.05));
    }

    #[test]
    fn test_ground_plane_penetration() {
        let ground = GroundPlane::new(-0.5, 1.0);
        assert!(ground.penetrates(DVec3::new(0.0, 0.0, -0.46), 0.05));
        assert!(!ground.penetrates(DVec3::new(0.0, 0.0, -0.44), 0.05));
        // Outside the footprint there is nothing to hit
        assert!(!ground.penetrates(DVec3::new(1.5, 0.0, -0.6), 0.05));
        assert!(GroundPlane::infinite(-0.5).penetrates(DVec3::new(1.5, 0.0, -0.6), 0.05));
    }
}
