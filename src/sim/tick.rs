//! Simulation tick
//!
//! Advances the wheel by one time delta. The order below is fixed; later steps
//! read what earlier ones wrote:
//!
//! 1. reset acceleration (every point, hub included)
//! 2. gravity
//! 3. spring forces (rim and spoke)
//! 4. point/point contacts among perimeter points, then cursor contacts
//! 5. integrate velocity
//! 6. ground bounce
//! 7. damping
//! 8. integrate position
//! 9. refresh spring display endpoints
//!
//! Measuring dt is the caller's job (see [`crate::driver`]).

use super::collision::{Cursor, resolve_cursor_collisions, resolve_point_collisions};
use super::state::Simulation;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Elapsed seconds since the previous tick
    pub dt: f64,
    /// Interaction proxy, if one is present this tick
    pub cursor: Option<Cursor>,
}

impl TickInput {
    pub fn new(dt: f64) -> Self {
        Self { dt, cursor: None }
    }

    pub fn with_cursor(dt: f64, cursor: Cursor) -> Self {
        Self {
            dt,
            cursor: Some(cursor),
        }
    }
}

/// Contacts found during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub point_contacts: usize,
    pub cursor_contacts: usize,
    pub ground_contacts: usize,
}

/// Advance the simulation by one tick
pub fn tick(sim: &mut Simulation, input: &TickInput) -> TickReport {
    // Negative or NaN dt would run the integrators backwards or poison state.
    // RawVelocity ignores dt, so even a zero-dt tick still translates points.
    let dt = if input.dt.is_finite() && input.dt > 0.0 {
        input.dt
    } else {
        0.0
    };

    let params = sim.params;
    let perimeter = sim.perimeter_count();
    let (points, springs, ground) = sim.parts_mut();
    let mut report = TickReport::default();

    for point in points.iter_mut() {
        point.reset_acceleration();
    }

    for point in points.iter_mut() {
        let weight = params.gravity * point.mass();
        point.apply_acceleration(weight);
    }

    for spring in springs.iter() {
        spring.apply_force(points);
    }

    report.point_contacts = resolve_point_collisions(points, 0..perimeter, params.penalty_gain);
    if let Some(cursor) = &input.cursor {
        report.cursor_contacts = resolve_cursor_collisions(points, cursor, params.penalty_gain);
    }

    for point in points.iter_mut() {
        point.update_velocity(dt);
    }

    for point in points.iter_mut() {
        if point.resolve_ground_collision(ground, params.restitution) {
            report.ground_contacts += 1;
        }
    }

    for point in points.iter_mut() {
        point.apply_damping(params.damping_gain, dt);
    }

    for point in points.iter_mut() {
        point.integrate_position(dt, params.velocity_epsilon, params.integration);
    }

    for spring in springs.iter_mut() {
        spring.sync_display_endpoints(points);
    }

    sim.advance_clock(dt);
    report
}
