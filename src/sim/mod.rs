//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - dt comes from the caller, never from a clock
//! - Stable iteration order (by point index)
//! - No rendering, threading or device dependencies

pub mod collision;
pub mod params;
pub mod point;
pub mod snapshot;
pub mod spring;
pub mod state;
pub mod tick;
pub mod topology;

pub use collision::{
    Cursor, Ground, GroundPlane, penalty_force, resolve_cursor_collisions, resolve_point_collisions,
    spheres_overlap,
};
pub use params::{PhysicsParams, PositionIntegration};
pub use point::{MassPoint, PointId};
pub use snapshot::{PointView, Snapshot, SnapshotBuffer, SpringView};
pub use spring::{Spring, SpringKind};
pub use state::Simulation;
pub use tick::{TickInput, TickReport, tick};
pub use topology::{RingConfig, Topology};
