//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed substeps only
//! - Stable iteration order (definition order of the body list)
//! - No rendering or platform dependencies

pub mod collision;
pub mod forces;
pub mod state;
pub mod tick;
pub mod vec;

pub use collision::{
    AxisBounce, CircleImpact, Motion, Pairing, SegmentImpact, circle_circle_toi, circle_wall_toi,
    circles_overlap, elastic_velocities, resolve_wall, sweep_circles, sweep_segment,
};
pub use forces::{pairwise_gravity, uniform_gravity, universal_gravitation};
pub use state::{Body, BodyState, Boundary, LineSegment, Range};
pub use tick::{CollisionEvent, Simulator, Wall};
