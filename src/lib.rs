//! toi2d - deterministic 2D rigid-body core
//!
//! Core modules:
//! - `sim`: Vector math, bodies, forces, time-of-impact collisions and the substep loop
//! - `renderer`: Draw-list extraction for an external rendering layer
//! - `settings`: Serializable simulation settings
//! - `scenario`: Demo worlds (not part of the physics core)

pub mod error;
pub mod renderer;
pub mod scenario;
pub mod settings;
pub mod sim;

pub use error::{Axis, Error, Result};
pub use settings::SimSettings;
pub use sim::{Body, BodyState, Boundary, LineSegment, Simulator};

/// Simulation configuration constants
pub mod consts {
    /// Fixed substeps per external tick
    pub const SUBSTEPS: u32 = 6;
    /// Uniform gravity acceleration (m/s², +y points down)
    pub const GRAVITY: f64 = 9.8;
    /// Newtonian gravitational constant
    pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-11;

    /// Render scale used by the demo driver
    pub const PIXELS_PER_METER: f32 = 10.0;
}
