//! Bodies, colliders and the world boundary
//!
//! Everything the simulator owns and mutates lives here. Constructors reject
//! bad input eagerly so a step never runs into NaNs from a zero mass or an
//! inverted boundary.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::vec;
use crate::error::{Axis, Error, Result};

/// Kinematic state shared by movable and fixed bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBodyState")]
pub struct BodyState {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Accumulated within one substep only
    #[serde(default)]
    pub acceleration: DVec2,
    pub mass: f64,
    pub radius: f64,
    /// Other bodies are attracted toward this one
    #[serde(default)]
    pub generates_gravity: bool,
}

impl BodyState {
    pub fn new(position: DVec2, velocity: DVec2, mass: f64, radius: f64) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidMass(mass));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidRadius(radius));
        }
        if !position.is_finite() || !velocity.is_finite() {
            return Err(Error::InvalidVector);
        }
        Ok(Self {
            position,
            velocity,
            acceleration: DVec2::ZERO,
            mass,
            radius,
            generates_gravity: false,
        })
    }

    pub fn reset_acceleration(&mut self) {
        self.acceleration = DVec2::ZERO;
    }

    pub fn apply_force(&mut self, force: DVec2) {
        self.acceleration = vec::add(self.acceleration, vec::scale(force, 1.0 / self.mass));
    }

    pub fn update_velocity(&mut self, dt: f64) {
        self.velocity = vec::add(self.velocity, vec::scale(self.acceleration, dt));
    }

    pub fn update_position(&mut self, dt: f64) {
        self.position = vec::add(self.position, vec::scale(self.velocity, dt));
    }

    /// Semi-implicit Euler: velocity first so position sees the new velocity
    pub fn update(&mut self, dt: f64) {
        self.update_velocity(dt);
        self.update_position(dt);
        self.reset_acceleration();
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn momentum(&self) -> DVec2 {
        vec::scale(self.velocity, self.mass)
    }
}

/// A static line collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLineSegment")]
pub struct LineSegment {
    pub tail: DVec2,
    pub tip: DVec2,
    /// Full thickness; the collision reach is half of it
    pub width: f64,
}

impl LineSegment {
    pub fn new(tail: DVec2, tip: DVec2, width: f64) -> Result<Self> {
        if !tail.is_finite() || !tip.is_finite() {
            return Err(Error::InvalidVector);
        }
        if tail == tip {
            return Err(Error::DegenerateSegment);
        }
        if !width.is_finite() || width < 0.0 {
            return Err(Error::InvalidRadius(width));
        }
        Ok(Self { tail, tip, width })
    }

    #[inline]
    pub fn reach(&self) -> f64 {
        self.width / 2.0
    }

    #[inline]
    pub fn direction(&self) -> DVec2 {
        vec::sub(self.tip, self.tail)
    }

    pub fn midpoint(&self) -> DVec2 {
        vec::scale(vec::add(self.tail, self.tip), 0.5)
    }

    /// Unit normal of the supporting line
    pub fn normal(&self) -> Result<DVec2> {
        vec::normalize(vec::perp(self.direction()))
    }
}

/// Anything the simulator can hold
///
/// Fixed bodies and segments answer every integration call as a no-op, so the
/// simulator can drive the whole list uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBody")]
pub enum Body {
    Movable(BodyState),
    Fixed(BodyState),
    Segment(LineSegment),
}

impl Body {
    pub fn movable(position: DVec2, velocity: DVec2, mass: f64, radius: f64) -> Result<Self> {
        BodyState::new(position, velocity, mass, radius).map(Body::Movable)
    }

    /// A fixed body never moves, so it has no velocity
    pub fn fixed(position: DVec2, mass: f64, radius: f64) -> Result<Self> {
        BodyState::new(position, DVec2::ZERO, mass, radius).map(Body::Fixed)
    }

    pub fn segment(tail: DVec2, tip: DVec2, width: f64) -> Result<Self> {
        LineSegment::new(tail, tip, width).map(Body::Segment)
    }

    /// Mark this body as a gravity source (ignored for segments)
    pub fn with_gravity_source(mut self, generates_gravity: bool) -> Self {
        match &mut self {
            Body::Movable(state) | Body::Fixed(state) => state.generates_gravity = generates_gravity,
            Body::Segment(_) => {}
        }
        self
    }

    pub fn is_movable(&self) -> bool {
        matches!(self, Body::Movable(_))
    }

    /// Circle state for movable and fixed bodies
    pub fn state(&self) -> Option<&BodyState> {
        match self {
            Body::Movable(state) | Body::Fixed(state) => Some(state),
            Body::Segment(_) => None,
        }
    }

    /// Mutable state, only for bodies that may change
    pub fn state_mut(&mut self) -> Option<&mut BodyState> {
        match self {
            Body::Movable(state) => Some(state),
            Body::Fixed(_) | Body::Segment(_) => None,
        }
    }

    pub fn position(&self) -> DVec2 {
        match self {
            Body::Movable(state) | Body::Fixed(state) => state.position,
            Body::Segment(segment) => segment.midpoint(),
        }
    }

    pub fn velocity(&self) -> DVec2 {
        match self {
            Body::Movable(state) => state.velocity,
            Body::Fixed(_) | Body::Segment(_) => DVec2::ZERO,
        }
    }

    pub fn radius(&self) -> f64 {
        match self {
            Body::Movable(state) | Body::Fixed(state) => state.radius,
            Body::Segment(segment) => segment.reach(),
        }
    }

    pub fn mass(&self) -> Option<f64> {
        self.state().map(|state| state.mass)
    }

    pub fn generates_gravity(&self) -> bool {
        self.state().is_some_and(|state| state.generates_gravity)
    }

    pub fn reset_acceleration(&mut self) {
        if let Some(state) = self.state_mut() {
            state.reset_acceleration();
        }
    }

    pub fn apply_force(&mut self, force: DVec2) {
        if let Some(state) = self.state_mut() {
            state.apply_force(force);
        }
    }

    pub fn update_velocity(&mut self, dt: f64) {
        if let Some(state) = self.state_mut() {
            state.update_velocity(dt);
        }
    }

    pub fn update_position(&mut self, dt: f64) {
        if let Some(state) = self.state_mut() {
            state.update_position(dt);
        }
    }

    pub fn update(&mut self, dt: f64) {
        if let Some(state) = self.state_mut() {
            state.update(dt);
        }
    }
}

/// Closed interval on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

/// Axis-aligned world rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoundary")]
pub struct Boundary {
    pub x: Range,
    pub y: Range,
}

impl Boundary {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        check_range(Axis::X, x_min, x_max)?;
        check_range(Axis::Y, y_min, y_max)?;
        Ok(Self {
            x: Range { min: x_min, max: x_max },
            y: Range { min: y_min, max: y_max },
        })
    }

    pub fn width(&self) -> f64 {
        self.x.max - self.x.min
    }

    pub fn height(&self) -> f64 {
        self.y.max - self.y.min
    }

    /// Whether a circle lies fully inside (touching counts)
    pub fn contains_circle(&self, center: DVec2, radius: f64) -> bool {
        center.x - radius >= self.x.min
            && center.x + radius <= self.x.max
            && center.y - radius >= self.y.min
            && center.y + radius <= self.y.max
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_range(Axis::X, self.x.min, self.x.max)?;
        check_range(Axis::Y, self.y.min, self.y.max)
    }
}

fn check_range(axis: Axis, min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(Error::InvalidBoundary { axis, min, max });
    }
    Ok(())
}

// Wire shapes for snapshots. Deserializing goes through these so a loaded
// world passes the same checks as one built in code.

#[derive(Deserialize)]
struct RawBodyState {
    position: DVec2,
    velocity: DVec2,
    #[serde(default)]
    acceleration: DVec2,
    mass: f64,
    radius: f64,
    #[serde(default)]
    generates_gravity: bool,
}

impl TryFrom<RawBodyState> for BodyState {
    type Error = Error;

    fn try_from(raw: RawBodyState) -> Result<Self> {
        if !raw.acceleration.is_finite() {
            return Err(Error::InvalidVector);
        }
        let mut state = BodyState::new(raw.position, raw.velocity, raw.mass, raw.radius)?;
        state.acceleration = raw.acceleration;
        state.generates_gravity = raw.generates_gravity;
        Ok(state)
    }
}

#[derive(Deserialize)]
struct RawLineSegment {
    tail: DVec2,
    tip: DVec2,
    width: f64,
}

impl TryFrom<RawLineSegment> for LineSegment {
    type Error = Error;

    fn try_from(raw: RawLineSegment) -> Result<Self> {
        LineSegment::new(raw.tail, raw.tip, raw.width)
    }
}

#[derive(Deserialize)]
enum RawBody {
    Movable(BodyState),
    Fixed(BodyState),
    Segment(LineSegment),
}

impl TryFrom<RawBody> for Body {
    type Error = Error;

    fn try_from(raw: RawBody) -> Result<Self> {
        match raw {
            RawBody::Movable(state) => Ok(Body::Movable(state)),
            // Same rule as `Body::fixed`: a stored velocity is dropped
            RawBody::Fixed(state) => Ok(Body::fixed(state.position, state.mass, state.radius)?
                .with_gravity_source(state.generates_gravity)),
            RawBody::Segment(segment) => Ok(Body::Segment(segment)),
        }
    }
}

#[derive(Deserialize)]
struct RawBoundary {
    x: Range,
    y: Range,
}

impl TryFrom<RawBoundary> for Boundary {
    type Error = Error;

    fn try_from(raw: RawBoundary) -> Result<Self> {
        Boundary::new(raw.x.min, raw.x.max, raw.y.min, raw.y.max)
    }
}
