//! Fixed-substep simulation driver
//!
//! One external `step(dt)` is split into `N` equal substeps. Each substep runs
//! these phases across the whole body list, in order:
//!
//! 1. force accumulation (pairwise gravity, then uniform gravity)
//! 2. velocity integration
//! 3. position integration
//! 4. pairwise collision correction
//! 5. acceleration reset
//! 6. boundary correction
//!
//! Body order is the definition order of the list and is never changed, so two
//! simulators built from the same input produce bit-identical results.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, Motion, Pairing};
use super::forces;
use super::state::{Body, BodyState, Boundary, LineSegment};
use super::vec;
use crate::error::{Error, Result};
use crate::settings::SimSettings;

/// One of the four boundary edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

/// Something that happened during the latest `step`
///
/// `toi` is measured from the start of the body's sweep window in the
/// substep where the contact occurred.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    Bodies { a: usize, b: usize, toi: f64 },
    Segment { body: usize, segment: usize, toi: f64 },
    /// `toi` is `None` when the body was clamped rather than swept
    Wall { body: usize, wall: Wall, toi: Option<f64> },
}

/// Owns the world and advances it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SimulatorSnapshot")]
pub struct Simulator {
    bodies: Vec<Body>,
    boundary: Boundary,
    settings: SimSettings,
    /// Total simulated time, after the time multiplier
    elapsed: f64,
    #[serde(skip)]
    events: Vec<CollisionEvent>,
    /// Per-body sweep window for the current substep (scratch)
    #[serde(skip)]
    windows: Vec<f64>,
}

/// Persisted part of a `Simulator`; loading rebuilds through `with_settings`
#[derive(Deserialize)]
struct SimulatorSnapshot {
    bodies: Vec<Body>,
    boundary: Boundary,
    #[serde(default)]
    settings: SimSettings,
    #[serde(default)]
    elapsed: f64,
}

impl TryFrom<SimulatorSnapshot> for Simulator {
    type Error = Error;

    fn try_from(snapshot: SimulatorSnapshot) -> Result<Self> {
        if !snapshot.elapsed.is_finite() || snapshot.elapsed < 0.0 {
            return Err(Error::InvalidSettings("elapsed time must be finite and >= 0"));
        }
        let mut sim = Self::with_settings(snapshot.bodies, snapshot.boundary, snapshot.settings)?;
        sim.elapsed = snapshot.elapsed;
        Ok(sim)
    }
}

impl Simulator {
    /// Simulator with gravity on, time multiplier 1 and the default substep count
    pub fn new(bodies: Vec<Body>, boundary: Boundary) -> Result<Self> {
        Self::with_settings(bodies, boundary, SimSettings::default())
    }

    pub fn with_settings(bodies: Vec<Body>, boundary: Boundary, settings: SimSettings) -> Result<Self> {
        settings.validate()?;
        boundary.validate()?;
        for (index, body) in bodies.iter().enumerate() {
            check_fits(index, body, &boundary)?;
        }

        log::debug!(
            "Simulator created with {} bodies, {} substeps",
            bodies.len(),
            settings.substeps
        );

        Ok(Self {
            windows: Vec::with_capacity(bodies.len()),
            bodies,
            boundary,
            settings,
            elapsed: 0.0,
            events: Vec::new(),
        })
    }

    /// Append a body between steps
    pub fn add_body(&mut self, body: Body) -> Result<()> {
        check_fits(self.bodies.len(), &body, &self.boundary)?;
        self.bodies.push(body);
        Ok(())
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Collisions resolved during the most recent `step`
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    pub fn gravity_on(&self) -> bool {
        self.settings.gravity_on
    }

    pub fn toggle_gravity(&mut self) {
        self.settings.gravity_on = !self.settings.gravity_on;
        log::info!("Gravity {}", if self.settings.gravity_on { "on" } else { "off" });
    }

    pub fn set_time_multiplier(&mut self, multiplier: f64) -> Result<()> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(Error::InvalidSettings("time multiplier must be finite and >= 0"));
        }
        self.settings.time_multiplier = multiplier;
        Ok(())
    }

    /// Total kinetic energy of movable bodies
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .filter(|b| b.is_movable())
            .filter_map(Body::state)
            .map(|s| s.kinetic_energy())
            .sum()
    }

    /// Total linear momentum of movable bodies
    pub fn momentum(&self) -> DVec2 {
        self.bodies
            .iter()
            .filter(|b| b.is_movable())
            .filter_map(Body::state)
            .fold(DVec2::ZERO, |acc, s| vec::add(acc, s.momentum()))
    }

    /// Advance the world by `dt` seconds (scaled by the time multiplier)
    pub fn step(&mut self, dt: f64) {
        self.events.clear();

        if !dt.is_finite() || dt <= 0.0 {
            log::debug!("Ignoring step with dt = {}", dt);
            return;
        }

        let substeps = self.settings.substeps.max(1);
        let h = dt * self.settings.time_multiplier / substeps as f64;
        if h <= 0.0 {
            return;
        }

        for _ in 0..substeps {
            self.substep(h);
        }
        self.elapsed += h * substeps as f64;
    }

    fn substep(&mut self, h: f64) {
        self.windows.clear();
        self.windows.resize(self.bodies.len(), h);

        self.accumulate_forces();
        for body in &mut self.bodies {
            body.update_velocity(h);
        }
        for body in &mut self.bodies {
            body.update_position(h);
        }
        self.resolve_collisions();
        for body in &mut self.bodies {
            body.reset_acceleration();
        }
        self.check_boundaries();
    }

    /// Phase 1: every source's pull, then uniform gravity
    fn accumulate_forces(&mut self) {
        let g_const = self.settings.gravitational_constant;

        for i in 0..self.bodies.len() {
            if !self.bodies[i].is_movable() {
                continue;
            }

            for j in 0..self.bodies.len() {
                if i == j || !self.bodies[j].generates_gravity() {
                    continue;
                }
                let (Some(body), Some(source)) = (self.bodies[i].state(), self.bodies[j].state())
                else {
                    continue;
                };
                match forces::pairwise_gravity(g_const, body, source) {
                    Ok(force) => self.bodies[i].apply_force(force),
                    Err(err) => log::warn!("Skipping gravity of body {} on body {}: {}", j, i, err),
                }
            }

            if self.settings.gravity_on {
                if let Some(mass) = self.bodies[i].mass() {
                    self.bodies[i].apply_force(forces::uniform_gravity(mass, self.settings.gravity));
                }
            }
        }
    }

    /// Phase 4: each unordered pair once, in definition order
    fn resolve_collisions(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                self.resolve_pair(i, j);
            }
        }
    }

    fn resolve_pair(&mut self, i: usize, j: usize) {
        match (self.bodies[i], self.bodies[j]) {
            (Body::Movable(a), Body::Movable(b)) => {
                let window = self.windows[i].min(self.windows[j]);
                if let Some(impact) = collision::sweep_circles(&a, &b, Pairing::Elastic, window) {
                    self.apply_motion(i, impact.first, window - impact.toi);
                    self.apply_motion(j, impact.second, window - impact.toi);
                    self.record(CollisionEvent::Bodies { a: i, b: j, toi: impact.toi });
                } else {
                    note_unresolved_overlap(i, &a, j, &b);
                }
            }
            (Body::Movable(a), Body::Fixed(b)) => {
                let window = self.windows[i];
                if let Some(impact) = collision::sweep_circles(&a, &b, Pairing::SecondFixed, window) {
                    self.apply_motion(i, impact.first, window - impact.toi);
                    self.record(CollisionEvent::Bodies { a: i, b: j, toi: impact.toi });
                } else {
                    note_unresolved_overlap(i, &a, j, &b);
                }
            }
            (Body::Fixed(a), Body::Movable(b)) => {
                let window = self.windows[j];
                if let Some(impact) = collision::sweep_circles(&a, &b, Pairing::FirstFixed, window) {
                    self.apply_motion(j, impact.second, window - impact.toi);
                    self.record(CollisionEvent::Bodies { a: i, b: j, toi: impact.toi });
                } else {
                    note_unresolved_overlap(i, &a, j, &b);
                }
            }
            (Body::Movable(body), Body::Segment(segment)) => {
                self.resolve_segment(i, &body, j, &segment);
            }
            (Body::Segment(segment), Body::Movable(body)) => {
                self.resolve_segment(j, &body, i, &segment);
            }
            // Nothing that can move
            _ => {}
        }
    }

    fn resolve_segment(
        &mut self,
        body_idx: usize,
        body: &BodyState,
        segment_idx: usize,
        segment: &LineSegment,
    ) {
        let window = self.windows[body_idx];
        if let Some(impact) = collision::sweep_segment(body, segment, window) {
            self.apply_motion(body_idx, impact.motion, window - impact.toi);
            self.record(CollisionEvent::Segment {
                body: body_idx,
                segment: segment_idx,
                toi: impact.toi,
            });
        }
    }

    /// Write a post-impact motion back; the body's straight-line window shrinks
    /// to the time left after the impact
    fn apply_motion(&mut self, idx: usize, motion: Motion, remaining: f64) {
        if let Some(state) = self.bodies[idx].state_mut() {
            state.position = motion.position;
            state.velocity = motion.velocity;
            self.windows[idx] = remaining;
        }
    }

    /// Phase 6: exact wall bounces, with a clamp fallback so every circle ends
    /// the substep inside the boundary
    fn check_boundaries(&mut self) {
        let boundary = self.boundary;
        for idx in 0..self.bodies.len() {
            let window = self.windows[idx];
            let Some(state) = self.bodies[idx].state_mut() else {
                continue;
            };
            let r = state.radius;
            let mut hits: [Option<(Wall, Option<f64>)>; 4] = [None; 4];

            if state.position.x - r < boundary.x.min {
                hits[0] = Some((
                    Wall::Left,
                    bounce_axis(&mut state.position.x, &mut state.velocity.x, r, boundary.x.min, window),
                ));
            }
            if state.position.x + r > boundary.x.max {
                hits[1] = Some((
                    Wall::Right,
                    bounce_axis(&mut state.position.x, &mut state.velocity.x, r, boundary.x.max, window),
                ));
            }
            if state.position.y - r < boundary.y.min {
                hits[2] = Some((
                    Wall::Top,
                    bounce_axis(&mut state.position.y, &mut state.velocity.y, r, boundary.y.min, window),
                ));
            }
            if state.position.y + r > boundary.y.max {
                hits[3] = Some((
                    Wall::Bottom,
                    bounce_axis(&mut state.position.y, &mut state.velocity.y, r, boundary.y.max, window),
                ));
            }

            // A mirrored bounce can overshoot the opposite wall when the
            // remaining travel exceeds the box
            state.position.x = state.position.x.clamp(boundary.x.min + r, boundary.x.max - r);
            state.position.y = state.position.y.clamp(boundary.y.min + r, boundary.y.max - r);

            for (wall, toi) in hits.into_iter().flatten() {
                self.record(CollisionEvent::Wall { body: idx, wall, toi });
            }
        }
    }

    fn record(&mut self, event: CollisionEvent) {
        log::debug!("{:?}", event);
        self.events.push(event);
    }
}

/// Bounce one axis off `wall`; returns the exact TOI, or `None` if the body
/// had to be clamped
fn bounce_axis(pos: &mut f64, vel: &mut f64, radius: f64, wall: f64, window: f64) -> Option<f64> {
    if let Some(bounce) = collision::resolve_wall(*pos, *vel, radius, wall, window) {
        *pos = bounce.position;
        *vel = bounce.velocity;
        return Some(bounce.toi);
    }

    // Started out of bounds or already heading back in: snap onto the wall and
    // make sure the velocity points inward
    let inside = if *pos < wall { wall + radius } else { wall - radius };
    let outward = if *pos < wall { *vel < 0.0 } else { *vel > 0.0 };
    *pos = inside;
    if outward {
        *vel = -*vel;
    }
    None
}

/// Overlapping pairs with no contact in the window are left alone
/// (they started the window already inside each other)
fn note_unresolved_overlap(i: usize, a: &BodyState, j: usize, b: &BodyState) {
    if collision::circles_overlap(a.position, a.radius, b.position, b.radius) {
        log::debug!("Bodies {} and {} overlap with no contact in this substep", i, j);
    }
}

fn check_fits(index: usize, body: &Body, boundary: &Boundary) -> Result<()> {
    if let Some(state) = body.state() {
        let diameter = 2.0 * state.radius;
        if diameter > boundary.width() || diameter > boundary.height() {
            return Err(Error::BodyDoesNotFit { index, radius: state.radius });
        }
    }
    Ok(())
}
