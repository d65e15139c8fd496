//! Demo worlds
//!
//! Scenario construction sits outside the physics core; these builders exist
//! for the native driver and for tests.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::PIXELS_PER_METER;
use crate::error::Result;
use crate::sim::{Body, Boundary};

/// A world ready to hand to `Simulator::new`
#[derive(Debug, Clone)]
pub struct Scenario {
    pub bodies: Vec<Body>,
    pub boundary: Boundary,
}

/// Two unit-mass balls on crossing paths in a 100 m box
pub fn two_body() -> Result<Scenario> {
    Ok(Scenario {
        bodies: vec![
            Body::movable(DVec2::new(50.0, 10.0), DVec2::new(0.0, 10.0), 1.0, 3.0)?,
            Body::movable(DVec2::new(90.0, 50.0), DVec2::new(-10.0, 0.0), 1.0, 3.0)?,
        ],
        boundary: Boundary::new(0.0, 100.0, 0.0, 100.0)?,
    })
}

/// One large ball thrown sideways, sized to a canvas of `width`×`height` pixels
pub fn single_drop(width: u32, height: u32) -> Result<Scenario> {
    let ppm = PIXELS_PER_METER as f64;
    Ok(Scenario {
        bodies: vec![Body::movable(
            DVec2::new(25.0, 10.0),
            DVec2::new(10.0, 0.0),
            1.0,
            10.0,
        )?],
        boundary: Boundary::new(0.0, width as f64 / ppm, 0.0, height as f64 / ppm)?,
    })
}

/// `count` non-overlapping balls with random radius, mass and velocity
///
/// Placement is rejection-sampled from a seeded PCG stream, so the same seed
/// always yields the same world. Gives up on a ball after a bounded number of
/// attempts, so a crowded box may hold fewer than `count`.
pub fn scatter(seed: u64, count: usize, boundary: Boundary) -> Result<Scenario> {
    const MAX_ATTEMPTS: usize = 200;

    let mut rng = Pcg32::seed_from_u64(seed);
    let max_radius = (boundary.width().min(boundary.height()) / 10.0).max(0.1);
    let mut bodies: Vec<Body> = Vec::with_capacity(count);

    for _ in 0..count {
        for _ in 0..MAX_ATTEMPTS {
            let radius = rng.random_range(0.1 * max_radius..=max_radius);
            let position = DVec2::new(
                rng.random_range(boundary.x.min + radius..=boundary.x.max - radius),
                rng.random_range(boundary.y.min + radius..=boundary.y.max - radius),
            );
            let clear = bodies
                .iter()
                .all(|other| (other.position() - position).length() >= other.radius() + radius);
            if !clear {
                continue;
            }

            let velocity = DVec2::new(rng.random_range(-20.0..=20.0), rng.random_range(-20.0..=20.0));
            let mass = radius * radius;
            bodies.push(Body::movable(position, velocity, mass, radius)?);
            break;
        }
    }

    if bodies.len() < count {
        log::warn!("Scatter placed {} of {} bodies", bodies.len(), count);
    }
    Ok(Scenario { bodies, boundary })
}
