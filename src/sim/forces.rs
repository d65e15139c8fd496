//! Force contributions
//!
//! Pure functions returning force vectors. The simulator feeds them through
//! `apply_force`, which divides by the receiving body's mass.

use glam::DVec2;

use super::state::BodyState;
use super::vec;
use crate::error::{Error, Result};

/// Uniform downward weight `(0, m·g)`; contributes a constant `(0, g)` acceleration
#[inline]
pub fn uniform_gravity(mass: f64, g: f64) -> DVec2 {
    DVec2::new(0.0, mass * g)
}

/// Newton's law of universal gravitation, magnitude only
#[inline]
pub fn universal_gravitation(g: f64, m1: f64, m2: f64, r: f64) -> f64 {
    g * m1 * m2 / (r * r)
}

/// Attraction of `body` toward `source`
///
/// Fails with `CoincidentBodies` when the centres coincide; callers decide
/// whether to skip the pair.
pub fn pairwise_gravity(g: f64, body: &BodyState, source: &BodyState) -> Result<DVec2> {
    let delta = vec::sub(source.position, body.position);
    let r = delta.length();
    if r == 0.0 {
        return Err(Error::CoincidentBodies);
    }
    let direction = vec::normalize(delta)?;
    let magnitude = universal_gravitation(g, body.mass, source.mass, r);
    Ok(vec::scale(direction, magnitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GRAVITATIONAL_CONSTANT, GRAVITY};

    fn state(x: f64, y: f64, mass: f64) -> BodyState {
        BodyState::new(DVec2::new(x, y), DVec2::ZERO, mass, 1.0).unwrap()
    }

    #[test]
    fn test_uniform_gravity_is_mass_independent() {
        for mass in [0.5, 1.0, 80.0] {
            let mut body = state(0.0, 0.0, mass);
            body.apply_force(uniform_gravity(mass, GRAVITY));
            assert!((body.acceleration.y - GRAVITY).abs() < 1e-12);
            assert_eq!(body.acceleration.x, 0.0);
        }
    }

    #[test]
    fn test_pairwise_gravity_magnitude_and_direction() {
        let body = state(0.0, 0.0, 2.0);
        let source = state(3.0, 4.0, 5.0);
        let force = pairwise_gravity(GRAVITATIONAL_CONSTANT, &body, &source).unwrap();

        let expected = GRAVITATIONAL_CONSTANT * 2.0 * 5.0 / 25.0;
        assert!((force.length() - expected).abs() < 1e-24);
        assert!((force.normalize() - DVec2::new(0.6, 0.8)).length() < 1e-12);
    }

    #[test]
    fn test_pairwise_gravity_is_symmetric() {
        let a = state(-1.0, 2.0, 3.0);
        let b = state(4.0, -6.0, 7.0);
        let on_a = pairwise_gravity(1.0, &a, &b).unwrap();
        let on_b = pairwise_gravity(1.0, &b, &a).unwrap();
        assert!((on_a + on_b).length() < 1e-15);
    }

    #[test]
    fn test_coincident_bodies() {
        let a = state(1.0, 1.0, 1.0);
        let b = state(1.0, 1.0, 1.0);
        assert!(matches!(
            pairwise_gravity(GRAVITATIONAL_CONSTANT, &a, &b),
            Err(Error::CoincidentBodies)
        ));
    }
}
