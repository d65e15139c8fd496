//! Continuous collision detection and response
//!
//! Every check here works on a *sweep window*: the span of time, ending now,
//! over which a body has been moving in a straight line with its current
//! velocity. Bodies are backdated to the start of that window, the exact
//! time of impact (TOI) is solved in closed form, and the post-impact state
//! is advanced through whatever time is left.
//!
//! All functions are pure. The simulator decides what to write back.

use glam::DVec2;

use super::state::{BodyState, LineSegment};
use super::vec;

/// Position and velocity at the end of a sweep window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub position: DVec2,
    pub velocity: DVec2,
}

/// How two circles respond to an impact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Both movable: elastic velocity exchange
    Elastic,
    /// First body is fixed; the second reflects off it
    FirstFixed,
    /// Second body is fixed; the first reflects off it
    SecondFixed,
}

/// Result of a circle-circle sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleImpact {
    /// Time of impact, measured from the start of the window
    pub toi: f64,
    pub first: Motion,
    pub second: Motion,
}

/// Result of a circle-segment sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentImpact {
    pub toi: f64,
    /// Circle centre at the moment of impact
    pub contact: DVec2,
    pub motion: Motion,
}

/// Result of a circle-wall sweep along one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounce {
    pub toi: f64,
    pub position: f64,
    pub velocity: f64,
}

/// Earliest time two moving circles touch
///
/// Solves `|Δp + t·Δv|² = R²`, i.e. `a·t² + b·t + c = 0` with
/// `a = |Δv|²`, `b = 2·Δp·Δv`, `c = |Δp|² − R²`.
///
/// Returns `None` when the circles have no relative motion, when they never
/// come within `R` of each other, or when the first contact lies in the past
/// (already overlapping, or already separating).
pub fn circle_circle_toi(delta_pos: DVec2, delta_vel: DVec2, combined_radius: f64) -> Option<f64> {
    let a = vec::dot(delta_vel, delta_vel);
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * vec::dot(delta_pos, delta_vel);
    let c = vec::dot(delta_pos, delta_pos) - combined_radius * combined_radius;

    let discriminant = b * b - 4.0 * a * c;
    if !(discriminant >= 0.0) {
        return None;
    }

    // a > 0, so this is the smaller root
    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (t.is_finite() && t >= 0.0).then_some(t)
}

/// Time for a circle's near edge to reach a static wall, along one axis
///
/// `None` when the velocity component is zero (the wall is never reached).
pub fn circle_wall_toi(velocity: f64, initial_pos: f64, radius: f64, wall: f64) -> Option<f64> {
    if velocity == 0.0 {
        return None;
    }
    let edge = if initial_pos < wall { radius } else { -radius };
    let t = (wall - edge - initial_pos) / velocity;
    t.is_finite().then_some(t)
}

/// Exact bounce off an axis-aligned wall
///
/// `pos`/`vel` are the state at the end of the window. The body is backdated,
/// the contact instant is found, and the remaining travel is mirrored about
/// the wall. `None` means no contact happened inside the window while
/// approaching the wall.
pub fn resolve_wall(pos: f64, vel: f64, radius: f64, wall: f64, window: f64) -> Option<AxisBounce> {
    let prev_pos = pos - vel * window;
    let approaching = if prev_pos < wall { vel > 0.0 } else { vel < 0.0 };
    if !approaching {
        return None;
    }

    let toi = circle_wall_toi(vel, prev_pos, radius, wall)?;
    if toi < 0.0 || toi > window {
        return None;
    }

    let side = if prev_pos < wall { -radius } else { radius };
    Some(AxisBounce {
        toi,
        position: wall + side - vel * (window - toi),
        velocity: -vel,
    })
}

/// Post-collision velocities for a perfectly elastic two-body impact
///
/// Applied per axis: `v1' = ((m1 − m2)·v1 + 2·m2·v2) / (m1 + m2)`.
/// Equal masses swap velocities.
pub fn elastic_velocities(m1: f64, v1: DVec2, m2: f64, v2: DVec2) -> (DVec2, DVec2) {
    let total = m1 + m2;
    let vf1 = DVec2::new(
        ((m1 - m2) * v1.x + 2.0 * m2 * v2.x) / total,
        ((m1 - m2) * v1.y + 2.0 * m2 * v2.y) / total,
    );
    let vf2 = DVec2::new(
        ((m2 - m1) * v2.x + 2.0 * m1 * v1.x) / total,
        ((m2 - m1) * v2.y + 2.0 * m1 * v1.y) / total,
    );
    (vf1, vf2)
}

/// Discrete overlap test (no sweep)
#[inline]
pub fn circles_overlap(a: DVec2, a_radius: f64, b: DVec2, b_radius: f64) -> bool {
    vec::sub(a, b).length() < a_radius + b_radius
}

/// Sweep two circles over `window` and resolve their first contact
pub fn sweep_circles(
    first: &BodyState,
    second: &BodyState,
    pairing: Pairing,
    window: f64,
) -> Option<CircleImpact> {
    // A fixed body never moves, whatever its stored velocity says
    let v1 = match pairing {
        Pairing::FirstFixed => DVec2::ZERO,
        _ => first.velocity,
    };
    let v2 = match pairing {
        Pairing::SecondFixed => DVec2::ZERO,
        _ => second.velocity,
    };

    let prev1 = vec::sub(first.position, vec::scale(v1, window));
    let prev2 = vec::sub(second.position, vec::scale(v2, window));

    let toi = circle_circle_toi(
        vec::sub(prev1, prev2),
        vec::sub(v1, v2),
        first.radius + second.radius,
    )?;
    if toi > window {
        return None;
    }

    let contact1 = vec::add(prev1, vec::scale(v1, toi));
    let contact2 = vec::add(prev2, vec::scale(v2, toi));

    let (vf1, vf2) = match pairing {
        Pairing::Elastic => elastic_velocities(first.mass, v1, second.mass, v2),
        Pairing::FirstFixed => {
            let normal = vec::normalize(vec::sub(contact2, contact1)).ok()?;
            (DVec2::ZERO, vec::reflect(v2, normal))
        }
        Pairing::SecondFixed => {
            let normal = vec::normalize(vec::sub(contact1, contact2)).ok()?;
            (vec::reflect(v1, normal), DVec2::ZERO)
        }
    };

    let remaining = window - toi;
    Some(CircleImpact {
        toi,
        first: Motion {
            position: vec::add(contact1, vec::scale(vf1, remaining)),
            velocity: vf1,
        },
        second: Motion {
            position: vec::add(contact2, vec::scale(vf2, remaining)),
            velocity: vf2,
        },
    })
}

/// Sweep a circle against a static segment and reflect it on contact
///
/// Contact is only accepted when the circle's centre at impact projects
/// inside the segment's span; a body passing beyond either end is untouched.
pub fn sweep_segment(body: &BodyState, segment: &LineSegment, window: f64) -> Option<SegmentImpact> {
    let normal = segment.normal().ok()?;
    let direction = segment.direction();
    let reach = body.radius + segment.reach();

    let velocity = body.velocity;
    let prev = vec::sub(body.position, vec::scale(velocity, window));

    let start_distance = vec::dot(normal, vec::sub(prev, segment.tail));
    let normal_speed = vec::dot(normal, velocity);
    let side = if start_distance >= 0.0 { 1.0 } else { -1.0 };
    if normal_speed == 0.0 || side * normal_speed > 0.0 {
        return None;
    }

    let toi = (side * reach - start_distance) / normal_speed;
    if !toi.is_finite() || toi < 0.0 || toi > window {
        return None;
    }

    let contact = vec::add(prev, vec::scale(velocity, toi));
    let along = vec::dot(vec::sub(contact, segment.tail), direction) / direction.length_squared();
    if !(0.0..=1.0).contains(&along) {
        return None;
    }

    let reflected = vec::reflect(velocity, normal);
    Some(SegmentImpact {
        toi,
        contact,
        motion: Motion {
            position: vec::add(contact, vec::scale(reflected, window - toi)),
            velocity: reflected,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn circle(x: f64, y: f64, vx: f64, vy: f64, mass: f64, radius: f64) -> BodyState {
        BodyState::new(DVec2::new(x, y), DVec2::new(vx, vy), mass, radius).unwrap()
    }

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_circle_toi_head_on() {
        // 20 apart, closing at 20 m/s, combined radius 6
        let toi = circle_circle_toi(DVec2::new(-20.0, 0.0), DVec2::new(20.0, 0.0), 6.0).unwrap();
        assert!((toi - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_circle_toi_negative_discriminant() {
        // Parallel tracks 10 apart never get within 4 of each other
        assert_eq!(
            circle_circle_toi(DVec2::new(10.0, 0.0), DVec2::new(0.0, 1.0), 4.0),
            None
        );
    }

    #[test]
    fn test_circle_toi_no_relative_motion() {
        assert_eq!(circle_circle_toi(DVec2::new(1.0, 0.0), DVec2::ZERO, 4.0), None);
    }

    #[test]
    fn test_circle_toi_separating_or_overlapping() {
        // Moving apart: both roots negative
        assert_eq!(
            circle_circle_toi(DVec2::new(-20.0, 0.0), DVec2::new(-5.0, 0.0), 6.0),
            None
        );
        // Already overlapping: smaller root is in the past
        assert_eq!(
            circle_circle_toi(DVec2::new(-2.0, 0.0), DVec2::new(5.0, 0.0), 6.0),
            None
        );
    }

    #[test]
    fn test_wall_toi() {
        assert_eq!(circle_wall_toi(-2.0, 5.0, 1.0, 0.0), Some(2.0));
        assert_eq!(circle_wall_toi(2.0, 5.0, 1.0, 10.0), Some(2.0));
        assert_eq!(circle_wall_toi(0.0, 5.0, 1.0, 10.0), None);
    }

    #[test]
    fn test_resolve_wall_mirrors_remaining_travel() {
        // Started at 1.5 moving -2 for 1s: ends at -0.5, touched at t=0.25
        let bounce = resolve_wall(-0.5, -2.0, 1.0, 0.0, 1.0).unwrap();
        assert!((bounce.toi - 0.25).abs() < 1e-12);
        assert!((bounce.position - 2.5).abs() < 1e-12);
        assert_eq!(bounce.velocity, 2.0);

        // Same on the far wall
        let bounce = resolve_wall(10.5, 2.0, 1.0, 10.0, 1.0).unwrap();
        assert!((bounce.position - 7.5).abs() < 1e-12);
        assert_eq!(bounce.velocity, -2.0);
    }

    #[test]
    fn test_resolve_wall_rejects_non_events() {
        // Not moving
        assert_eq!(resolve_wall(0.5, 0.0, 1.0, 0.0, 1.0), None);
        // Moving away from the wall while penetrating
        assert_eq!(resolve_wall(0.5, 3.0, 1.0, 0.0, 0.1), None);
        // Already penetrating at the start of the window
        assert_eq!(resolve_wall(0.2, -0.1, 1.0, 0.0, 1.0), None);
    }

    #[test]
    fn test_elastic_equal_mass_exchange() {
        let (vf1, vf2) = elastic_velocities(2.0, DVec2::new(3.0, -1.0), 2.0, DVec2::new(-4.0, 5.0));
        assert!(close(vf1, DVec2::new(-4.0, 5.0)));
        assert!(close(vf2, DVec2::new(3.0, -1.0)));
    }

    #[test]
    fn test_sweep_circles_elastic() {
        // End-of-window state after 1s of straight motion
        let a = circle(50.0, 50.0, 10.0, 0.0, 1.0, 3.0);
        let b = circle(50.0, 50.0, -10.0, 0.0, 1.0, 3.0);
        // a started at 40, b at 60: contact at t=0.7
        let impact = sweep_circles(&a, &b, Pairing::Elastic, 1.0).unwrap();
        assert!((impact.toi - 0.7).abs() < 1e-12);
        assert!(close(impact.first.velocity, DVec2::new(-10.0, 0.0)));
        assert!(close(impact.second.velocity, DVec2::new(10.0, 0.0)));
        assert!(close(impact.first.position, DVec2::new(44.0, 50.0)));
        assert!(close(impact.second.position, DVec2::new(56.0, 50.0)));
    }

    #[test]
    fn test_sweep_circles_outside_window() {
        let a = circle(40.0, 50.0, 10.0, 0.0, 1.0, 3.0);
        let b = circle(60.0, 50.0, -10.0, 0.0, 1.0, 3.0);
        // Backdated 0.1s the gap is still open
        assert_eq!(sweep_circles(&a, &b, Pairing::Elastic, 0.1), None);
    }

    #[test]
    fn test_sweep_circles_fixed_obstacle() {
        let mover = circle(10.0, 0.0, 10.0, 0.0, 1.0, 1.0);
        let wall = circle(5.0, 0.0, 0.0, 0.0, 100.0, 1.0);
        let impact = sweep_circles(&mover, &wall, Pairing::SecondFixed, 1.0).unwrap();
        assert!((impact.toi - 0.3).abs() < 1e-12);
        assert!(close(impact.first.velocity, DVec2::new(-10.0, 0.0)));
        assert!(close(impact.first.position, DVec2::new(-4.0, 0.0)));
        assert_eq!(impact.second.velocity, DVec2::ZERO);
        assert!(close(impact.second.position, DVec2::new(5.0, 0.0)));

        let impact = sweep_circles(&wall, &mover, Pairing::FirstFixed, 1.0).unwrap();
        assert!(close(impact.second.velocity, DVec2::new(-10.0, 0.0)));
    }

    fn floor() -> LineSegment {
        LineSegment::new(DVec2::new(0.0, 10.0), DVec2::new(20.0, 10.0), 2.0).unwrap()
    }

    #[test]
    fn test_sweep_segment_reflects() {
        let body = circle(10.0, 10.0, 0.0, 10.0, 1.0, 1.0);
        let impact = sweep_segment(&body, &floor(), 1.0).unwrap();
        assert!((impact.toi - 0.8).abs() < 1e-12);
        assert!(close(impact.contact, DVec2::new(10.0, 8.0)));
        assert!(close(impact.motion.velocity, DVec2::new(0.0, -10.0)));
        assert!(close(impact.motion.position, DVec2::new(10.0, 6.0)));
    }

    #[test]
    fn test_sweep_segment_from_other_side() {
        // Coming up from below the line
        let body = circle(10.0, 10.0, 0.0, -10.0, 1.0, 1.0);
        let impact = sweep_segment(&body, &floor(), 1.0).unwrap();
        assert!(close(impact.contact, DVec2::new(10.0, 12.0)));
        assert!(close(impact.motion.velocity, DVec2::new(0.0, 10.0)));
    }

    #[test]
    fn test_sweep_segment_outside_span_passes() {
        // Same motion, but 10 m past the tip
        let body = circle(30.0, 10.0, 0.0, 10.0, 1.0, 1.0);
        assert_eq!(sweep_segment(&body, &floor(), 1.0), None);
    }

    #[test]
    fn test_sweep_segment_parallel_or_receding() {
        let parallel = circle(10.0, 5.0, 10.0, 0.0, 1.0, 1.0);
        assert_eq!(sweep_segment(&parallel, &floor(), 1.0), None);
        let receding = circle(10.0, 0.0, 0.0, -10.0, 1.0, 1.0);
        assert_eq!(sweep_segment(&receding, &floor(), 1.0), None);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(DVec2::ZERO, 1.0, DVec2::new(1.5, 0.0), 1.0));
        assert!(!circles_overlap(DVec2::ZERO, 1.0, DVec2::new(2.0, 0.0), 1.0));
    }

    proptest! {
        #[test]
        fn elastic_conserves_momentum_and_energy(
            m1 in 0.1f64..100.0,
            m2 in 0.1f64..100.0,
            v1x in -50.0f64..50.0,
            v1y in -50.0f64..50.0,
            v2x in -50.0f64..50.0,
            v2y in -50.0f64..50.0,
        ) {
            let v1 = DVec2::new(v1x, v1y);
            let v2 = DVec2::new(v2x, v2y);
            let (vf1, vf2) = elastic_velocities(m1, v1, m2, v2);

            let p_before = v1 * m1 + v2 * m2;
            let p_after = vf1 * m1 + vf2 * m2;
            let scale = 1.0 + p_before.length();
            prop_assert!((p_before - p_after).length() <= 1e-9 * scale);

            let e_before = 0.5 * m1 * v1.length_squared() + 0.5 * m2 * v2.length_squared();
            let e_after = 0.5 * m1 * vf1.length_squared() + 0.5 * m2 * vf2.length_squared();
            prop_assert!((e_before - e_after).abs() <= 1e-9 * (1.0 + e_before));
        }

        #[test]
        fn circle_toi_is_a_touching_time(
            dx in -100.0f64..100.0,
            dy in -100.0f64..100.0,
            vx in -50.0f64..50.0,
            vy in -50.0f64..50.0,
            radius in 0.5f64..10.0,
        ) {
            let dp = DVec2::new(dx, dy);
            let dv = DVec2::new(vx, vy);
            if let Some(t) = circle_circle_toi(dp, dv, radius) {
                prop_assert!(t >= 0.0);
                let gap = (dp + dv * t).length();
                prop_assert!((gap - radius).abs() <= 1e-6 * (1.0 + dp.length()));
            }
        }
    }
}
