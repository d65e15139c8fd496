//! Vector2 helpers
//!
//! Thin value-returning functions over `glam::DVec2`. Nothing here mutates
//! its inputs.

use glam::DVec2;

use crate::error::{Error, Result};

#[inline]
pub fn add(a: DVec2, b: DVec2) -> DVec2 {
    a + b
}

#[inline]
pub fn scale(v: DVec2, s: f64) -> DVec2 {
    v * s
}

#[inline]
pub fn sub(a: DVec2, b: DVec2) -> DVec2 {
    a - b
}

/// Unit vector in the direction of `v`
pub fn normalize(v: DVec2) -> Result<DVec2> {
    let magnitude = v.length();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return Err(Error::DegenerateVector);
    }
    Ok(v / magnitude)
}

/// Perpendicular `(y, -x)`: `v` rotated a quarter turn clockwise (y-up)
#[inline]
pub fn perp(v: DVec2) -> DVec2 {
    // glam's `perp` turns the other way
    -v.perp()
}

#[inline]
pub fn dot(u: DVec2, v: DVec2) -> f64 {
    u.dot(v)
}

/// Reflect direction `d` about normal `n`
///
/// Standard reflection: d' = d - 2(d·n)n. Preserves length only when `n` is unit.
#[inline]
pub fn reflect(d: DVec2, n: DVec2) -> DVec2 {
    d - 2.0 * d.dot(n) * n
}

/// Component-wise mean, `None` for an empty slice
pub fn average(vs: &[DVec2]) -> Option<DVec2> {
    if vs.is_empty() {
        return None;
    }
    Some(vs.iter().sum::<DVec2>() / vs.len() as f64)
}
