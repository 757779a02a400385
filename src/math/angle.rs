//! Angle normalization and comparison.
//!
//! Every ordering decision in the engine runs on angles in `[0, 2π)`.
//! Values within [`EPSILON`] below `2π` snap to `0` so the wrap point
//! cannot split two directions that are effectively equal.

use std::f64::consts::{PI, TAU};

use super::{Coord, EPSILON};

/// Normalizes an angle to `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let r = angle.rem_euclid(TAU);
    if TAU - r < EPSILON {
        0.0
    } else {
        r
    }
}

/// Normalizes an angle to `(-π, π]`.
#[must_use]
pub fn normalize_signed(angle: f64) -> f64 {
    let r = normalize_angle(angle);
    if r > PI {
        r - TAU
    } else {
        r
    }
}

/// Direction of travel from `from` to `to`.
#[must_use]
pub fn angle_to(from: &Coord, to: &Coord) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Signed turn from travel direction `t0` to `t1`, in `(-π, π]`.
///
/// Positive values turn counter-clockwise (left).
#[must_use]
pub fn angle_between(t0: f64, t1: f64) -> f64 {
    normalize_signed(t1 - t0)
}

/// Returns true if two angles denote the same direction.
#[must_use]
pub fn angles_equal(a: f64, b: f64) -> bool {
    normalize_angle(a - b) < EPSILON
}

/// Rotation needed to get from `from` to `to` turning counter-clockwise, in `[0, 2π)`.
#[must_use]
pub fn ccw_delta(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

/// Rotation needed to get from `from` to `to` turning clockwise, in `[0, 2π)`.
#[must_use]
pub fn cw_delta(from: f64, to: f64) -> f64 {
    normalize_angle(from - to)
}
