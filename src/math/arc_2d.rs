//! 2D arc math utilities.
//!
//! Arcs are described by `center`, start point, end point and a
//! `clockwise` flag. The radius is implied by the start point.
//! Offsets follow the left-hand-of-travel convention used by the whole
//! engine: a positive distance moves toward the traveller's left.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::angle::{angle_to, ccw_delta, cw_delta, normalize_angle};
use super::{Coord, EPSILON};

/// Travel direction on a circle at `point`.
///
/// The tangent is the radial angle rotated by +90° for counter-clockwise
/// travel and by -90° for clockwise travel.
#[must_use]
pub fn arc_tangent_angle(center: &Coord, point: &Coord, clockwise: bool) -> f64 {
    let radial = angle_to(center, point);
    if clockwise {
        normalize_angle(radial - FRAC_PI_2)
    } else {
        normalize_angle(radial + FRAC_PI_2)
    }
}

/// Unsigned angular sweep, in `(0, 2π]`, of the arc from `start` to `end`.
///
/// Coincident endpoints denote a full circle.
#[must_use]
pub fn arc_sweep(center: &Coord, start: &Coord, end: &Coord, clockwise: bool) -> f64 {
    let a0 = angle_to(center, start);
    let a1 = angle_to(center, end);
    let sweep = if clockwise {
        cw_delta(a0, a1)
    } else {
        ccw_delta(a0, a1)
    };
    if sweep < angular_tolerance((start - center).norm()) {
        TAU
    } else {
        sweep
    }
}

/// Whether `point`, assumed to lie on the arc's circle, falls inside the
/// angular range of the arc from `start` to `end`. Endpoints are included.
#[must_use]
pub fn arc_contains(
    center: &Coord,
    start: &Coord,
    end: &Coord,
    clockwise: bool,
    point: &Coord,
) -> bool {
    let radius = (start - center).norm();
    if radius < EPSILON {
        return false;
    }
    let tol = angular_tolerance(radius);
    let sweep = arc_sweep(center, start, end, clockwise);
    let a0 = angle_to(center, start);
    let a = angle_to(center, point);
    let delta = if clockwise {
        cw_delta(a0, a)
    } else {
        ccw_delta(a0, a)
    };
    delta <= sweep + tol || TAU - delta <= tol
}

/// Radius of the arc offset by `distance` to the left of travel.
///
/// Counter-clockwise arcs have their center on the left, so they shrink;
/// clockwise arcs grow.
#[must_use]
pub fn offset_radius(radius: f64, clockwise: bool, distance: f64) -> f64 {
    if clockwise {
        radius + distance
    } else {
        radius - distance
    }
}

/// Evaluates a point on an arc at parameter `t` in `[0, 1]`.
///
/// `signed_sweep` is positive for counter-clockwise travel.
#[must_use]
pub fn arc_point_at(
    center: &Coord,
    radius: f64,
    start_angle: f64,
    signed_sweep: f64,
    t: f64,
) -> Coord {
    let angle = start_angle + signed_sweep * t;
    Coord::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Number of chords needed to approximate an arc within `tolerance`.
///
/// A chord spanning angle `θ` deviates from the arc by its sagitta
/// `r·(1 - cos(θ/2))`, which bounds the angular step.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < EPSILON || abs_sweep < EPSILON || tolerance <= 0.0 {
        return 1;
    }
    let step = 2.0 * (1.0 - tolerance / radius).max(-1.0).acos();
    (abs_sweep / step).ceil().clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Converts the shared distance tolerance into an angle at `radius`.
fn angular_tolerance(radius: f64) -> f64 {
    if radius < EPSILON {
        EPSILON
    } else {
        EPSILON / radius
    }
}
