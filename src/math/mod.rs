pub mod angle;
pub mod arc_2d;
pub mod coord_key;
pub mod intersect_2d;

use std::cmp::Ordering;

/// 2D point type.
pub type Coord = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Shared tolerance for every topology-deciding float comparison:
/// parallelism, tangency, co-location and angle equality.
pub const EPSILON: f64 = 1e-6;

/// Returns true if `a` and `b` differ by less than [`EPSILON`].
#[must_use]
pub fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns true if two coordinates are within [`EPSILON`] of each other.
#[must_use]
pub fn coords_equal(a: &Coord, b: &Coord) -> bool {
    (a - b).norm() < EPSILON
}

/// Total order on coordinates: by `x`, then by `y`.
#[must_use]
pub fn cmp_coords(a: &Coord, b: &Coord) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// Moves `origin` by `distance` along the direction `angle`.
#[must_use]
pub fn push(origin: &Coord, angle: f64, distance: f64) -> Coord {
    Coord::new(
        origin.x + angle.cos() * distance,
        origin.y + angle.sin() * distance,
    )
}
