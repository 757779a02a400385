use std::cmp::Ordering;

use crate::geometry::primitive::{Circle, Line, Primitive, Slope};

use super::{cmp_coords, Coord, EPSILON};

/// Intersection points of two primitives, 0 to 2 of them.
///
/// Operands are put in a canonical order before solving and the result is
/// sorted by coordinate, so `intersect(a, b)` and `intersect(b, a)` return
/// identical vectors.
#[must_use]
pub fn intersect(a: &Primitive, b: &Primitive) -> Vec<Coord> {
    let (first, second) = if a.total_cmp(b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    };
    let mut points = match (first, second) {
        (Primitive::Line(l1), Primitive::Line(l2)) => line_line(l1, l2).into_iter().collect(),
        (Primitive::Line(line), Primitive::Circle(circle))
        | (Primitive::Circle(circle), Primitive::Line(line)) => line_circle(line, circle),
        (Primitive::Circle(c1), Primitive::Circle(c2)) => circle_circle(c1, c2),
    };
    points.sort_by(cmp_coords);
    points
}

/// Line-line intersection.
///
/// Solves `m1·x + b1 = m2·x + b2`. Parallel or coincident lines (slopes
/// equal within [`EPSILON`], or both vertical) have no intersection.
#[must_use]
pub fn line_line(l1: &Line, l2: &Line) -> Option<Coord> {
    let point = match (l1.slope, l2.slope) {
        (Slope::Vertical, Slope::Vertical) => return None,
        (Slope::Vertical, Slope::Finite(m)) => Coord::new(l1.b, m * l1.b + l2.b),
        (Slope::Finite(m), Slope::Vertical) => Coord::new(l2.b, m * l2.b + l1.b),
        (Slope::Finite(m1), Slope::Finite(m2)) => {
            if (m1 - m2).abs() < EPSILON {
                return None;
            }
            let x = (l2.b - l1.b) / (m1 - m2);
            Coord::new(x, m1 * x + l1.b)
        }
    };
    (l1.within_limit(&point) && l2.within_limit(&point)).then_some(point)
}

/// Line-circle intersection.
///
/// Substitutes the line into `(x - cx)² + (y - cy)² = r²` and solves the
/// quadratic. A line further than `r` from the center misses; a line at
/// distance `r` (within [`EPSILON`]) touches at a single tangent point.
#[must_use]
pub fn line_circle(line: &Line, circle: &Circle) -> Vec<Coord> {
    let r = circle.radius;
    if r < EPSILON {
        return Vec::new();
    }
    let c = circle.center;

    let points = match line.slope {
        Slope::Vertical => {
            let dx = line.b - c.x;
            let dist = dx.abs();
            if dist > r + EPSILON {
                Vec::new()
            } else if (dist - r).abs() < EPSILON {
                vec![Coord::new(line.b, c.y)]
            } else {
                let h = (r * r - dx * dx).sqrt();
                vec![Coord::new(line.b, c.y - h), Coord::new(line.b, c.y + h)]
            }
        }
        Slope::Finite(m) => {
            // (1 + m²)x² + 2(m(b - cy) - cx)x + cx² + (b - cy)² - r² = 0
            let k = line.b - c.y;
            let qa = 1.0 + m * m;
            let qb = 2.0 * (m * k - c.x);
            let qc = c.x * c.x + k * k - r * r;
            let dist = (m * c.x - c.y + line.b).abs() / qa.sqrt();
            if dist > r + EPSILON {
                Vec::new()
            } else if (dist - r).abs() < EPSILON {
                let x = -qb / (2.0 * qa);
                vec![Coord::new(x, m * x + line.b)]
            } else {
                let disc_sqrt = (qb * qb - 4.0 * qa * qc).max(0.0).sqrt();
                let x1 = (-qb - disc_sqrt) / (2.0 * qa);
                let x2 = (-qb + disc_sqrt) / (2.0 * qa);
                vec![
                    Coord::new(x1, m * x1 + line.b),
                    Coord::new(x2, m * x2 + line.b),
                ]
            }
        }
    };

    points
        .into_iter()
        .filter(|p| line.within_limit(p))
        .collect()
}

/// Circle-circle intersection via the radical line.
///
/// Concentric circles and zero-radius circles have no intersection.
/// Center distance equal to the sum or difference of the radii (within
/// [`EPSILON`]) gives one tangent point.
#[must_use]
pub fn circle_circle(c1: &Circle, c2: &Circle) -> Vec<Coord> {
    let (r1, r2) = (c1.radius, c2.radius);
    if r1 < EPSILON || r2 < EPSILON {
        return Vec::new();
    }

    let dx = c2.center.x - c1.center.x;
    let dy = c2.center.y - c1.center.y;
    let dist_sq = dx * dx + dy * dy;
    let dist = dist_sq.sqrt();

    if dist < EPSILON {
        return Vec::new();
    }

    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    if dist > sum + EPSILON || dist < diff - EPSILON {
        return Vec::new();
    }

    // Distance from c1 along the line c1→c2 to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let mx = c1.center.x + a * dx / dist;
    let my = c1.center.y + a * dy / dist;

    if (dist - sum).abs() < EPSILON || (dist - diff).abs() < EPSILON {
        return vec![Coord::new(mx, my)];
    }

    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let px = -dy / dist;
    let py = dx / dist;
    vec![
        Coord::new(mx + h * px, my + h * py),
        Coord::new(mx - h * px, my - h * py),
    ]
}
