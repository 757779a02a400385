use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;

use crate::math::{Coord, EPSILON};

/// Slope of a [`Line`]. Vertical lines carry no finite slope, so every
/// formula over lines matches on this and handles the vertical branch
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slope {
    Finite(f64),
    Vertical,
}

/// An infinite line `y = m·x + b`, or `x = b` when vertical.
///
/// The optional `limit` clamps the line to a range of its parameter:
/// `x` for finite slopes, `y` for vertical lines. Intersections outside
/// the range are discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub slope: Slope,
    /// The y-intercept, or the x coordinate for vertical lines.
    pub b: f64,
    pub limit: Option<(f64, f64)>,
}

impl Line {
    /// Creates an unbounded line `y = m·x + b`.
    #[must_use]
    pub fn new(m: f64, b: f64) -> Self {
        Self {
            slope: Slope::Finite(m),
            b,
            limit: None,
        }
    }

    /// Creates an unbounded vertical line `x = x`.
    #[must_use]
    pub fn vertical(x: f64) -> Self {
        Self {
            slope: Slope::Vertical,
            b: x,
            limit: None,
        }
    }

    /// The unbounded line through two points, or `None` if they coincide.
    #[must_use]
    pub fn through(a: &Coord, b: &Coord) -> Option<Self> {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dx.hypot(dy) < EPSILON {
            return None;
        }
        if dx.abs() < EPSILON {
            return Some(Self::vertical(a.x));
        }
        let m = dy / dx;
        Some(Self::new(m, a.y - m * a.x))
    }

    /// The line through two points clamped to the segment between them.
    #[must_use]
    pub fn segment(a: &Coord, b: &Coord) -> Option<Self> {
        let line = Self::through(a, b)?;
        let (ta, tb) = (line.param(a), line.param(b));
        Some(line.with_limit(ta.min(tb), ta.max(tb)))
    }

    /// The unbounded line through `point` travelling along `angle`.
    #[must_use]
    pub fn from_point_angle(point: &Coord, angle: f64) -> Self {
        let dx = angle.cos();
        if dx.abs() < EPSILON {
            return Self::vertical(point.x);
        }
        let m = angle.sin() / dx;
        Self::new(m, point.y - m * point.x)
    }

    /// Returns this line clamped to `[lo, hi]` of its parameter.
    #[must_use]
    pub fn with_limit(mut self, lo: f64, hi: f64) -> Self {
        self.limit = Some((lo, hi));
        self
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        matches!(self.slope, Slope::Vertical)
    }

    /// Parameter of `p` along the line: `x`, or `y` when vertical.
    #[must_use]
    pub fn param(&self, p: &Coord) -> f64 {
        match self.slope {
            Slope::Finite(_) => p.x,
            Slope::Vertical => p.y,
        }
    }

    /// The point on the line at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Coord {
        match self.slope {
            Slope::Finite(m) => Coord::new(t, m * t + self.b),
            Slope::Vertical => Coord::new(self.b, t),
        }
    }

    /// Direction of increasing parameter, in `(-π/2, π/2]`.
    #[must_use]
    pub fn direction(&self) -> f64 {
        match self.slope {
            Slope::Finite(m) => m.atan(),
            Slope::Vertical => FRAC_PI_2,
        }
    }

    /// Perpendicular distance from `p` to the unbounded line.
    #[must_use]
    pub fn distance_to(&self, p: &Coord) -> f64 {
        match self.slope {
            Slope::Finite(m) => (m * p.x - p.y + self.b).abs() / m.hypot(1.0),
            Slope::Vertical => (p.x - self.b).abs(),
        }
    }

    /// Whether `p`'s parameter falls inside the clamp range, if any.
    #[must_use]
    pub fn within_limit(&self, p: &Coord) -> bool {
        self.limit.is_none_or(|(lo, hi)| {
            let t = self.param(p);
            t >= lo - EPSILON && t <= hi + EPSILON
        })
    }

    /// Whether `p` lies on the (possibly clamped) line.
    #[must_use]
    pub fn contains(&self, p: &Coord) -> bool {
        self.distance_to(p) < EPSILON && self.within_limit(p)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        let slope = match (self.slope, other.slope) {
            (Slope::Finite(a), Slope::Finite(b)) => a.total_cmp(&b),
            (Slope::Finite(_), Slope::Vertical) => Ordering::Less,
            (Slope::Vertical, Slope::Finite(_)) => Ordering::Greater,
            (Slope::Vertical, Slope::Vertical) => Ordering::Equal,
        };
        slope
            .then_with(|| self.b.total_cmp(&other.b))
            .then_with(|| match (self.limit, other.limit) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some((a0, a1)), Some((b0, b1))) => {
                    a0.total_cmp(&b0).then_with(|| a1.total_cmp(&b1))
                }
            })
    }
}

/// A full circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Coord,
    pub radius: f64,
}

impl Circle {
    #[must_use]
    pub fn new(center: Coord, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether `p` lies on the circle.
    #[must_use]
    pub fn contains(&self, p: &Coord) -> bool {
        ((p - self.center).norm() - self.radius).abs() < EPSILON
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.center
            .x
            .total_cmp(&other.center.x)
            .then_with(|| self.center.y.total_cmp(&other.center.y))
            .then_with(|| self.radius.total_cmp(&other.radius))
    }
}

/// Canonical infinite-line or full-circle representation used for
/// intersection math. Produced from guides or segments; never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Line(Line),
    Circle(Circle),
}

impl Primitive {
    /// Whether `p` lies on this primitive.
    #[must_use]
    pub fn contains(&self, p: &Coord) -> bool {
        match self {
            Self::Line(line) => line.contains(p),
            Self::Circle(circle) => circle.contains(p),
        }
    }

    /// Total order over primitives: lines before circles, then by fields.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Line(a), Self::Line(b)) => a.total_cmp(b),
            (Self::Line(_), Self::Circle(_)) => Ordering::Less,
            (Self::Circle(_), Self::Line(_)) => Ordering::Greater,
            (Self::Circle(a), Self::Circle(b)) => a.total_cmp(b),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn through_two_points() {
        let line = Line::through(&Coord::new(0.0, 1.0), &Coord::new(2.0, 5.0)).unwrap();
        assert_eq!(line.slope, Slope::Finite(2.0));
        assert_abs_diff_eq!(line.b, 1.0);
    }

    #[test]
    fn through_vertical_points() {
        let line = Line::through(&Coord::new(3.0, 1.0), &Coord::new(3.0, -4.0)).unwrap();
        assert!(line.is_vertical());
        assert_abs_diff_eq!(line.b, 3.0);
        assert_abs_diff_eq!(line.direction(), FRAC_PI_2);
    }

    #[test]
    fn through_coincident_points_is_none() {
        let p = Coord::new(1.0, 1.0);
        assert!(Line::through(&p, &p).is_none());
    }

    #[test]
    fn segment_is_clamped() {
        let line = Line::segment(&Coord::new(4.0, 0.0), &Coord::new(0.0, 0.0)).unwrap();
        assert_eq!(line.limit, Some((0.0, 4.0)));
        assert!(line.contains(&Coord::new(2.0, 0.0)));
        assert!(!line.contains(&Coord::new(5.0, 0.0)));
    }

    #[test]
    fn vertical_segment_clamps_on_y() {
        let line = Line::segment(&Coord::new(1.0, 0.0), &Coord::new(1.0, 3.0)).unwrap();
        assert!(line.contains(&Coord::new(1.0, 3.0)));
        assert!(!line.contains(&Coord::new(1.0, 3.1)));
    }

    #[test]
    fn from_point_angle_matches_through() {
        let p = Coord::new(1.0, 2.0);
        let line = Line::from_point_angle(&p, std::f64::consts::FRAC_PI_4);
        assert!(line.contains(&Coord::new(3.0, 4.0)));
        let vertical = Line::from_point_angle(&p, -FRAC_PI_2);
        assert!(vertical.is_vertical());
    }

    #[test]
    fn distance_to_finite_and_vertical() {
        let diag = Line::new(1.0, 0.0);
        assert_abs_diff_eq!(
            diag.distance_to(&Coord::new(1.0, 0.0)),
            0.5_f64.sqrt(),
            epsilon = 1e-12
        );
        let v = Line::vertical(2.0);
        assert_abs_diff_eq!(v.distance_to(&Coord::new(-1.0, 9.0)), 3.0);
    }

    #[test]
    fn total_order_puts_lines_first() {
        let l = Primitive::Line(Line::vertical(0.0));
        let c = Primitive::Circle(Circle::new(Coord::origin(), 1.0));
        assert_eq!(l.total_cmp(&c), Ordering::Less);
        assert_eq!(c.total_cmp(&l), Ordering::Greater);
        assert_eq!(c.total_cmp(&c), Ordering::Equal);
    }
}
