mod corner;

use std::f64::consts::FRAC_PI_2;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::{Circle, Line, Path, Primitive, Segment};
use crate::math::arc_2d::offset_radius;
use crate::math::intersect_2d::intersect;
use crate::math::{push, Coord, EPSILON};

use corner::{classify, CornerKind};
pub use corner::{miter_point, CornerJoin, InsetOptions};

/// Offsets one segment and joins it to the offset of the segment after it.
///
/// `amount` is a signed distance to the left of travel. The result starts
/// implicitly where the previous corner's output ended and ends where the
/// offset of `next` begins, so outputs for consecutive corners chain into
/// a path. Without `next` the segment is offset on its own.
///
/// An arc whose offset radius collapses to zero or below yields no
/// segments.
#[derive(Debug)]
pub struct InsetSegment {
    prev: Coord,
    segment: Segment,
    next: Option<Segment>,
    amount: f64,
    options: InsetOptions,
}

impl InsetSegment {
    /// Creates a new `InsetSegment` operation for the corner at the end of
    /// `segment`, which starts at `prev`.
    #[must_use]
    pub fn new(prev: Coord, segment: Segment, next: Option<Segment>, amount: f64) -> Self {
        Self {
            prev,
            segment,
            next,
            amount,
            options: InsetOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: InsetOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the inset, returning the offset segment and its join.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnsupportedSegment` if either segment is a
    /// quad.
    pub fn execute(&self) -> Result<Vec<Segment>> {
        self.segment.ensure_supported()?;
        if let Some(next) = &self.next {
            next.ensure_supported()?;
        }

        let corner = self.segment.to();
        let collapsed = offset_circle(&self.segment, &corner, self.amount)
            .is_some_and(|c| c.radius < EPSILON);
        if collapsed {
            debug!(amount = self.amount, "arc collapsed by inset");
            return Ok(Vec::new());
        }

        let t0 = self.segment.end_tangent(&self.prev)?;
        let in_end = push(&corner, t0 + FRAC_PI_2, self.amount);
        let Some(next) = self.next else {
            return Ok(vec![self.segment.retarget(in_end)]);
        };
        let t1 = next.start_tangent(&corner)?;
        let out_start = push(&corner, t1 + FRAC_PI_2, self.amount);

        let kind = classify(t0, t1, self.amount, self.options.join);
        debug!(?kind, x = corner.x, y = corner.y, "inset corner");
        let result = match kind {
            CornerKind::Straight => vec![self.segment.retarget(in_end)],
            CornerKind::Reversal => vec![
                self.segment.retarget(in_end),
                Segment::Line { to: out_start },
            ],
            CornerKind::Contract => self.pivot(corner, in_end, out_start),
            CornerKind::Expand => {
                match self.expand_join(&next, corner, (t0, in_end), (t1, out_start)) {
                    Some(join) => vec![self.segment.retarget(join)],
                    None => {
                        debug!(x = corner.x, y = corner.y, "offset legs do not meet, pivoting");
                        self.pivot(corner, in_end, out_start)
                    }
                }
            }
        };
        Ok(result)
    }

    /// Offset-in, then straight through the original corner to the start
    /// of offset-out.
    ///
    /// The two bridging lines run from `in_end` to `corner` and on to
    /// `out_start`, each of length `|amount|`. The pivot has zero width at
    /// the corner: it touches the original corner and encloses no area
    /// beyond the two offset legs.
    fn pivot(&self, corner: Coord, in_end: Coord, out_start: Coord) -> Vec<Segment> {
        vec![
            self.segment.retarget(in_end),
            Segment::Line { to: corner },
            Segment::Line { to: out_start },
        ]
    }

    /// Meeting point of the two offset legs.
    ///
    /// Two lines use the half-angle miter directly. With an arc involved the
    /// offset primitives are intersected and the crossing nearest the miter
    /// point wins.
    fn expand_join(
        &self,
        next: &Segment,
        corner: Coord,
        (t0, in_end): (f64, Coord),
        (t1, out_start): (f64, Coord),
    ) -> Option<Coord> {
        let miter = miter_point(&corner, t0, t1, self.amount);
        if matches!(self.segment, Segment::Line { .. }) && matches!(next, Segment::Line { .. }) {
            return Some(miter);
        }

        let incoming = offset_primitive(&self.segment, &corner, in_end, t0, self.amount);
        let outgoing = offset_primitive(next, &corner, out_start, t1, self.amount);
        intersect(&incoming, &outgoing)
            .into_iter()
            .min_by(|a, b| (a - miter).norm().total_cmp(&(b - miter).norm()))
    }
}

/// The offset circle of an arc segment ending at `corner`.
fn offset_circle(segment: &Segment, corner: &Coord, amount: f64) -> Option<Circle> {
    match segment {
        Segment::Arc {
            center, clockwise, ..
        } => {
            let radius = (corner - center).norm();
            Some(Circle::new(
                *center,
                offset_radius(radius, *clockwise, amount),
            ))
        }
        Segment::Line { .. } | Segment::Quad { .. } => None,
    }
}

/// The infinite primitive an offset leg lies on: a line through
/// `through` along `tangent`, or the arc's offset circle.
fn offset_primitive(
    segment: &Segment,
    corner: &Coord,
    through: Coord,
    tangent: f64,
    amount: f64,
) -> Primitive {
    offset_circle(segment, corner, amount).map_or_else(
        || Primitive::Line(Line::from_point_angle(&through, tangent)),
        Primitive::Circle,
    )
}

/// Offsets a whole path by a signed distance to the left of travel.
///
/// Every corner of a closed path is joined, including the one at the
/// origin. The ends of an open path are offset square to their segments.
#[derive(Debug)]
pub struct InsetPath<'a> {
    path: &'a Path,
    amount: f64,
    options: InsetOptions,
}

impl<'a> InsetPath<'a> {
    /// Creates a new `InsetPath` operation.
    #[must_use]
    pub fn new(path: &'a Path, amount: f64) -> Self {
        Self {
            path,
            amount,
            options: InsetOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: InsetOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the inset, returning the offset path.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a path without segments
    /// and `OperationError::UnsupportedSegment` if the path contains a quad.
    pub fn execute(&self) -> Result<Path> {
        let segments = &self.path.segments;
        let Some(first) = segments.first() else {
            let message = "cannot inset an empty path".to_owned();
            return Err(OperationError::InvalidInput(message).into());
        };
        let closed = self.path.is_closed();
        let n = segments.len();

        let mut result = Vec::with_capacity(n);
        for (i, segment) in segments.iter().enumerate() {
            let next = if i + 1 < n {
                Some(segments[i + 1])
            } else if closed {
                Some(*first)
            } else {
                None
            };
            let corner = InsetSegment::new(self.path.prev_of(i), *segment, next, self.amount)
                .with_options(self.options)
                .execute()?;
            result.extend(corner);
        }

        let origin = if closed {
            result.last().map_or(self.path.origin, Segment::to)
        } else {
            let t = first.start_tangent(&self.path.origin)?;
            push(&self.path.origin, t + FRAC_PI_2, self.amount)
        };
        debug!(
            input = n,
            output = result.len(),
            closed,
            amount = self.amount,
            "inset path"
        );
        Ok(Path::new(origin, result))
    }
}
