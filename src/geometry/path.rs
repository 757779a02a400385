use crate::error::Result;
use crate::math::angle::angle_to;
use crate::math::arc_2d::{arc_point_at, arc_subdivision_count, arc_sweep};
use crate::math::{coords_equal, Coord};

use super::segment::{Segment, SegmentWithPrev};

/// A path of line and arc segments starting at `origin`.
///
/// Each segment starts where the previous one ends. A path is closed when
/// its last segment ends back at `origin`, which is how traced shapes are
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub origin: Coord,
    pub segments: Vec<Segment>,
}

impl Path {
    #[must_use]
    pub fn new(origin: Coord, segments: Vec<Segment>) -> Self {
        Self { origin, segments }
    }

    /// Builds a line-only path through `points`.
    #[must_use]
    pub fn from_points(origin: Coord, points: &[Coord]) -> Self {
        let segments = points.iter().map(|&to| Segment::Line { to }).collect();
        Self { origin, segments }
    }

    /// Returns the number of segments in this path.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Whether the last segment returns to the origin.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.segments
            .last()
            .is_some_and(|last| coords_equal(&last.to(), &self.origin))
    }

    /// Start point of segment `i`.
    #[must_use]
    pub fn prev_of(&self, i: usize) -> Coord {
        if i == 0 {
            self.origin
        } else {
            self.segments[i - 1].to()
        }
    }

    /// Pairs every segment with its start point, tagged with `shape_id`.
    #[must_use]
    pub fn segments_with_prev(&self, shape_id: usize) -> Vec<SegmentWithPrev> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, segment)| SegmentWithPrev {
                prev: self.prev_of(i),
                segment: *segment,
                shape_id,
            })
            .collect()
    }

    /// Returns the path travelled in the opposite direction.
    ///
    /// Arcs keep their center and flip their clockwise flag.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let Some(last) = self.segments.last() else {
            return self.clone();
        };
        let origin = last.to();
        let segments = (0..self.segments.len())
            .rev()
            .map(|i| self.segments[i].reversed(&self.prev_of(i)))
            .collect();
        Self { origin, segments }
    }

    /// Converts this path to points by tessellating arcs into chords.
    ///
    /// `tolerance` bounds the deviation between an arc and its chords.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnsupportedSegment` if the path contains a quad.
    pub fn to_points(&self, tolerance: f64) -> Result<Vec<Coord>> {
        let mut points = Vec::with_capacity(self.segments.len() * 2 + 1);
        points.push(self.origin);

        for (i, segment) in self.segments.iter().enumerate() {
            segment.ensure_supported()?;
            let prev = self.prev_of(i);
            if let Segment::Arc {
                center,
                to,
                clockwise,
            } = segment
            {
                let radius = (prev - center).norm();
                let sweep = arc_sweep(center, &prev, to, *clockwise);
                let signed_sweep = if *clockwise { -sweep } else { sweep };
                let start_angle = angle_to(center, &prev);
                let n_sub = arc_subdivision_count(radius, sweep, tolerance);
                for j in 1..n_sub {
                    let t = f64::from(j) / f64::from(n_sub);
                    points.push(arc_point_at(center, radius, start_angle, signed_sweep, t));
                }
            }
            points.push(segment.to());
        }

        if self.is_closed() && points.len() > 1 {
            points.pop();
        }
        Ok(points)
    }

    /// Signed area of the closed path (shoelace over the tessellation).
    ///
    /// Positive for counter-clockwise, negative for clockwise.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnsupportedSegment` if the path contains a quad.
    pub fn signed_area(&self, tolerance: f64) -> Result<f64> {
        let points = self.to_points(tolerance)?;
        let n = points.len();
        if n < 3 {
            return Ok(0.0);
        }
        let mut sum = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            sum += points[i].x * points[j].y - points[j].x * points[i].y;
        }
        Ok(sum * 0.5)
    }

    /// Whether the closed path winds clockwise.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnsupportedSegment` if the path contains a quad.
    pub fn is_clockwise(&self) -> Result<bool> {
        Ok(self.signed_area(0.01)? < 0.0)
    }
}
