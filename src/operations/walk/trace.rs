use std::f64::consts::{PI, TAU};

use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{Path, Primitive};
use crate::math::angle::{ccw_delta, normalize_angle};
use crate::math::{coords_equal, EPSILON};
use crate::operations::arrangement::{Arrangement, Hit};

use super::{FindNextSegments, PendingSegment};

/// Traces a closed loop through an arrangement.
///
/// Starting with `first`, each step takes the walker candidate with the
/// minimum counter-clockwise angle from the reversed incoming direction,
/// i.e. the sharpest right turn, until the start hit is reached again.
#[derive(Debug)]
pub struct TraceLoop<'a> {
    start: &'a Hit,
    first: PendingSegment,
    primitives: &'a [Primitive],
    arrangement: &'a Arrangement,
    max_steps: usize,
}

impl<'a> TraceLoop<'a> {
    /// Creates a new `TraceLoop` operation that leaves `start` along
    /// `first`. The step cap defaults to one more than the hit count.
    #[must_use]
    pub fn new(
        start: &'a Hit,
        first: PendingSegment,
        primitives: &'a [Primitive],
        arrangement: &'a Arrangement,
    ) -> Self {
        Self {
            start,
            first,
            primitives,
            arrangement,
            max_steps: arrangement.hits().len() + 1,
        }
    }

    /// Caps the number of segments in the traced loop.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Returns the closed path, or `None` when the walk dead-ends or runs
    /// out of steps before returning to the start.
    ///
    /// # Errors
    ///
    /// Propagates walker errors (`TopologyError::PrimitiveNotFound`).
    pub fn execute(&self) -> Result<Option<Path>> {
        let mut segments = vec![self.first.segment];
        let mut prev = self.start.coord;
        let mut current = self.first.to.clone();

        while segments.len() <= self.max_steps {
            if coords_equal(&current.coord, &self.start.coord) {
                debug!(segments = segments.len(), "traced closed loop");
                return Ok(Some(Path::new(self.start.coord, segments)));
            }
            let Some(last) = segments.last() else {
                break;
            };
            let reverse = normalize_angle(last.end_tangent(&prev)? + PI);

            let candidates =
                FindNextSegments::new(&current, Some(prev), self.primitives, self.arrangement)
                    .execute()?;

            let mut best: Option<(f64, PendingSegment)> = None;
            for candidate in candidates {
                let heading = candidate.segment.start_tangent(&current.coord)?;
                let mut delta = ccw_delta(reverse, heading);
                if delta < EPSILON {
                    delta = TAU;
                }
                if best.as_ref().is_none_or(|(d, _)| delta < *d) {
                    best = Some((delta, candidate));
                }
            }

            let Some((delta, next)) = best else {
                debug!(
                    x = current.coord.x,
                    y = current.coord.y,
                    "loop trace dead-ended"
                );
                return Ok(None);
            };
            trace!(x = next.to.coord.x, y = next.to.coord.y, delta, "loop step");
            prev = current.coord;
            current = next.to;
            segments.push(next.segment);
        }

        debug!(max_steps = self.max_steps, "loop trace ran out of steps");
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Line, Segment};
    use crate::math::Coord;
    use crate::operations::arrangement::BuildArrangement;

    fn first_step(
        from: &Hit,
        to: Coord,
        prims: &[Primitive],
        arrangement: &Arrangement,
    ) -> PendingSegment {
        FindNextSegments::new(from, None, prims, arrangement)
            .execute()
            .unwrap()
            .into_iter()
            .find(|p| coords_equal(&p.to.coord, &to))
            .unwrap()
    }

    #[test]
    fn grid_square_closes() {
        let prims = vec![
            Primitive::Line(Line::new(0.0, 0.0)),
            Primitive::Line(Line::new(0.0, 10.0)),
            Primitive::Line(Line::vertical(0.0)),
            Primitive::Line(Line::vertical(10.0)),
        ];
        let arrangement = BuildArrangement::new(&prims).execute();
        let start = arrangement.find_hit(&Coord::origin()).unwrap();
        let first = first_step(start, Coord::new(10.0, 0.0), &prims, &arrangement);
        let path = TraceLoop::new(start, first, &prims, &arrangement)
            .execute()
            .unwrap()
            .unwrap();
        assert_eq!(path.segment_count(), 4);
        assert!(path.is_closed());
        assert!(coords_equal(&path.segments[1].to(), &Coord::new(10.0, 10.0)));
    }

    #[test]
    fn sharpest_right_turn_closes_the_cell() {
        // Two cells side by side; heading west along the bottom traces
        // the left cell clockwise.
        let prims = vec![
            Primitive::Line(Line::new(0.0, 0.0)),
            Primitive::Line(Line::new(0.0, 10.0)),
            Primitive::Line(Line::vertical(0.0)),
            Primitive::Line(Line::vertical(5.0)),
            Primitive::Line(Line::vertical(10.0)),
        ];
        let arrangement = BuildArrangement::new(&prims).execute();
        let start = arrangement.find_hit(&Coord::new(5.0, 0.0)).unwrap();
        let first = first_step(start, Coord::origin(), &prims, &arrangement);
        let path = TraceLoop::new(start, first, &prims, &arrangement)
            .execute()
            .unwrap()
            .unwrap();
        let corners: Vec<_> = path.segments.iter().map(Segment::to).collect();
        assert_eq!(corners.len(), 4);
        assert!(coords_equal(&corners[1], &Coord::new(0.0, 10.0)));
        assert!(coords_equal(&corners[2], &Coord::new(5.0, 10.0)));
        assert!(path.is_clockwise().unwrap());
    }

    #[test]
    fn loop_follows_an_arc() {
        // From the center out along the x axis, the sharpest right turn
        // is the clockwise quarter arc down to (0, -1).
        let prims = vec![
            Primitive::Circle(Circle::new(Coord::origin(), 1.0)),
            Primitive::Line(Line::new(0.0, 0.0)),
            Primitive::Line(Line::vertical(0.0)),
        ];
        let arrangement = BuildArrangement::new(&prims).execute();
        let start = arrangement.find_hit(&Coord::origin()).unwrap();
        let first = first_step(start, Coord::new(1.0, 0.0), &prims, &arrangement);
        let path = TraceLoop::new(start, first, &prims, &arrangement)
            .execute()
            .unwrap()
            .unwrap();
        assert_eq!(path.segment_count(), 3);
        let Segment::Arc { to, clockwise, .. } = path.segments[1] else {
            panic!("expected an arc");
        };
        assert!(clockwise);
        assert!(coords_equal(&to, &Coord::new(0.0, -1.0)));
        assert!(path.is_closed());
    }

    #[test]
    fn step_limit_stops_the_walk() {
        let prims = vec![
            Primitive::Line(Line::new(0.0, 0.0)),
            Primitive::Line(Line::new(0.0, 10.0)),
            Primitive::Line(Line::vertical(0.0)),
            Primitive::Line(Line::vertical(10.0)),
        ];
        let arrangement = BuildArrangement::new(&prims).execute();
        let start = arrangement.find_hit(&Coord::origin()).unwrap();
        let first = first_step(start, Coord::new(10.0, 0.0), &prims, &arrangement);
        let path = TraceLoop::new(start, first, &prims, &arrangement)
            .with_max_steps(2)
            .execute()
            .unwrap();
        assert!(path.is_none());
    }

    #[test]
    fn open_rail_dead_ends() {
        let prims = vec![
            Primitive::Line(Line::new(0.0, 0.0)),
            Primitive::Line(Line::vertical(0.0)),
            Primitive::Line(Line::vertical(1.0)),
        ];
        let arrangement = BuildArrangement::new(&prims).execute();
        let start = arrangement.find_hit(&Coord::origin()).unwrap();
        let first = first_step(start, Coord::new(1.0, 0.0), &prims, &arrangement);
        let path = TraceLoop::new(start, first, &prims, &arrangement)
            .execute()
            .unwrap();
        assert!(path.is_none());
    }
}
