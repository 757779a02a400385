mod trace;

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::{Circle, Line, Primitive, Segment};
use crate::math::angle::{angle_to, ccw_delta};
use crate::math::{cmp_coords, coords_equal, Coord, EPSILON};

use super::arrangement::{Arrangement, Hit};

pub use trace::TraceLoop;

/// One candidate step while tracing a path.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSegment {
    pub to: Hit,
    pub segment: Segment,
    /// The primitive the step runs along.
    pub primitive: usize,
}

/// Proposes the segments that can continue a path from a hit.
///
/// For every primitive through the current hit, the neighboring hits on
/// that primitive are candidates: the previous and next hit along a line,
/// the counter-clockwise and clockwise neighbors around a circle. The
/// path's previous point is never proposed, and candidates are unique per
/// `(destination, primitive)`. The order is deterministic: primitives
/// ascending; along a line lower parameter first; around a circle
/// counter-clockwise first.
#[derive(Debug)]
pub struct FindNextSegments<'a> {
    current: &'a Hit,
    prev: Option<Coord>,
    primitives: &'a [Primitive],
    arrangement: &'a Arrangement,
}

impl<'a> FindNextSegments<'a> {
    /// Creates a new `FindNextSegments` operation from `current`, reached
    /// from `prev` if the path has started.
    #[must_use]
    pub fn new(
        current: &'a Hit,
        prev: Option<Coord>,
        primitives: &'a [Primitive],
        arrangement: &'a Arrangement,
    ) -> Self {
        Self {
            current,
            prev,
            primitives,
            arrangement,
        }
    }

    /// Executes the search, returning candidates in walk order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::PrimitiveNotFound` if the current hit claims
    /// a primitive index outside the primitive list.
    pub fn execute(&self) -> Result<Vec<PendingSegment>> {
        let mut seen: BTreeSet<(usize, usize)> = BTreeSet::new();
        let mut result = Vec::new();

        for index in self.current.primitives() {
            let primitive =
                self.primitives
                    .get(index)
                    .ok_or(TopologyError::PrimitiveNotFound {
                        index,
                        count: self.primitives.len(),
                    })?;

            let others: Vec<&Hit> = self
                .arrangement
                .hits_on(index)
                .filter(|h| !coords_equal(&h.coord, &self.current.coord))
                .collect();

            let candidates = match primitive {
                Primitive::Line(line) => self.line_neighbors(line, &others),
                Primitive::Circle(circle) => self.circle_neighbors(circle, &others),
            };

            for (hit, segment) in candidates {
                if self.prev.is_some_and(|p| coords_equal(&p, &hit.coord)) {
                    continue;
                }
                if !seen.insert((hit.index, index)) {
                    continue;
                }
                result.push(PendingSegment {
                    to: hit.clone(),
                    segment,
                    primitive: index,
                });
            }
        }

        debug!(
            x = self.current.coord.x,
            y = self.current.coord.y,
            candidates = result.len(),
            "found next segments"
        );
        Ok(result)
    }

    fn line_neighbors<'h>(&self, line: &Line, others: &[&'h Hit]) -> Vec<(&'h Hit, Segment)> {
        let t0 = line.param(&self.current.coord);
        let by_param = |a: &&&Hit, b: &&&Hit| {
            line.param(&a.coord)
                .total_cmp(&line.param(&b.coord))
                .then_with(|| cmp_coords(&a.coord, &b.coord))
        };
        let lower = others
            .iter()
            .filter(|h| line.param(&h.coord) < t0 - EPSILON)
            .max_by(by_param);
        let upper = others
            .iter()
            .filter(|h| line.param(&h.coord) > t0 + EPSILON)
            .min_by(by_param);

        [lower, upper]
            .into_iter()
            .flatten()
            .map(|&hit| (hit, Segment::Line { to: hit.coord }))
            .collect()
    }

    fn circle_neighbors<'h>(&self, circle: &Circle, others: &[&'h Hit]) -> Vec<(&'h Hit, Segment)> {
        let a0 = angle_to(&circle.center, &self.current.coord);
        let deltas: Vec<(f64, &Hit)> = others
            .iter()
            .map(|&h| (ccw_delta(a0, angle_to(&circle.center, &h.coord)), h))
            .filter(|(d, _)| *d > 0.0)
            .collect();
        let by_delta = |a: &&(f64, &Hit), b: &&(f64, &Hit)| {
            a.0.total_cmp(&b.0)
                .then_with(|| cmp_coords(&a.1.coord, &b.1.coord))
        };
        let ccw = deltas.iter().min_by(by_delta);
        let cw = deltas.iter().max_by(by_delta);

        let mut out = Vec::with_capacity(2);
        if let Some(&(_, hit)) = ccw {
            out.push((hit, arc_to(circle, hit, false)));
        }
        if let Some(&(_, hit)) = cw {
            out.push((hit, arc_to(circle, hit, true)));
        }
        out
    }
}

fn arc_to(circle: &Circle, hit: &Hit, clockwise: bool) -> Segment {
    Segment::Arc {
        center: circle.center,
        to: hit.coord,
        clockwise,
    }
}
