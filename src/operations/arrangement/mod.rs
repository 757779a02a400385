mod hits;
mod theta;

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::Result;
use crate::geometry::{Primitive, Segment, SegmentWithPrev};
use crate::math::angle::angle_to;
use crate::math::coord_key::CoordKey;
use crate::math::intersect_2d::intersect;
use crate::math::{coords_equal, Coord};

use hits::HitAccumulator;
pub use theta::{SegmentIntersection, Theta};

/// A point where two or more curves cross.
///
/// `pairs` holds every `(i, j)` input pair (with `i < j`) whose
/// intersection landed on this point. `index` is the hit's position in
/// [`Arrangement::hits`] and identifies it; `key` is only its grid cell,
/// which two distinct hits closer than `√2·EPSILON` may share.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub coord: Coord,
    pub key: CoordKey,
    pub pairs: BTreeSet<(usize, usize)>,
}

impl Hit {
    /// Every input index taking part in this hit, ascending.
    #[must_use]
    pub fn primitives(&self) -> BTreeSet<usize> {
        self.pairs.iter().flat_map(|&(i, j)| [i, j]).collect()
    }

    /// Whether input `index` passes through this hit.
    #[must_use]
    pub fn touches(&self, index: usize) -> bool {
        self.pairs.iter().any(|&(i, j)| i == index || j == index)
    }
}

/// Deduplicated hits plus the curve ends incident to each of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arrangement {
    hits: Vec<Hit>,
    incidences: Vec<Vec<SegmentIntersection>>,
}

impl Arrangement {
    /// Hits in discovery order.
    #[must_use]
    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    /// Incident curve ends per hit, indexed like [`Arrangement::hits`].
    #[must_use]
    pub fn incidences(&self) -> &[Vec<SegmentIntersection>] {
        &self.incidences
    }

    /// Curve ends incident to `hit`, a hit of this arrangement.
    #[must_use]
    pub fn incidences_at(&self, hit: &Hit) -> &[SegmentIntersection] {
        self.incidences.get(hit.index).map_or(&[], Vec::as_slice)
    }

    /// Hits grouped by grid cell.
    #[must_use]
    pub fn by_key(&self) -> BTreeMap<CoordKey, Vec<&Hit>> {
        let mut map: BTreeMap<CoordKey, Vec<&Hit>> = BTreeMap::new();
        for hit in &self.hits {
            map.entry(hit.key).or_default().push(hit);
        }
        map
    }

    /// The hit within tolerance of `coord`, if any.
    #[must_use]
    pub fn find_hit(&self, coord: &Coord) -> Option<&Hit> {
        self.hits.iter().find(|h| coords_equal(&h.coord, coord))
    }

    /// Hits lying on input `index`.
    pub fn hits_on(&self, index: usize) -> impl Iterator<Item = &Hit> {
        self.hits.iter().filter(move |h| h.touches(index))
    }
}

/// Builds the arrangement of a list of primitives.
///
/// Every unordered pair is intersected; results landing on the same point
/// merge into one [`Hit`]. Each primitive through a hit contributes one
/// incidence that is both entry and exit, with its direction of increasing
/// parameter (lines) or counter-clockwise travel (circles).
#[derive(Debug)]
pub struct BuildArrangement<'a> {
    primitives: &'a [Primitive],
}

impl<'a> BuildArrangement<'a> {
    /// Creates a new `BuildArrangement` operation.
    #[must_use]
    pub fn new(primitives: &'a [Primitive]) -> Self {
        Self { primitives }
    }

    /// Executes the build, returning hits in discovery order.
    #[must_use]
    pub fn execute(&self) -> Arrangement {
        let mut acc = HitAccumulator::new();
        for i in 0..self.primitives.len() {
            for j in (i + 1)..self.primitives.len() {
                for point in intersect(&self.primitives[i], &self.primitives[j]) {
                    let hit = acc.record(point, (i, j));
                    acc.add_incidence(hit, primitive_incidence(i, &self.primitives[i], &point));
                    acc.add_incidence(hit, primitive_incidence(j, &self.primitives[j], &point));
                }
            }
        }
        let arrangement = acc.finish();
        debug!(
            primitives = self.primitives.len(),
            hits = arrangement.hits.len(),
            "built primitive arrangement"
        );
        arrangement
    }
}

/// Builds the arrangement of bounded path segments.
///
/// Hits are restricted to the segments' actual extent. The joint where one
/// segment of a shape hands over to the next is not a hit by itself; it
/// only becomes one when another curve also passes through it. Incidences
/// are entries when the hit is not the segment's start and exits when it
/// is not the segment's end. A full-circle arc has no start or end of its
/// own, so it both enters and exits every hit on it, its seam included.
/// `Hit::pairs` index into the segment list.
#[derive(Debug)]
pub struct BuildPathArrangement<'a> {
    segments: &'a [SegmentWithPrev],
}

impl<'a> BuildPathArrangement<'a> {
    /// Creates a new `BuildPathArrangement` operation.
    #[must_use]
    pub fn new(segments: &'a [SegmentWithPrev]) -> Self {
        Self { segments }
    }

    /// Executes the build over the bounded segments.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnsupportedSegment` if any segment is a quad.
    pub fn execute(&self) -> Result<Arrangement> {
        let primitives = self
            .segments
            .iter()
            .map(|s| s.segment.primitive(&s.prev))
            .collect::<Result<Vec<_>>>()?;

        let mut acc = HitAccumulator::new();
        for i in 0..self.segments.len() {
            let Some(pi) = &primitives[i] else { continue };
            for j in (i + 1)..self.segments.len() {
                let Some(pj) = &primitives[j] else { continue };
                let (a, b) = (&self.segments[i], &self.segments[j]);
                for point in intersect(pi, pj) {
                    if !a.segment.contains(&a.prev, &point)?
                        || !b.segment.contains(&b.prev, &point)?
                        || is_chained_joint(a, b, &point)
                    {
                        continue;
                    }
                    let hit = acc.record(point, (i, j));
                    acc.add_incidence(hit, segment_incidence(i, a, &point));
                    acc.add_incidence(hit, segment_incidence(j, b, &point));
                }
            }
        }
        let arrangement = acc.finish();
        debug!(
            segments = self.segments.len(),
            hits = arrangement.hits.len(),
            "built path arrangement"
        );
        Ok(arrangement)
    }
}

fn primitive_incidence(index: usize, primitive: &Primitive, point: &Coord) -> SegmentIntersection {
    let theta = match primitive {
        Primitive::Line(line) => Theta::Flat {
            angle: line.direction(),
        },
        Primitive::Circle(circle) => Theta::Arc {
            angle: angle_to(&circle.center, point),
            clockwise: false,
        },
    };
    SegmentIntersection {
        shape_id: index,
        segment: index,
        is_entry: true,
        is_exit: true,
        theta,
    }
}

fn segment_incidence(index: usize, seg: &SegmentWithPrev, point: &Coord) -> SegmentIntersection {
    let theta = match seg.segment {
        Segment::Arc {
            center, clockwise, ..
        } => Theta::Arc {
            angle: angle_to(&center, point),
            clockwise,
        },
        // Quads never get this far: `primitive` rejects them.
        Segment::Line { to } | Segment::Quad { to, .. } => Theta::Flat {
            angle: angle_to(&seg.prev, &to),
        },
    };
    let to = seg.segment.to();
    let full_circle = matches!(seg.segment, Segment::Arc { .. }) && coords_equal(&seg.prev, &to);
    SegmentIntersection {
        shape_id: seg.shape_id,
        segment: index,
        is_entry: full_circle || !coords_equal(point, &seg.prev),
        is_exit: full_circle || !coords_equal(point, &to),
        theta,
    }
}

/// Whether `point` is just the shared endpoint of two consecutive
/// segments of the same shape.
fn is_chained_joint(a: &SegmentWithPrev, b: &SegmentWithPrev, point: &Coord) -> bool {
    a.shape_id == b.shape_id
        && ((coords_equal(&a.segment.to(), &b.prev) && coords_equal(point, &b.prev))
            || (coords_equal(&b.segment.to(), &a.prev) && coords_equal(point, &a.prev)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GirihError, OperationError};
    use crate::geometry::{Circle, Line, Path};
    use crate::operations::untangle::{HitTransition, UntangleHit};

    fn grid() -> Vec<Primitive> {
        vec![
            Primitive::Line(Line::new(0.0, 0.0)),
            Primitive::Line(Line::new(0.0, 10.0)),
            Primitive::Line(Line::vertical(0.0)),
            Primitive::Line(Line::vertical(10.0)),
        ]
    }

    fn square(x: f64, y: f64, size: f64) -> Path {
        Path::from_points(
            Coord::new(x, y),
            &[
                Coord::new(x + size, y),
                Coord::new(x + size, y + size),
                Coord::new(x, y + size),
                Coord::new(x, y),
            ],
        )
    }

    #[test]
    fn grid_has_four_hits() {
        let prims = grid();
        let arrangement = BuildArrangement::new(&prims).execute();
        assert_eq!(arrangement.hits().len(), 4);
        for hit in arrangement.hits() {
            assert_eq!(hit.pairs.len(), 1);
            assert_eq!(arrangement.incidences_at(hit).len(), 2);
        }
        assert!(arrangement.find_hit(&Coord::new(10.0, 10.0)).is_some());
        assert_eq!(arrangement.hits_on(2).count(), 2);
    }

    #[test]
    fn rebuild_is_identical() {
        let mut prims = grid();
        prims.push(Primitive::Circle(Circle::new(Coord::new(5.0, 5.0), 5.0)));
        prims.push(Primitive::Line(Line::new(1.0, 0.0)));
        let first = BuildArrangement::new(&prims).execute();
        let second = BuildArrangement::new(&prims).execute();
        assert_eq!(first, second);
        let coords: Vec<_> = first.hits().iter().map(|h| h.coord).collect();
        let again: Vec<_> = second.hits().iter().map(|h| h.coord).collect();
        assert_eq!(coords, again);
    }

    #[test]
    fn concurrent_lines_merge_into_one_hit() {
        let slope = 3.0_f64.sqrt();
        let prims = vec![
            Primitive::Line(Line::new(0.0, 0.0)),
            Primitive::Line(Line::new(-slope, 0.0)),
            Primitive::Line(Line::new(slope, 0.0)),
        ];
        let arrangement = BuildArrangement::new(&prims).execute();
        assert_eq!(arrangement.hits().len(), 1);
        let hit = &arrangement.hits()[0];
        assert_eq!(hit.pairs.len(), 3);
        assert_eq!(hit.primitives().into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(arrangement.incidences_at(hit).len(), 3);
    }

    #[test]
    fn circle_incidences_carry_radial_angle() {
        let prims = vec![
            Primitive::Circle(Circle::new(Coord::origin(), 1.0)),
            Primitive::Line(Line::vertical(1.0)),
        ];
        let arrangement = BuildArrangement::new(&prims).execute();
        assert_eq!(arrangement.hits().len(), 1);
        let ends = arrangement.incidences_at(&arrangement.hits()[0]);
        assert!(ends.iter().any(|e| matches!(
            e.theta,
            Theta::Arc { clockwise: false, angle } if angle.abs() < 1e-9
        )));
    }

    #[test]
    fn single_square_has_no_hits() {
        let segments = square(0.0, 0.0, 10.0).segments_with_prev(0);
        let arrangement = BuildPathArrangement::new(&segments).execute().unwrap();
        assert!(arrangement.hits().is_empty());
    }

    #[test]
    fn overlapping_squares_cross_twice() {
        let mut segments = square(0.0, 0.0, 10.0).segments_with_prev(0);
        segments.extend(square(5.0, 5.0, 10.0).segments_with_prev(1));
        let arrangement = BuildPathArrangement::new(&segments).execute().unwrap();
        assert_eq!(arrangement.hits().len(), 2);
        for hit in arrangement.hits() {
            let ends = arrangement.incidences_at(hit);
            assert_eq!(ends.len(), 2);
            assert!(ends.iter().all(|e| e.is_entry && e.is_exit));
        }
        assert!(arrangement.find_hit(&Coord::new(10.0, 5.0)).is_some());
        assert!(arrangement.find_hit(&Coord::new(5.0, 10.0)).is_some());
    }

    #[test]
    fn vertex_on_other_shape_splits_entry_and_exit() {
        // The diamond's right vertex sits on the square's left edge.
        let mut segments = square(10.0, -5.0, 10.0).segments_with_prev(0);
        let diamond = Path::from_points(
            Coord::new(10.0, 0.0),
            &[
                Coord::new(5.0, 5.0),
                Coord::new(0.0, 0.0),
                Coord::new(5.0, -5.0),
                Coord::new(10.0, 0.0),
            ],
        );
        segments.extend(diamond.segments_with_prev(1));
        let arrangement = BuildPathArrangement::new(&segments).execute().unwrap();
        let hit = arrangement.find_hit(&Coord::new(10.0, 0.0)).unwrap();
        let ends = arrangement.incidences_at(hit);
        assert_eq!(ends.len(), 3);
        let diamond_ends: Vec<_> = ends.iter().filter(|e| e.shape_id == 1).collect();
        assert_eq!(diamond_ends.len(), 2);
        assert_eq!(diamond_ends.iter().filter(|e| e.is_entry && !e.is_exit).count(), 1);
        assert_eq!(diamond_ends.iter().filter(|e| e.is_exit && !e.is_entry).count(), 1);
    }

    #[test]
    fn arc_segments_respect_angular_range() {
        // Upper half circle against a horizontal line below the center.
        let upper = Path::new(
            Coord::new(5.0, 0.0),
            vec![Segment::Arc {
                center: Coord::origin(),
                to: Coord::new(-5.0, 0.0),
                clockwise: false,
            }],
        );
        let mut segments = upper.segments_with_prev(0);
        segments.push(SegmentWithPrev {
            prev: Coord::new(-10.0, -3.0),
            segment: Segment::Line {
                to: Coord::new(10.0, -3.0),
            },
            shape_id: 1,
        });
        segments.push(SegmentWithPrev {
            prev: Coord::new(-10.0, 3.0),
            segment: Segment::Line {
                to: Coord::new(10.0, 3.0),
            },
            shape_id: 2,
        });
        let arrangement = BuildPathArrangement::new(&segments).execute().unwrap();
        assert_eq!(arrangement.hits().len(), 2);
        assert!(arrangement.hits().iter().all(|h| h.coord.y > 0.0));
    }

    #[test]
    fn full_circle_path_passes_through_its_seam() {
        // The circle path starts and ends at (5, 0), where the line crosses.
        let circle = Path::new(
            Coord::new(5.0, 0.0),
            vec![Segment::Arc {
                center: Coord::origin(),
                to: Coord::new(5.0, 0.0),
                clockwise: false,
            }],
        );
        let mut segments = circle.segments_with_prev(0);
        segments.push(SegmentWithPrev {
            prev: Coord::new(-10.0, 0.0),
            segment: Segment::Line {
                to: Coord::new(10.0, 0.0),
            },
            shape_id: 1,
        });
        let arrangement = BuildPathArrangement::new(&segments).execute().unwrap();
        assert_eq!(arrangement.hits().len(), 2);
        for hit in arrangement.hits() {
            let ends = arrangement.incidences_at(hit);
            assert_eq!(ends.len(), 2);
            assert!(ends.iter().all(|e| e.is_entry && e.is_exit));
            let HitTransition::Multi { entries, exits } = UntangleHit::new(ends).execute().unwrap()
            else {
                panic!("expected both shapes to pass through");
            };
            assert_eq!(entries.len(), 2);
            for (entry, exit) in entries.iter().zip(&exits) {
                assert_eq!(entry.shape_id, exit.shape_id);
            }
        }
    }

    #[test]
    fn hits_are_indexed_in_order() {
        let prims = grid();
        let arrangement = BuildArrangement::new(&prims).execute();
        for (i, hit) in arrangement.hits().iter().enumerate() {
            assert_eq!(hit.index, i);
        }
        assert_eq!(arrangement.incidences().len(), arrangement.hits().len());
        assert_eq!(arrangement.by_key().len(), 4);
    }

    #[test]
    fn quad_segments_are_rejected() {
        let segments = vec![SegmentWithPrev {
            prev: Coord::origin(),
            segment: Segment::Quad {
                control: Coord::new(1.0, 1.0),
                to: Coord::new(2.0, 0.0),
            },
            shape_id: 0,
        }];
        assert!(matches!(
            BuildPathArrangement::new(&segments).execute(),
            Err(GirihError::Operation(OperationError::UnsupportedSegment(_)))
        ));
    }
}
