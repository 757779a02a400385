use std::collections::{BTreeMap, BTreeSet};

use crate::math::coord_key::CoordKey;
use crate::math::{coords_equal, Coord};

use super::theta::SegmentIntersection;
use super::{Arrangement, Hit};

/// Per-pass accumulator merging intersections into hits.
///
/// Created fresh for every arrangement build and consumed by
/// [`HitAccumulator::finish`]; nothing outlives the pass. Grid cells only
/// narrow the merge search; incidences belong to the hit index.
#[derive(Debug, Default)]
pub(super) struct HitAccumulator {
    hits: Vec<Hit>,
    index: BTreeMap<CoordKey, Vec<usize>>,
    incidences: Vec<Vec<SegmentIntersection>>,
}

impl HitAccumulator {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Finds the hit within tolerance of `point`, searching the point's grid
    /// cell and its neighbors.
    fn locate(&self, point: &Coord) -> Option<usize> {
        CoordKey::from(point)
            .neighborhood()
            .iter()
            .filter_map(|key| self.index.get(key))
            .flatten()
            .copied()
            .find(|&i| coords_equal(&self.hits[i].coord, point))
    }

    /// Records that `pair` crosses at `point`, merging into an existing hit
    /// when one is close enough. Returns the hit's index.
    pub(super) fn record(&mut self, point: Coord, pair: (usize, usize)) -> usize {
        let pair = (pair.0.min(pair.1), pair.0.max(pair.1));
        if let Some(i) = self.locate(&point) {
            self.hits[i].pairs.insert(pair);
            return i;
        }
        let key = CoordKey::from(&point);
        let i = self.hits.len();
        self.hits.push(Hit {
            index: i,
            coord: point,
            key,
            pairs: BTreeSet::from([pair]),
        });
        self.index.entry(key).or_default().push(i);
        self.incidences.push(Vec::new());
        i
    }

    /// Adds an incident curve end to hit `hit`, once per input segment.
    pub(super) fn add_incidence(&mut self, hit: usize, incidence: SegmentIntersection) {
        let ends = &mut self.incidences[hit];
        if !ends.iter().any(|e| e.segment == incidence.segment) {
            ends.push(incidence);
        }
    }

    pub(super) fn finish(self) -> Arrangement {
        Arrangement {
            hits: self.hits,
            incidences: self.incidences,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;
    use crate::operations::arrangement::Theta;

    fn end(segment: usize) -> SegmentIntersection {
        SegmentIntersection {
            shape_id: segment,
            segment,
            is_entry: true,
            is_exit: true,
            theta: Theta::Flat { angle: 0.0 },
        }
    }

    #[test]
    fn nearby_points_merge() {
        let mut acc = HitAccumulator::new();
        let a = acc.record(Coord::new(1.0, 1.0), (0, 1));
        let b = acc.record(Coord::new(1.0 + EPSILON * 0.3, 1.0), (2, 1));
        assert_eq!(a, b);
        let arrangement = acc.finish();
        assert_eq!(arrangement.hits().len(), 1);
        let pairs: Vec<_> = arrangement.hits()[0].pairs.iter().copied().collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn merge_across_cell_boundary() {
        let mut acc = HitAccumulator::new();
        // Straddle the boundary between two grid cells.
        let a = acc.record(Coord::new(EPSILON * 0.49, 0.0), (0, 1));
        let b = acc.record(Coord::new(EPSILON * 0.51, 0.0), (0, 2));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_points_stay_apart() {
        let mut acc = HitAccumulator::new();
        let a = acc.record(Coord::new(0.0, 0.0), (0, 1));
        let b = acc.record(Coord::new(0.0, 1.0), (0, 2));
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_hits_in_one_cell_keep_their_own_ends() {
        // 0.9·√2·ε apart: too far to merge, close enough to share a cell.
        let mut acc = HitAccumulator::new();
        let a = acc.record(Coord::new(-0.45 * EPSILON, -0.45 * EPSILON), (0, 1));
        let b = acc.record(Coord::new(0.45 * EPSILON, 0.45 * EPSILON), (0, 2));
        assert_ne!(a, b);
        acc.add_incidence(a, end(0));
        acc.add_incidence(b, end(0));
        let arrangement = acc.finish();
        let (ha, hb) = (&arrangement.hits()[a], &arrangement.hits()[b]);
        assert_eq!(ha.key, hb.key);
        assert_eq!(arrangement.incidences_at(ha).len(), 1);
        assert_eq!(arrangement.incidences_at(hb).len(), 1);
    }

    #[test]
    fn incidences_deduplicate_by_segment() {
        let mut acc = HitAccumulator::new();
        let h = acc.record(Coord::new(0.0, 0.0), (0, 1));
        acc.add_incidence(h, end(0));
        acc.add_incidence(h, end(1));
        acc.add_incidence(h, end(0));
        let arrangement = acc.finish();
        let hit = &arrangement.hits()[0];
        assert_eq!(arrangement.incidences_at(hit).len(), 2);
    }
}
