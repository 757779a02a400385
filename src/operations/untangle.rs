use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::error::{Result, TopologyError};
use crate::math::EPSILON;

use super::arrangement::SegmentIntersection;

/// Resolved connectivity at a hit.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTransition {
    /// One way in, one way out.
    Straight {
        entry: SegmentIntersection,
        exit: SegmentIntersection,
    },
    /// Several curves meet; `entries[i]` continues into `exits[i]`.
    Multi {
        entries: Vec<SegmentIntersection>,
        exits: Vec<SegmentIntersection>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EndKind {
    Entry,
    Exit,
}

/// One directed end at the hit: an incidence seen as arriving or leaving.
#[derive(Debug, Clone, Copy)]
struct End {
    incidence: usize,
    kind: EndKind,
    angle: f64,
}

/// Decides which incoming curve continues into which outgoing curve at a
/// single hit.
///
/// All ends are placed in one circular order by travel direction and
/// walked clockwise. Each entry pairs with the nearest unclaimed exit
/// after it, which yields a non-crossing perfect matching: no two
/// entry→exit spans interleave.
///
/// Directions within [`EPSILON`] of each other form a cluster. Inside a
/// cluster ends are ordered by shape, then segment, entries before exits,
/// so a curve running straight through keeps its own shape instead of
/// swapping onto another one with the same heading.
#[derive(Debug)]
pub struct UntangleHit<'a> {
    ends: &'a [SegmentIntersection],
}

impl<'a> UntangleHit<'a> {
    /// Creates a new `UntangleHit` operation over the ends meeting at one hit.
    #[must_use]
    pub fn new(ends: &'a [SegmentIntersection]) -> Self {
        Self { ends }
    }

    /// Executes the untangling, pairing every entry with an exit.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnbalancedHit` when the hit has no ends or
    /// the number of entries differs from the number of exits.
    pub fn execute(&self) -> Result<HitTransition> {
        let mut ends = self.directed_ends();
        let entries = ends.iter().filter(|e| e.kind == EndKind::Entry).count();
        let exits = ends.len() - entries;
        if entries == 0 || entries != exits {
            return Err(TopologyError::UnbalancedHit { entries, exits }.into());
        }

        if entries == 1 {
            let (entry, exit) = split_single(&ends);
            return Ok(HitTransition::Straight {
                entry: self.ends[entry],
                exit: self.ends[exit],
            });
        }

        self.sort_clockwise(&mut ends);
        let pairs = match_ends(&ends);
        debug!(ends = ends.len(), pairs = pairs.len(), "untangled hit");

        let (entries, exits) = pairs
            .into_iter()
            .map(|(entry, exit)| (self.ends[entry], self.ends[exit]))
            .unzip();
        Ok(HitTransition::Multi { entries, exits })
    }

    fn directed_ends(&self) -> Vec<End> {
        let mut ends = Vec::with_capacity(self.ends.len() * 2);
        for (incidence, end) in self.ends.iter().enumerate() {
            let angle = end.theta.tangent();
            if end.is_entry {
                ends.push(End {
                    incidence,
                    kind: EndKind::Entry,
                    angle,
                });
            }
            if end.is_exit {
                ends.push(End {
                    incidence,
                    kind: EndKind::Exit,
                    angle,
                });
            }
        }
        ends
    }

    /// Orders ends along a clockwise walk: descending angle, with
    /// near-equal angles clustered and tie-broken deterministically.
    fn sort_clockwise(&self, ends: &mut [End]) {
        ends.sort_by(|a, b| b.angle.total_cmp(&a.angle));

        let mut start = 0;
        while start < ends.len() {
            let head = ends[start].angle;
            let mut stop = start + 1;
            while stop < ends.len() && head - ends[stop].angle < EPSILON {
                stop += 1;
            }
            ends[start..stop].sort_by(|a, b| self.cluster_order(a, b));
            start = stop;
        }
    }

    fn cluster_order(&self, a: &End, b: &End) -> Ordering {
        let (ia, ib) = (&self.ends[a.incidence], &self.ends[b.incidence]);
        ia.shape_id
            .cmp(&ib.shape_id)
            .then_with(|| ia.segment.cmp(&ib.segment))
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.incidence.cmp(&b.incidence))
    }
}

fn split_single(ends: &[End]) -> (usize, usize) {
    let mut entry = 0;
    let mut exit = 0;
    for end in ends {
        match end.kind {
            EndKind::Entry => entry = end.incidence,
            EndKind::Exit => exit = end.incidence,
        }
    }
    (entry, exit)
}

/// Parenthesis matching over the circular walk.
///
/// The walk starts just after the lowest point of the running
/// entry-minus-exit balance, so every exit has an open entry before it.
/// Returns `(entry incidence, exit incidence)` pairs ordered by the
/// entry's position in the input.
fn match_ends(ends: &[End]) -> Vec<(usize, usize)> {
    let n = ends.len();
    let mut balance = 0_i64;
    let mut lowest = 0_i64;
    let mut lowest_at = n - 1;
    for (i, end) in ends.iter().enumerate() {
        balance += match end.kind {
            EndKind::Entry => 1,
            EndKind::Exit => -1,
        };
        if balance < lowest {
            lowest = balance;
            lowest_at = i;
        }
    }

    let mut open: Vec<usize> = Vec::new();
    let mut pairs = Vec::with_capacity(n / 2);
    for step in 1..=n {
        let end = &ends[(lowest_at + step) % n];
        match end.kind {
            EndKind::Entry => open.push(end.incidence),
            EndKind::Exit => {
                if let Some(entry) = open.pop() {
                    trace!(entry, exit = end.incidence, "paired ends");
                    pairs.push((entry, end.incidence));
                }
            }
        }
    }
    pairs.sort_unstable();
    pairs
}
