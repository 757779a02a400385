use super::{Coord, EPSILON};

/// Quantized coordinate used for float-tolerant deduplication.
///
/// A coordinate maps to the integer grid cell `round(x / epsilon)`,
/// `round(y / epsilon)`. Two points within `epsilon` of each other always
/// land in the same cell or in adjacent cells, never further apart, so a
/// lookup that scans [`CoordKey::neighborhood`] finds every candidate
/// duplicate. Points that straddle a cell boundary get different keys;
/// callers that need merging must scan the neighborhood instead of
/// comparing keys directly. The converse also fails: two points up to
/// `√2·epsilon` apart can share a cell, so a key does not identify a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey {
    pub x: i64,
    pub y: i64,
}

impl CoordKey {
    /// Quantizes `coord` on a grid with cell size `epsilon`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(coord: &Coord, epsilon: f64) -> Self {
        Self {
            x: (coord.x / epsilon).round() as i64,
            y: (coord.y / epsilon).round() as i64,
        }
    }

    /// The key itself followed by its eight surrounding cells.
    #[must_use]
    pub fn neighborhood(self) -> [Self; 9] {
        let mut keys = [self; 9];
        let mut i = 1;
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                keys[i] = Self {
                    x: self.x + dx,
                    y: self.y + dy,
                };
                i += 1;
            }
        }
        keys
    }
}

impl From<&Coord> for CoordKey {
    fn from(coord: &Coord) -> Self {
        Self::new(coord, EPSILON)
    }
}
