use std::f64::consts::{FRAC_PI_2, PI};

use crate::math::angle::angle_between;
use crate::math::{push, Coord, EPSILON};

/// How the offset legs are joined where the path turns away from the
/// offset side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CornerJoin {
    /// Offset legs that cannot meet are bridged by a pivot through the
    /// original corner.
    #[default]
    Pivot,
    /// Every turning corner is joined where the offset legs intersect.
    Miter,
}

/// Options shared by the inset operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsetOptions {
    pub join: CornerJoin,
}

/// Shape of the join between two offset legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CornerKind {
    /// The path continues straight; the legs already meet.
    Straight,
    /// The path turns back on itself.
    Reversal,
    /// The legs overshoot each other; bridge them through the corner.
    Contract,
    /// The legs meet at a single new corner.
    Expand,
}

/// Classifies the corner from incoming travel angle `t0` to outgoing `t1`
/// for an offset of `amount` to the left of travel.
pub(super) fn classify(t0: f64, t1: f64, amount: f64, join: CornerJoin) -> CornerKind {
    let between = angle_between(t0, t1);
    if between.abs() < EPSILON {
        CornerKind::Straight
    } else if PI - between.abs() < EPSILON {
        CornerKind::Reversal
    } else if join == CornerJoin::Pivot && between * amount < 0.0 {
        CornerKind::Contract
    } else {
        CornerKind::Expand
    }
}

/// Where two straight legs offset by `amount` meet, for a corner turning
/// from travel angle `t0` to `t1`.
///
/// Uses the half-angle of the turn: the meeting point lies on the bisector
/// of the two offset normals at distance `amount / cos(turn / 2)`.
#[must_use]
pub fn miter_point(corner: &Coord, t0: f64, t1: f64, amount: f64) -> Coord {
    let half = angle_between(t0, t1) / 2.0;
    push(corner, t0 + half + FRAC_PI_2, amount / half.cos())
}
