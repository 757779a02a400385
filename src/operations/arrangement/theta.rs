use std::f64::consts::FRAC_PI_2;

use crate::math::angle::normalize_angle;

/// Direction information for one curve end at a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Theta {
    /// A straight end; `angle` is the travel direction.
    Flat { angle: f64 },
    /// An arc end; `angle` is the direction from the arc's center to the
    /// hit, and the travel direction is derived from `clockwise`.
    Arc { angle: f64, clockwise: bool },
}

impl Theta {
    /// Travel direction through the hit, normalized to `[0, 2π)`.
    #[must_use]
    pub fn tangent(&self) -> f64 {
        match *self {
            Self::Flat { angle } => normalize_angle(angle),
            Self::Arc { angle, clockwise } => {
                if clockwise {
                    normalize_angle(angle - FRAC_PI_2)
                } else {
                    normalize_angle(angle + FRAC_PI_2)
                }
            }
        }
    }
}

/// One curve end incident to a hit.
///
/// A curve passing through the hit is both an entry (it arrives) and an
/// exit (it leaves). A curve that starts at the hit is only an exit; one
/// that ends there is only an entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentIntersection {
    pub shape_id: usize,
    /// Index of the segment or primitive in the arrangement input.
    pub segment: usize,
    pub is_entry: bool,
    pub is_exit: bool,
    pub theta: Theta,
}
