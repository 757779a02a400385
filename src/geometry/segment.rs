use crate::error::{OperationError, Result};
use crate::math::angle::angle_to;
use crate::math::arc_2d::{arc_contains, arc_tangent_angle};
use crate::math::{coords_equal, Coord};

use super::primitive::{Circle, Line, Primitive};

/// One step of a path. The start point is implied by the previous step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        to: Coord,
    },
    Arc {
        center: Coord,
        to: Coord,
        clockwise: bool,
    },
    /// Quadratic curve. Carried so callers can represent it, but every
    /// operation in this crate rejects it.
    Quad {
        control: Coord,
        to: Coord,
    },
}

/// A segment together with its start point and the shape it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentWithPrev {
    pub prev: Coord,
    pub segment: Segment,
    pub shape_id: usize,
}

impl Segment {
    /// End point of the segment.
    #[must_use]
    pub fn to(&self) -> Coord {
        match self {
            Self::Line { to } | Self::Arc { to, .. } | Self::Quad { to, .. } => *to,
        }
    }

    /// A copy of this segment ending at `to` instead, keeping its kind,
    /// center and orientation.
    #[must_use]
    pub fn retarget(&self, to: Coord) -> Self {
        match *self {
            Self::Line { .. } => Self::Line { to },
            Self::Arc {
                center, clockwise, ..
            } => Self::Arc {
                center,
                to,
                clockwise,
            },
            Self::Quad { control, .. } => Self::Quad { control, to },
        }
    }

    /// Travel direction leaving `prev`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnsupportedSegment` for quads.
    pub fn start_tangent(&self, prev: &Coord) -> Result<f64> {
        match self {
            Self::Line { to } => Ok(angle_to(prev, to)),
            Self::Arc {
                center, clockwise, ..
            } => Ok(arc_tangent_angle(center, prev, *clockwise)),
            Self::Quad { .. } => Err(unsupported_quad()),
        }
    }

    /// Travel direction arriving at [`Segment::to`].
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnsupportedSegment` for quads.
    pub fn end_tangent(&self, prev: &Coord) -> Result<f64> {
        match self {
            Self::Line { to } => Ok(angle_to(prev, to)),
            Self::Arc {
                center,
                to,
                clockwise,
            } => Ok(arc_tangent_angle(center, to, *clockwise)),
            Self::Quad { .. } => Err(unsupported_quad()),
        }
    }

    /// The primitive supporting this segment when it starts at `prev`.
    ///
    /// Lines are clamped to the segment extent; arcs yield their full
    /// circle (use [`Segment::contains`] to test the angular range).
    /// Zero-length lines and zero-radius arcs yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnsupportedSegment` for quads.
    pub fn primitive(&self, prev: &Coord) -> Result<Option<Primitive>> {
        match self {
            Self::Line { to } => Ok(Line::segment(prev, to).map(Primitive::Line)),
            Self::Arc { center, .. } => {
                let radius = (prev - center).norm();
                if coords_equal(prev, center) {
                    Ok(None)
                } else {
                    Ok(Some(Primitive::Circle(Circle::new(*center, radius))))
                }
            }
            Self::Quad { .. } => Err(unsupported_quad()),
        }
    }

    /// Whether `point`, assumed to be on the supporting primitive, lies on
    /// the bounded segment starting at `prev`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnsupportedSegment` for quads.
    pub fn contains(&self, prev: &Coord, point: &Coord) -> Result<bool> {
        match self {
            Self::Line { to } => {
                Ok(Line::segment(prev, to).is_some_and(|line| line.contains(point)))
            }
            Self::Arc {
                center,
                to,
                clockwise,
            } => Ok(arc_contains(center, prev, to, *clockwise, point)),
            Self::Quad { .. } => Err(unsupported_quad()),
        }
    }

    /// The same geometry travelled backwards, ending at `prev`.
    #[must_use]
    pub fn reversed(&self, prev: &Coord) -> Self {
        match *self {
            Self::Line { .. } => Self::Line { to: *prev },
            Self::Arc {
                center, clockwise, ..
            } => Self::Arc {
                center,
                to: *prev,
                clockwise: !clockwise,
            },
            Self::Quad { control, .. } => Self::Quad { control, to: *prev },
        }
    }

    /// Rejects quads, which no operation in this crate accepts.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::UnsupportedSegment` for quads.
    pub fn ensure_supported(&self) -> Result<()> {
        match self {
            Self::Line { .. } | Self::Arc { .. } => Ok(()),
            Self::Quad { .. } => Err(unsupported_quad()),
        }
    }
}

fn unsupported_quad() -> crate::error::GirihError {
    OperationError::UnsupportedSegment("quad").into()
}
