use thiserror::Error;

/// Top-level error type for the girih pattern engine.
#[derive(Debug, Error)]
pub enum GirihError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Internal-consistency failures in caller-provided arrangement state.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("hit references primitive {index} but only {count} primitives exist")]
    PrimitiveNotFound { index: usize, count: usize },

    #[error("hit has {entries} entries and {exits} exits; cannot untangle")]
    UnbalancedHit { entries: usize, exits: usize },
}

/// Errors raised when an operation is handed input it does not accept.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("unsupported segment type: {0}")]
    UnsupportedSegment(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`GirihError`].
pub type Result<T> = std::result::Result<T, GirihError>;
