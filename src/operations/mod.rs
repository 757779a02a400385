pub mod arrangement;
pub mod inset;
pub mod untangle;
pub mod walk;

pub use arrangement::{BuildArrangement, BuildPathArrangement};
pub use inset::{InsetPath, InsetSegment};
pub use untangle::UntangleHit;
pub use walk::{FindNextSegments, TraceLoop};
