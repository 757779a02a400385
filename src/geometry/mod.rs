pub mod path;
pub mod primitive;
pub mod segment;

pub use path::Path;
pub use primitive::{Circle, Line, Primitive, Slope};
pub use segment::{Segment, SegmentWithPrev};
