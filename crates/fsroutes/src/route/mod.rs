//! Route compilation: segment classification, the tree builder and the
//! nodes it produces

pub(crate) mod builder;
pub mod node;
pub mod pattern;

// Re-export commonly used types
pub use node::{PathMatch, RouteConfig, RouteNode, RouteNodeKind, RouteTarget};
pub use pattern::{classify_segment, Segment, SegmentKind};
