//! Resource descriptors derived from multistatus responses.

mod builder;
mod resource;

pub use builder::{build_child, build_children, build_result, build_single};
pub use resource::{ChildResource, MultistatusResult, PropertyValue};
