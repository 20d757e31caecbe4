//! Reference resolution module.
//!
//! Maps references extracted from documents to known paper identifiers using
//! the metadata index: exact identifier match and exact normalized-title
//! match, in the order chosen by the resolution policy.

mod resolver;

pub use resolver::{ReferenceResolver, ResolutionResult};
