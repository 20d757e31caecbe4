//! Metadata loading and identifier/title lookup.
//!
//! Reads the comma-separated paper table once and exposes a read-only index
//! from every known identifier, and every unambiguous normalized title, to
//! its paper.

mod index;
mod loader;
mod normalize;

pub use index::MetadataIndex;
pub use loader::read_papers;
pub use normalize::{normalize_identifier, normalize_title, split_multi};
