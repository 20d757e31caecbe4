/// Folds resolved references into the citation graph.
pub mod assembler;

/// Read-only queries over an assembled graph.
pub mod queries;

pub use assembler::GraphAssembler;
