pub mod citegraph;
pub mod config;
pub mod document;
pub mod errors;
pub mod graph;
pub mod metadata;
pub mod output;
pub mod resolution;
pub mod types;
