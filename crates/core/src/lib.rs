//! funcviz-core
//!
//! Core library turning serverless function binding metadata into a Graphviz
//! dependency graph.
//!
//! This crate defines the binding model, the `function.json` parser, the graph
//! builder with its kind-dispatch identity rules, discovery of function units
//! on disk, and the acquisition/rendering collaborators.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends.

pub mod graph;
pub mod metadata;
pub mod model;
pub mod project;
pub mod services;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
