//! This module defines and re-exports the interfaces for the graph repository.
mod graph_store;

pub use graph_store::GraphStore;
