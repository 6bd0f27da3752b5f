//! Error types for the movie graph repository.
mod graph_store;

pub use graph_store::GraphStoreError;
