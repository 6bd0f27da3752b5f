//! # Movie Graph Repository
//! This crate provides the graph-store abstraction used to load the MovieLens
//! dataset into a property graph. It includes definitions for errors, the
//! `GraphStore` interface, and implementations backed by Neo4j, by an
//! in-memory graph, and by an operation recorder for tests.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod neo4j;
pub mod recording;
pub mod types;

pub use errors::GraphStoreError;
pub use interfaces::GraphStore;
pub use memory::MemoryGraphStore;
pub use neo4j::{Neo4jConfig, Neo4jGraphStore};
pub use recording::{Journal, RecordedOperation, RecordingGraphStore};
pub use types::{
    BatchOptions, BulkImport, GraphCounts, ImportSummary, RowMapping, UniqueConstraint,
};
