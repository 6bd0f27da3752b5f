//! This module defines the `GraphStore` trait, the seam between the loader and
//! the external graph database. All persistent state lives behind it.
use crate::errors::GraphStoreError;
use crate::types::{BulkImport, GraphCounts, ImportSummary, UniqueConstraint};

/// A trait that defines the write operations the loader issues against a graph store.
///
/// Implementors hold an open connection for their whole lifetime. The
/// connection is released by [`GraphStore::close`], which consumes the store
/// so it can only happen once.
#[async_trait::async_trait]
pub trait GraphStore: Send + Sync {
    /// Deletes every node and relationship in the store.
    ///
    /// Schema objects such as constraints survive. Calling this on an empty
    /// store is a no-op.
    async fn clean(&self) -> Result<(), GraphStoreError>;

    /// Ensures a uniqueness constraint exists. No-op if it is already present.
    async fn ensure_constraint(&self, constraint: &UniqueConstraint) -> Result<(), GraphStoreError>;

    /// Delegates a bulk import to the store's batch-processing facility.
    ///
    /// The store reads `import.source`, applies the row mapping in batches and
    /// retries failed batches itself.
    ///
    /// # Returns
    ///
    /// The facility's summary on success, or `GraphStoreError::Import` if the
    /// call failed or any batch was still failing after the retries.
    async fn bulk_import(&self, import: &BulkImport) -> Result<ImportSummary, GraphStoreError>;

    /// Counts the nodes and relationships of the movie graph.
    async fn counts(&self) -> Result<GraphCounts, GraphStoreError>;

    /// Releases the connection.
    async fn close(self)
    where
        Self: Sized;
}
