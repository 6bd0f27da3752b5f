//! In-memory graph store for tests and local development.
//!
//! `MemoryGraphStore` applies the same merge semantics as the Cypher row
//! mappings, but natively: it resolves `file:///` source URIs against a local
//! import directory, parses the CSV with headers, and merges rows batch by
//! batch. A batch containing a row without its key columns is not committed
//! and is reported as a failed batch, like a store-side merge on a null key.
//!
//! # Example
//!
//! ```ignore
//! use movie_graph_repository::{GraphStore, MemoryGraphStore};
//!
//! let store = MemoryGraphStore::new("/var/lib/neo4j/import");
//! let summary = store.bulk_import(&movies_import).await?;
//! assert_eq!(store.movie("1").unwrap().title.as_deref(), Some("Toy Story (1995)"));
//! ```
mod graph;
mod rows;

pub use graph::{MovieNode, RatedEdge};

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::errors::GraphStoreError;
use crate::interfaces::GraphStore;
use crate::types::{BulkImport, GraphCounts, ImportSummary, UniqueConstraint};
use graph::MemoryGraph;
use rows::CsvRow;

const FILE_SCHEME: &str = "file://";

/// `GraphStore` that keeps the whole graph in process memory.
pub struct MemoryGraphStore {
    import_root: PathBuf,
    graph: RwLock<MemoryGraph>,
}

impl MemoryGraphStore {
    /// Create an empty store resolving `file:///` URIs under `import_root`.
    pub fn new(import_root: impl Into<PathBuf>) -> Self {
        Self {
            import_root: import_root.into(),
            graph: RwLock::new(MemoryGraph::default()),
        }
    }

    pub fn import_root(&self) -> &Path {
        &self.import_root
    }

    /// Look up a movie node by `movieId`.
    pub fn movie(&self, movie_id: &str) -> Option<MovieNode> {
        self.read(|graph| graph.movie(movie_id))
    }

    /// Genres linked to a movie through HAS edges, sorted.
    pub fn genres_of(&self, movie_id: &str) -> Vec<String> {
        self.read(|graph| graph.genres_of(movie_id))
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.read(|graph| graph.genres.contains(genre))
    }

    pub fn has_user(&self, user_id: &str) -> bool {
        self.read(|graph| graph.users.contains(user_id))
    }

    /// The RATED edge from a user to a movie, if any.
    pub fn rating(&self, user_id: &str, movie_id: &str) -> Option<RatedEdge> {
        self.read(|graph| graph.rating(user_id, movie_id))
    }

    pub fn ratings(&self) -> Vec<RatedEdge> {
        self.read(|graph| graph.ratings())
    }

    pub fn constraints(&self) -> Vec<UniqueConstraint> {
        self.read(|graph| graph.constraints.iter().copied().collect())
    }

    fn read<T>(&self, f: impl FnOnce(&MemoryGraph) -> T) -> T {
        let graph = self.graph.read().unwrap_or_else(|e| e.into_inner());
        f(&graph)
    }

    fn write<T>(&self, f: impl FnOnce(&mut MemoryGraph) -> T) -> T {
        let mut graph = self.graph.write().unwrap_or_else(|e| e.into_inner());
        f(&mut graph)
    }

    /// Maps `file:///dir/file.csv` onto `<import_root>/dir/file.csv`.
    fn resolve(&self, source: &str) -> Result<PathBuf, GraphStoreError> {
        let path = source.strip_prefix(FILE_SCHEME).ok_or_else(|| {
            GraphStoreError::import(source, "only file:/// sources can be resolved")
        })?;
        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            return Err(GraphStoreError::import(source, "source names no file"));
        }
        Ok(self.import_root.join(relative))
    }
}

#[async_trait::async_trait]
impl GraphStore for MemoryGraphStore {
    async fn clean(&self) -> Result<(), GraphStoreError> {
        self.write(|graph| graph.clear());
        Ok(())
    }

    async fn ensure_constraint(&self, constraint: &UniqueConstraint) -> Result<(), GraphStoreError> {
        self.write(|graph| graph.constraints.insert(*constraint));
        Ok(())
    }

    async fn bulk_import(&self, import: &BulkImport) -> Result<ImportSummary, GraphStoreError> {
        let path = self.resolve(&import.source)?;
        let rows = rows::read_rows(&path)
            .map_err(|e| GraphStoreError::import(&import.source, e))?;
        let batch_size = import.options.batch_size.max(1);

        let mut summary = ImportSummary::default();
        for batch in rows.chunks(batch_size) {
            summary.batches += 1;
            summary.total += batch.len() as u64;

            match first_invalid_row(batch, import) {
                Some(message) => {
                    summary.failed_batches += 1;
                    summary.failed_operations += batch.len() as u64;
                    *summary.error_messages.entry(message).or_insert(0) += 1;
                }
                None => {
                    self.write(|graph| {
                        for row in batch {
                            graph.apply(import.mapping, row);
                        }
                    });
                    summary.committed_operations += batch.len() as u64;
                }
            }
        }

        debug!(
            "Applied {} {} rows in {} batches",
            summary.committed_operations, import.mapping, summary.batches
        );
        summary.into_result(&import.source)
    }

    async fn counts(&self) -> Result<GraphCounts, GraphStoreError> {
        Ok(self.read(|graph| graph.counts()))
    }

    async fn close(self) {}
}

fn first_invalid_row(batch: &[CsvRow], import: &BulkImport) -> Option<String> {
    batch.iter().find_map(|row| {
        import
            .mapping
            .key_columns()
            .iter()
            .find(|column| row.get(column).is_none())
            .map(|column| format!("Cannot merge node because of null property value for '{column}'"))
    })
}
