//! Domain types shared by the graph store implementations.
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::GraphStoreError;

/// A uniqueness rule on a node property, enforced by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniqueConstraint {
    pub label: &'static str,
    pub property: &'static str,
}

impl UniqueConstraint {
    /// `Movie.movieId` is unique.
    pub const MOVIE_ID: UniqueConstraint = UniqueConstraint::new("Movie", "movieId");
    /// `User.userId` is unique.
    pub const USER_ID: UniqueConstraint = UniqueConstraint::new("User", "userId");

    pub const fn new(label: &'static str, property: &'static str) -> Self {
        Self { label, property }
    }

    /// Schema name used when the constraint is created, e.g. `movie_movieId_unique`.
    pub fn name(&self) -> String {
        format!("{}_{}_unique", self.label.to_lowercase(), self.property)
    }
}

impl fmt::Display for UniqueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.label, self.property)
    }
}

/// Tuning forwarded verbatim to the store's batch facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub batch_size: usize,
    pub parallel: bool,
    pub retries: u32,
}

/// How each CSV row is mapped onto the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowMapping {
    /// `movieId,title,genres` rows become `(:Movie)-[:HAS]->(:Genre)` patterns.
    /// `genres` is a pipe-separated list.
    MoviesWithGenres,
    /// `userId,movieId,rating,timestamp` rows become `(:User)-[:RATED]->(:Movie)` patterns.
    Ratings,
}

impl RowMapping {
    /// Columns that must be present and non-empty for a row to be merged.
    pub fn key_columns(&self) -> &'static [&'static str] {
        match self {
            RowMapping::MoviesWithGenres => &["movieId"],
            RowMapping::Ratings => &["userId", "movieId"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RowMapping::MoviesWithGenres => "movies",
            RowMapping::Ratings => "ratings",
        }
    }
}

impl fmt::Display for RowMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single delegated bulk import: where to read from, how to map rows, and
/// how the store should batch the work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkImport {
    /// Store-resolvable URI of the CSV file, e.g. `file:///ml-latest-small/movies.csv`.
    pub source: String,
    pub mapping: RowMapping,
    pub options: BatchOptions,
}

impl BulkImport {
    pub fn new(source: impl Into<String>, mapping: RowMapping, options: BatchOptions) -> Self {
        Self {
            source: source.into(),
            mapping,
            options,
        }
    }
}

/// Outcome reported by the store's batch facility for one bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub batches: u64,
    pub total: u64,
    pub committed_operations: u64,
    pub failed_operations: u64,
    pub failed_batches: u64,
    pub retries: u64,
    /// Distinct error messages and how many times each was reported.
    pub error_messages: BTreeMap<String, u64>,
}

impl ImportSummary {
    pub fn has_failures(&self) -> bool {
        self.failed_batches > 0
    }

    /// Turns a summary with failed batches into `GraphStoreError::Import`.
    pub fn into_result(self, source: &str) -> Result<Self, GraphStoreError> {
        if !self.has_failures() {
            return Ok(self);
        }

        let mut message = format!(
            "{} of {} batches failed ({} failed operations)",
            self.failed_batches, self.batches, self.failed_operations
        );
        if !self.error_messages.is_empty() {
            let details: Vec<String> = self
                .error_messages
                .iter()
                .map(|(msg, count)| format!("{msg} (x{count})"))
                .collect();
            message.push_str(": ");
            message.push_str(&details.join("; "));
        }

        Err(GraphStoreError::import(source, message))
    }
}

/// Node and relationship counts of the movie graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphCounts {
    pub movies: u64,
    pub genres: u64,
    pub users: u64,
    pub has_edges: u64,
    pub rated_edges: u64,
    pub nodes: u64,
    pub relationships: u64,
}

impl GraphCounts {
    pub fn is_empty(&self) -> bool {
        self.nodes == 0 && self.relationships == 0
    }
}
