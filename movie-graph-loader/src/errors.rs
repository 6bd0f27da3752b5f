//! Error types for the movie graph loader.
use movie_graph_repository::GraphStoreError;
use thiserror::Error;

/// Errors raised while reading the loader configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{var} must be a URI with a scheme, got '{value}'")]
    InvalidUri { var: &'static str, value: String },
}

/// Represents errors that abort a load run, tagged with the phase that failed.
///
/// Phases that completed before the failure are not rolled back.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Failed to connect to the graph store: {0}")]
    Connect(#[source] GraphStoreError),

    #[error("Failed to clean the graph: {0}")]
    Clean(#[source] GraphStoreError),

    #[error("Failed to import movies: {0}")]
    ImportMovies(#[source] GraphStoreError),

    #[error("Failed to import ratings: {0}")]
    ImportRatings(#[source] GraphStoreError),
}

impl LoaderError {
    /// The underlying graph store error.
    pub fn store_error(&self) -> &GraphStoreError {
        match self {
            LoaderError::Connect(e)
            | LoaderError::Clean(e)
            | LoaderError::ImportMovies(e)
            | LoaderError::ImportRatings(e) => e,
        }
    }
}
