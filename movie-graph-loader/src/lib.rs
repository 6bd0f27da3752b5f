//! # Movie Graph Loader
//! Clears a graph database and loads the MovieLens `movies.csv` and
//! `ratings.csv` datasets into it through the store's own bulk-import
//! facility.
pub mod config;
pub mod errors;
pub mod loader;

pub use config::LoaderConfig;
pub use errors::{ConfigError, LoaderError};
pub use loader::{ImportPlan, LoadReport, MovieGraphLoader};
