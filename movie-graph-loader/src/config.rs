// Configuration constants and environment helpers
use movie_graph_repository::{BatchOptions, BulkImport, Neo4jConfig, RowMapping};

use crate::errors::ConfigError;
use crate::loader::ImportPlan;

pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_IMPORT_URI: &str = "file:///ml-latest-small";

pub const MOVIES_FILE: &str = "movies.csv";
pub const RATINGS_FILE: &str = "ratings.csv";

// Batch facility settings forwarded to the store
pub const MOVIES_BATCH: BatchOptions = BatchOptions {
    batch_size: 2000,
    parallel: true,
    retries: 3,
};
pub const RATINGS_BATCH: BatchOptions = BatchOptions {
    batch_size: 20000,
    parallel: true,
    retries: 5,
};

const NEO4J_URI: &str = "NEO4J_URI";
const NEO4J_USER: &str = "NEO4J_USER";
const NEO4J_PASSWORD: &str = "NEO4J_PASSWORD";
const NEO4J_DATABASE: &str = "NEO4J_DATABASE";
const MOVIELENS_IMPORT_URI: &str = "MOVIELENS_IMPORT_URI";

/// Settings for one load run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub neo4j: Neo4jConfig,
    /// Base URI, resolved by the store, under which the CSV files live.
    pub import_uri: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            neo4j: Neo4jConfig {
                uri: DEFAULT_NEO4J_URI.to_string(),
                user: String::new(),
                password: String::new(),
                database: None,
            },
            import_uri: DEFAULT_IMPORT_URI.to_string(),
        }
    }
}

impl LoaderConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let uri = lookup(NEO4J_URI).unwrap_or(defaults.neo4j.uri);
        let import_uri = lookup(MOVIELENS_IMPORT_URI).unwrap_or(defaults.import_uri);

        Ok(Self {
            neo4j: Neo4jConfig {
                uri: validate_uri(NEO4J_URI, uri)?,
                user: lookup(NEO4J_USER).unwrap_or_default(),
                password: lookup(NEO4J_PASSWORD).unwrap_or_default(),
                database: lookup(NEO4J_DATABASE)
                    .map(|db| db.trim().to_string())
                    .filter(|db| !db.is_empty()),
            },
            import_uri: validate_uri(MOVIELENS_IMPORT_URI, import_uri)?,
        })
    }

    /// Store-resolvable URI of a file under the import base.
    pub fn source(&self, file: &str) -> String {
        format!("{}/{}", self.import_uri.trim_end_matches('/'), file)
    }

    pub fn movies_import(&self) -> BulkImport {
        BulkImport::new(
            self.source(MOVIES_FILE),
            RowMapping::MoviesWithGenres,
            MOVIES_BATCH,
        )
    }

    pub fn ratings_import(&self) -> BulkImport {
        BulkImport::new(self.source(RATINGS_FILE), RowMapping::Ratings, RATINGS_BATCH)
    }

    pub fn import_plan(&self) -> ImportPlan {
        ImportPlan {
            movies: self.movies_import(),
            ratings: self.ratings_import(),
        }
    }
}

fn validate_uri(var: &'static str, value: String) -> Result<String, ConfigError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ConfigError::Empty(var));
    }
    if !value.contains("://") {
        return Err(ConfigError::InvalidUri { var, value });
    }
    Ok(value)
}
