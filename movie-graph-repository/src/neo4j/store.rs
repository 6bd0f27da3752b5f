// Neo4j-backed GraphStore
use std::collections::{BTreeMap, HashMap};

use neo4rs::{ConfigBuilder, Graph, Query, Row};
use tracing::{info, warn};

use super::cypher;
use crate::errors::GraphStoreError;
use crate::interfaces::GraphStore;
use crate::types::{BulkImport, GraphCounts, ImportSummary, UniqueConstraint};

/// Connection settings for a Neo4j server.
///
/// Empty `user` and `password` connect without authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Target database; the server default when `None`.
    pub database: Option<String>,
}

impl Neo4jConfig {
    fn driver_config(&self) -> Result<neo4rs::Config, neo4rs::Error> {
        let mut builder = ConfigBuilder::default()
            .uri(self.uri.as_str())
            .user(self.user.as_str())
            .password(self.password.as_str());
        if let Some(database) = &self.database {
            builder = builder.db(database.as_str());
        }
        builder.build()
    }
}

/// `GraphStore` backed by a Neo4j server with the APOC plugin installed.
pub struct Neo4jGraphStore {
    graph: Graph,
    uri: String,
}

impl Neo4jGraphStore {
    /// Connect to Neo4j and verify the server answers queries.
    ///
    /// The driver opens connections lazily, so a `RETURN 1` is sent right away
    /// to make an unreachable server fail here.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, GraphStoreError> {
        let driver_config = config
            .driver_config()
            .map_err(|e| GraphStoreError::connection(&config.uri, e))?;
        let graph = Graph::connect(driver_config)
            .map_err(|e| GraphStoreError::connection(&config.uri, e))?;

        graph
            .run(Query::new(cypher::PING.to_string()))
            .await
            .map_err(|e| GraphStoreError::connection(&config.uri, e))?;

        info!("✓ Connected to Neo4j at {}", config.uri);
        Ok(Self {
            graph,
            uri: config.uri.clone(),
        })
    }

    async fn run_statement(&self, statement: String) -> Result<(), GraphStoreError> {
        self.graph
            .run(Query::new(statement.clone()))
            .await
            .map_err(|e| GraphStoreError::query(statement, e))
    }
}

#[async_trait::async_trait]
impl GraphStore for Neo4jGraphStore {
    async fn clean(&self) -> Result<(), GraphStoreError> {
        self.run_statement(cypher::DELETE_ALL.to_string()).await
    }

    async fn ensure_constraint(&self, constraint: &UniqueConstraint) -> Result<(), GraphStoreError> {
        self.run_statement(cypher::create_unique_constraint(constraint))
            .await
    }

    async fn bulk_import(&self, import: &BulkImport) -> Result<ImportSummary, GraphStoreError> {
        let query = Query::new(cypher::PERIODIC_ITERATE.to_string())
            .param("outer", cypher::LOAD_CSV_ROWS.to_string())
            .param("inner", cypher::mapping_statement(import.mapping).to_string())
            .param("source", import.source.clone())
            .param("batchSize", import.options.batch_size as i64)
            .param("parallel", import.options.parallel)
            .param("retries", i64::from(import.options.retries));

        let mut result = self
            .graph
            .execute(query)
            .await
            .map_err(|e| GraphStoreError::import(&import.source, e))?;

        let row = result
            .next()
            .await
            .map_err(|e| GraphStoreError::import(&import.source, e))?
            .ok_or_else(|| {
                GraphStoreError::import(&import.source, "apoc.periodic.iterate returned no summary")
            })?;

        let summary = summary_result(&row, &import.source)?;
        if summary.retries > 0 {
            warn!(
                "{} import needed {} batch retries",
                import.mapping, summary.retries
            );
        }
        Ok(summary)
    }

    async fn counts(&self) -> Result<GraphCounts, GraphStoreError> {
        let mut result = self
            .graph
            .execute(Query::new(cypher::COUNT_GRAPH.to_string()))
            .await
            .map_err(|e| GraphStoreError::query(cypher::COUNT_GRAPH, e))?;

        let row = result
            .next()
            .await
            .map_err(|e| GraphStoreError::query(cypher::COUNT_GRAPH, e))?
            .ok_or_else(|| GraphStoreError::query(cypher::COUNT_GRAPH, "no rows returned"))?;

        decode_counts(&row).map_err(|e| GraphStoreError::query(cypher::COUNT_GRAPH, e))
    }

    async fn close(self) {
        // Dropping the last handle shuts the connection pool down.
        drop(self.graph);
        info!("Closed Neo4j connection to {}", self.uri);
    }
}

fn non_negative(key: &str, value: i64) -> Result<u64, String> {
    u64::try_from(value).map_err(|_| format!("{key}: negative count {value}"))
}

fn count(row: &Row, key: &str) -> Result<u64, String> {
    let value: i64 = row.get(key).map_err(|e| format!("{key}: {e}"))?;
    non_negative(key, value)
}

/// Decodes the `apoc.periodic.iterate` row; failed batches become `GraphStoreError::Import`.
fn summary_result(row: &Row, source: &str) -> Result<ImportSummary, GraphStoreError> {
    decode_summary(row)
        .map_err(|e| GraphStoreError::import(source, e))?
        .into_result(source)
}

fn decode_summary(row: &Row) -> Result<ImportSummary, String> {
    let error_messages: HashMap<String, i64> = row
        .get("errorMessages")
        .map_err(|e| format!("errorMessages: {e}"))?;

    Ok(ImportSummary {
        batches: count(row, "batches")?,
        total: count(row, "total")?,
        committed_operations: count(row, "committedOperations")?,
        failed_operations: count(row, "failedOperations")?,
        failed_batches: count(row, "failedBatches")?,
        retries: count(row, "retries")?,
        error_messages: error_messages
            .into_iter()
            .map(|(message, n)| non_negative("errorMessages", n).map(|n| (message, n)))
            .collect::<Result<BTreeMap<_, _>, _>>()?,
    })
}

fn decode_counts(row: &Row) -> Result<GraphCounts, String> {
    Ok(GraphCounts {
        movies: count(row, "movies")?,
        genres: count(row, "genres")?,
        users: count(row, "users")?,
        has_edges: count(row, "hasEdges")?,
        rated_edges: count(row, "ratedEdges")?,
        nodes: count(row, "nodes")?,
        relationships: count(row, "relationships")?,
    })
}
