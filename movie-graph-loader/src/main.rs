use anyhow::Result;
use movie_graph_loader::{LoaderConfig, LoaderError, MovieGraphLoader};
use movie_graph_repository::Neo4jGraphStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Entry point: wipes the configured Neo4j database and loads MovieLens into it.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = LoaderConfig::from_env()?;

    info!("Connecting to Neo4j at {}...", config.neo4j.uri);
    let store = Neo4jGraphStore::connect(&config.neo4j)
        .await
        .map_err(LoaderError::Connect)?;

    let loader = MovieGraphLoader::new(store, config.import_plan());
    let report = loader.run().await?;

    info!(
        "Load complete: {} movie rows, {} rating rows",
        report.movies.total, report.ratings.total
    );
    Ok(())
}
