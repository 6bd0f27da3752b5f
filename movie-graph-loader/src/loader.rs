//! This module defines the `MovieGraphLoader`, which drives a fixed sequence of
//! writes against a graph store: clean, import movies, import ratings.
use std::time::Instant;

use movie_graph_repository::{BulkImport, GraphCounts, GraphStore, ImportSummary, UniqueConstraint};
use tracing::{info, warn};

use crate::errors::LoaderError;

/// The two bulk imports a run performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    pub movies: BulkImport,
    pub ratings: BulkImport,
}

/// What a successful run reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub movies: ImportSummary,
    pub ratings: ImportSummary,
    /// `None` when the store could not be counted after the imports.
    pub counts: Option<GraphCounts>,
}

/// `MovieGraphLoader` owns a graph store connection and loads the MovieLens
/// graph into it.
///
/// The loader holds the store by value. [`MovieGraphLoader::run`] consumes the
/// loader and closes the store on every exit path, so the connection is
/// released exactly once.
pub struct MovieGraphLoader<S: GraphStore> {
    store: S,
    plan: ImportPlan,
}

impl<S: GraphStore> MovieGraphLoader<S> {
    pub fn new(store: S, plan: ImportPlan) -> Self {
        Self { store, plan }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Deletes every node and relationship in the store. Irreversible.
    pub async fn clean(&self) -> Result<(), LoaderError> {
        info!("Cleaning database...");
        self.store.clean().await.map_err(LoaderError::Clean)
    }

    /// Ensures `Movie.movieId` is unique, then bulk-loads movies and their genres.
    pub async fn import_movies(&self) -> Result<ImportSummary, LoaderError> {
        info!("Create movie constraint...");
        self.store
            .ensure_constraint(&UniqueConstraint::MOVIE_ID)
            .await
            .map_err(LoaderError::ImportMovies)?;

        info!("Importing {}...", self.plan.movies.source);
        let summary = self
            .store
            .bulk_import(&self.plan.movies)
            .await
            .map_err(LoaderError::ImportMovies)?;
        log_summary("movies", &summary);
        Ok(summary)
    }

    /// Ensures `User.userId` is unique, then bulk-loads users and their ratings.
    pub async fn import_ratings(&self) -> Result<ImportSummary, LoaderError> {
        info!("Create user constraint...");
        self.store
            .ensure_constraint(&UniqueConstraint::USER_ID)
            .await
            .map_err(LoaderError::ImportRatings)?;

        info!("Importing {}...", self.plan.ratings.source);
        let summary = self
            .store
            .bulk_import(&self.plan.ratings)
            .await
            .map_err(LoaderError::ImportRatings)?;
        log_summary("ratings", &summary);
        Ok(summary)
    }

    /// Logs node and relationship counts. A failure here only warns.
    pub async fn report(&self) -> Option<GraphCounts> {
        match self.store.counts().await {
            Ok(counts) => {
                info!(
                    "Graph now holds {} movies, {} genres, {} users, {} HAS and {} RATED relationships",
                    counts.movies, counts.genres, counts.users, counts.has_edges, counts.rated_edges
                );
                Some(counts)
            }
            Err(e) => {
                warn!("Could not count the loaded graph: {}", e);
                None
            }
        }
    }

    /// Runs clean, movie import and rating import in order, then closes the store.
    ///
    /// The first failure stops the sequence; earlier phases stay applied.
    pub async fn run(self) -> Result<LoadReport, LoaderError> {
        let result = self.load().await;
        self.store.close().await;
        result
    }

    async fn load(&self) -> Result<LoadReport, LoaderError> {
        let start_time = Instant::now();

        self.clean().await?;
        let movies = self.import_movies().await?;
        let ratings = self.import_ratings().await?;
        let counts = self.report().await;

        info!("✓ Load finished in {:.2?}", start_time.elapsed());

        Ok(LoadReport {
            movies,
            ratings,
            counts,
        })
    }
}

fn log_summary(name: &str, summary: &ImportSummary) {
    info!(
        "✓ Imported {}: {} rows in {} batches ({} committed, {} retries)",
        name, summary.total, summary.batches, summary.committed_operations, summary.retries
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use movie_graph_repository::{GraphStoreError, RecordedOperation, RecordingGraphStore};

    fn plan() -> ImportPlan {
        LoaderConfig::default().import_plan()
    }

    fn full_sequence(plan: &ImportPlan) -> Vec<RecordedOperation> {
        vec![
            RecordedOperation::Clean,
            RecordedOperation::EnsureConstraint(UniqueConstraint::MOVIE_ID),
            RecordedOperation::BulkImport(plan.movies.clone()),
            RecordedOperation::EnsureConstraint(UniqueConstraint::USER_ID),
            RecordedOperation::BulkImport(plan.ratings.clone()),
            RecordedOperation::Counts,
            RecordedOperation::Close,
        ]
    }

    #[tokio::test]
    async fn test_run_issues_operations_in_order_and_closes() {
        let store = RecordingGraphStore::new();
        let journal = store.journal();
        let plan = plan();

        let report = MovieGraphLoader::new(store, plan.clone()).run().await.unwrap();

        assert_eq!(journal.operations(), full_sequence(&plan));
        assert_eq!(report.counts, Some(GraphCounts::default()));
    }

    #[tokio::test]
    async fn test_failure_stops_sequence_and_still_closes() {
        let plan = plan();
        let expected = full_sequence(&plan);

        // Every position before the count step aborts the run.
        for fail_at in 0..5 {
            let store = RecordingGraphStore::failing_at(fail_at);
            let journal = store.journal();

            let err = MovieGraphLoader::new(store, plan.clone())
                .run()
                .await
                .unwrap_err();

            let mut operations = expected[..=fail_at].to_vec();
            operations.push(RecordedOperation::Close);
            assert_eq!(journal.operations(), operations, "failure at {fail_at}");

            match (fail_at, &err) {
                (0, LoaderError::Clean(_)) => {}
                (1 | 2, LoaderError::ImportMovies(_)) => {}
                (3 | 4, LoaderError::ImportRatings(_)) => {}
                _ => panic!("Unexpected error {err:?} for failure at {fail_at}"),
            }
        }
    }

    #[tokio::test]
    async fn test_bulk_import_failure_surfaces_import_error() {
        let store = RecordingGraphStore::failing_at(4);

        let err = MovieGraphLoader::new(store, plan()).run().await.unwrap_err();

        assert!(matches!(err, LoaderError::ImportRatings(_)));
        assert!(matches!(err.store_error(), GraphStoreError::Import { .. }));
    }

    #[tokio::test]
    async fn test_count_failure_only_warns() {
        let store = RecordingGraphStore::failing_at(5);
        let journal = store.journal();
        let plan = plan();

        let report = MovieGraphLoader::new(store, plan.clone()).run().await.unwrap();

        assert_eq!(report.counts, None);
        assert_eq!(journal.operations(), full_sequence(&plan));
    }

    #[tokio::test]
    async fn test_phases_can_run_individually() {
        let store = RecordingGraphStore::new();
        let journal = store.journal();
        let plan = plan();
        let loader = MovieGraphLoader::new(store, plan.clone());

        loader.import_ratings().await.unwrap();

        assert_eq!(
            journal.operations(),
            vec![
                RecordedOperation::EnsureConstraint(UniqueConstraint::USER_ID),
                RecordedOperation::BulkImport(plan.ratings),
            ]
        );
    }
}
