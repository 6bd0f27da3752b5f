//! End-to-end load runs against the in-memory graph store, using the MovieLens
//! sample under `tests/fixtures`.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use movie_graph_loader::{LoaderConfig, LoaderError, MovieGraphLoader};
use movie_graph_repository::{GraphStore, MemoryGraphStore, UniqueConstraint};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_rows(file: &str) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(fixtures().join("ml-latest-small").join(file)).unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[tokio::test]
async fn test_full_run_loads_movie_graph() {
    let config = LoaderConfig::default();
    let loader = MovieGraphLoader::new(MemoryGraphStore::new(fixtures()), config.import_plan());

    loader.clean().await.unwrap();
    let movies = loader.import_movies().await.unwrap();
    let ratings = loader.import_ratings().await.unwrap();
    assert_eq!(movies.total, 5);
    assert_eq!(ratings.total, 5);

    let store = loader.store();
    let counts = store.counts().await.unwrap();

    let movie_rows = fixture_rows("movies.csv");
    let genres: BTreeSet<&str> = movie_rows
        .iter()
        .flat_map(|row| row[2].split('|'))
        .collect();
    let has_edges: usize = movie_rows.iter().map(|row| row[2].split('|').count()).sum();
    assert_eq!(counts.movies, movie_rows.len() as u64);
    assert_eq!(counts.genres, genres.len() as u64);
    assert_eq!(counts.has_edges, has_edges as u64);

    let rating_rows = fixture_rows("ratings.csv");
    let pairs: HashSet<(&str, &str)> = rating_rows
        .iter()
        .map(|row| (row[0].as_str(), row[1].as_str()))
        .collect();
    assert_eq!(counts.rated_edges, pairs.len() as u64);
    assert_eq!(counts.users, 3);
    for edge in store.ratings() {
        assert!(pairs.contains(&(edge.user_id.as_str(), edge.movie_id.as_str())));
    }

    assert_eq!(
        store.constraints(),
        vec![UniqueConstraint::MOVIE_ID, UniqueConstraint::USER_ID]
    );
}

#[tokio::test]
async fn test_sample_rows_map_to_expected_patterns() {
    let loader = MovieGraphLoader::new(
        MemoryGraphStore::new(fixtures()),
        LoaderConfig::default().import_plan(),
    );
    loader.import_movies().await.unwrap();
    loader.import_ratings().await.unwrap();
    let store = loader.store();

    let toy_story = store.movie("1").unwrap();
    assert_eq!(toy_story.title.as_deref(), Some("Toy Story (1995)"));
    assert_eq!(
        store.genres_of("1"),
        vec!["Adventure", "Animation", "Children", "Comedy", "Fantasy"]
    );
    assert_eq!(
        store.movie("11").and_then(|m| m.title).as_deref(),
        Some("American President, The (1995)")
    );
    assert!(store.has_genre("(no genres listed)"));

    let rated = store.rating("1", "1").unwrap();
    assert_eq!(rated.rating.as_deref(), Some("4.0"));
    assert_eq!(rated.timestamp.as_deref(), Some("964982703"));
}

#[tokio::test]
async fn test_rerun_does_not_duplicate() {
    let plan = LoaderConfig::default().import_plan();

    let loader = MovieGraphLoader::new(MemoryGraphStore::new(fixtures()), plan);
    loader.import_movies().await.unwrap();
    loader.import_ratings().await.unwrap();
    let first = loader.store().counts().await.unwrap();

    loader.import_movies().await.unwrap();
    loader.import_ratings().await.unwrap();
    let second = loader.store().counts().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_run_reports_counts() {
    let loader = MovieGraphLoader::new(
        MemoryGraphStore::new(fixtures()),
        LoaderConfig::default().import_plan(),
    );

    let report = loader.run().await.unwrap();

    let counts = report.counts.unwrap();
    assert_eq!(counts.nodes, counts.movies + counts.genres + counts.users);
    assert_eq!(counts.relationships, counts.has_edges + counts.rated_edges);
    assert_eq!(report.movies.failed_batches, 0);
}

#[tokio::test]
async fn test_missing_ratings_keeps_movies() {
    let config = LoaderConfig::from_lookup(|key| {
        (key == "MOVIELENS_IMPORT_URI").then(|| "file:///ml-latest-small".to_string())
    })
    .unwrap();
    let mut plan = config.import_plan();
    plan.ratings.source = config.source("missing-ratings.csv");

    let loader = MovieGraphLoader::new(MemoryGraphStore::new(fixtures()), plan);
    loader.clean().await.unwrap();
    loader.import_movies().await.unwrap();
    let err = loader.import_ratings().await.unwrap_err();

    assert!(matches!(err, LoaderError::ImportRatings(_)));
    // No rollback: the movie import survives the failed ratings import.
    let counts = loader.store().counts().await.unwrap();
    assert_eq!(counts.movies, 5);
    assert_eq!(counts.rated_edges, 0);
}
