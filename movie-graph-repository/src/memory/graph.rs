use std::collections::{BTreeMap, BTreeSet};

use super::rows::CsvRow;
use crate::types::{GraphCounts, RowMapping, UniqueConstraint};

/// A `Movie` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieNode {
    pub movie_id: String,
    pub title: Option<String>,
}

/// A `(:User)-[:RATED]->(:Movie)` edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedEdge {
    pub user_id: String,
    pub movie_id: String,
    pub rating: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RatingProps {
    rating: Option<String>,
    timestamp: Option<String>,
}

/// Nodes are keyed by their unique property, so every merge is an upsert and
/// the uniqueness constraints hold by construction.
#[derive(Debug, Default)]
pub(crate) struct MemoryGraph {
    movies: BTreeMap<String, Option<String>>,
    pub(crate) genres: BTreeSet<String>,
    pub(crate) users: BTreeSet<String>,
    has: BTreeSet<(String, String)>,
    rated: BTreeMap<(String, String), RatingProps>,
    pub(crate) constraints: BTreeSet<UniqueConstraint>,
}

impl MemoryGraph {
    /// Drops all nodes and edges. Constraints are schema and survive.
    pub(crate) fn clear(&mut self) {
        self.movies.clear();
        self.genres.clear();
        self.users.clear();
        self.has.clear();
        self.rated.clear();
    }

    /// Applies one row whose key columns are known to be present.
    pub(crate) fn apply(&mut self, mapping: RowMapping, row: &CsvRow) {
        match mapping {
            RowMapping::MoviesWithGenres => self.merge_movie(row),
            RowMapping::Ratings => self.merge_rating(row),
        }
    }

    fn merge_movie(&mut self, row: &CsvRow) {
        let Some(movie_id) = row.get_owned("movieId") else {
            return;
        };
        self.movies.insert(movie_id.clone(), row.get_owned("title"));

        let genres = row.get("genres").unwrap_or_default();
        for genre in genres.split('|').filter(|g| !g.is_empty()) {
            self.genres.insert(genre.to_string());
            self.has.insert((movie_id.clone(), genre.to_string()));
        }
    }

    fn merge_rating(&mut self, row: &CsvRow) {
        let (Some(user_id), Some(movie_id)) = (row.get_owned("userId"), row.get_owned("movieId"))
        else {
            return;
        };
        self.users.insert(user_id.clone());
        self.movies.entry(movie_id.clone()).or_insert(None);
        self.rated.insert(
            (user_id, movie_id),
            RatingProps {
                rating: row.get_owned("rating"),
                timestamp: row.get_owned("timestamp"),
            },
        );
    }

    pub(crate) fn movie(&self, movie_id: &str) -> Option<MovieNode> {
        self.movies.get(movie_id).map(|title| MovieNode {
            movie_id: movie_id.to_string(),
            title: title.clone(),
        })
    }

    pub(crate) fn genres_of(&self, movie_id: &str) -> Vec<String> {
        self.has
            .iter()
            .filter(|(movie, _)| movie == movie_id)
            .map(|(_, genre)| genre.clone())
            .collect()
    }

    pub(crate) fn rating(&self, user_id: &str, movie_id: &str) -> Option<RatedEdge> {
        self.rated
            .get(&(user_id.to_string(), movie_id.to_string()))
            .map(|props| RatedEdge {
                user_id: user_id.to_string(),
                movie_id: movie_id.to_string(),
                rating: props.rating.clone(),
                timestamp: props.timestamp.clone(),
            })
    }

    pub(crate) fn ratings(&self) -> Vec<RatedEdge> {
        self.rated
            .iter()
            .map(|((user_id, movie_id), props)| RatedEdge {
                user_id: user_id.clone(),
                movie_id: movie_id.clone(),
                rating: props.rating.clone(),
                timestamp: props.timestamp.clone(),
            })
            .collect()
    }

    pub(crate) fn counts(&self) -> GraphCounts {
        let movies = self.movies.len() as u64;
        let genres = self.genres.len() as u64;
        let users = self.users.len() as u64;
        let has_edges = self.has.len() as u64;
        let rated_edges = self.rated.len() as u64;

        GraphCounts {
            movies,
            genres,
            users,
            has_edges,
            rated_edges,
            nodes: movies + genres + users,
            relationships: has_edges + rated_edges,
        }
    }
}
