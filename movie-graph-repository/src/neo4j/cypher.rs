// Cypher statements issued by the Neo4j graph store
use crate::types::{RowMapping, UniqueConstraint};

/// Cheap round-trip that forces the lazy connection pool to open a session.
pub const PING: &str = "RETURN 1";

/// Removes every node together with its relationships.
pub const DELETE_ALL: &str = "MATCH (n) DETACH DELETE n";

/// Outer statement of the periodic import: one row per CSV line.
pub const LOAD_CSV_ROWS: &str = "LOAD CSV WITH HEADERS FROM $source AS row RETURN row";

/// Merges a movie, then one genre node and one HAS edge per non-empty genre token.
pub const MERGE_MOVIE_WITH_GENRES: &str = "MERGE (m:Movie {movieId: row.movieId}) \
     SET m.title = row.title \
     FOREACH (genre IN [g IN split(row.genres, '|') WHERE g <> ''] | \
     MERGE (g:Genre {genre: genre}) \
     MERGE (m)-[:HAS]->(g))";

/// Merges the user, the rated movie and a single RATED edge per (user, movie) pair.
pub const MERGE_RATING: &str = "MERGE (u:User {userId: row.userId}) \
     MERGE (m:Movie {movieId: row.movieId}) \
     MERGE (u)-[r:RATED]->(m) \
     SET r.rating = row.rating, r.timestamp = row.timestamp";

/// Runs the mapping over the CSV rows through APOC's batch facility and yields
/// its summary row.
pub const PERIODIC_ITERATE: &str = "CALL apoc.periodic.iterate($outer, $inner, \
     {batchSize: $batchSize, parallel: $parallel, retries: $retries, params: {source: $source}}) \
     YIELD batches, total, committedOperations, failedOperations, failedBatches, retries, errorMessages \
     RETURN batches, total, committedOperations, failedOperations, failedBatches, retries, errorMessages";

pub const COUNT_GRAPH: &str = "CALL { MATCH (m:Movie) RETURN count(m) AS movies } \
     CALL { MATCH (g:Genre) RETURN count(g) AS genres } \
     CALL { MATCH (u:User) RETURN count(u) AS users } \
     CALL { MATCH (:Movie)-[h:HAS]->(:Genre) RETURN count(h) AS hasEdges } \
     CALL { MATCH (:User)-[r:RATED]->(:Movie) RETURN count(r) AS ratedEdges } \
     CALL { MATCH (n) RETURN count(n) AS nodes } \
     CALL { MATCH ()-[r]->() RETURN count(r) AS relationships } \
     RETURN movies, genres, users, hasEdges, ratedEdges, nodes, relationships";

/// Per-row statement applied by the batch facility for a mapping.
pub fn mapping_statement(mapping: RowMapping) -> &'static str {
    match mapping {
        RowMapping::MoviesWithGenres => MERGE_MOVIE_WITH_GENRES,
        RowMapping::Ratings => MERGE_RATING,
    }
}

/// `CREATE CONSTRAINT ... IF NOT EXISTS`, so re-running it is a no-op.
pub fn create_unique_constraint(constraint: &UniqueConstraint) -> String {
    format!(
        "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{}) REQUIRE n.{} IS UNIQUE",
        constraint.name(),
        constraint.label,
        constraint.property
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_unique_constraint() {
        assert_eq!(
            create_unique_constraint(&UniqueConstraint::MOVIE_ID),
            "CREATE CONSTRAINT movie_movieId_unique IF NOT EXISTS FOR (n:Movie) REQUIRE n.movieId IS UNIQUE"
        );
        assert_eq!(
            create_unique_constraint(&UniqueConstraint::USER_ID),
            "CREATE CONSTRAINT user_userId_unique IF NOT EXISTS FOR (n:User) REQUIRE n.userId IS UNIQUE"
        );
    }

    #[test]
    fn test_mapping_statements_merge_on_keys() {
        let movies = mapping_statement(RowMapping::MoviesWithGenres);
        assert!(movies.starts_with("MERGE (m:Movie {movieId: row.movieId})"));
        assert!(movies.contains("split(row.genres, '|')"));
        assert!(movies.contains("MERGE (m)-[:HAS]->(g)"));

        let ratings = mapping_statement(RowMapping::Ratings);
        assert!(ratings.contains("MERGE (u)-[r:RATED]->(m)"));
        assert!(ratings.contains("SET r.rating = row.rating, r.timestamp = row.timestamp"));
    }

    #[test]
    fn test_periodic_iterate_passes_source_as_param() {
        assert!(LOAD_CSV_ROWS.contains("FROM $source"));
        assert!(PERIODIC_ITERATE.contains("params: {source: $source}"));
        assert!(PERIODIC_ITERATE.contains("retries: $retries"));
        assert!(PERIODIC_ITERATE.contains("YIELD batches"));
    }
}
