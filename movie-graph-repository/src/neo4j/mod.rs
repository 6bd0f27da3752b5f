// Neo4j module - connection, Cypher statements, and the GraphStore implementation
pub mod cypher;
mod store;

pub use store::{Neo4jConfig, Neo4jGraphStore};
