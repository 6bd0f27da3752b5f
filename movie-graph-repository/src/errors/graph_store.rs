use thiserror::Error;

/// Represents errors that can occur while talking to a graph store.
///
/// Every variant is fatal for a load run: the loader performs no local
/// recovery and surfaces the error to its caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphStoreError {
    /// The store could not be reached or refused the session.
    #[error("Connection error ({uri}): {message}")]
    Connection { uri: String, message: String },

    /// A statement was malformed or the store faulted while running it.
    #[error("Query error ({statement}): {message}")]
    Query { statement: String, message: String },

    /// The bulk-import facility failed, or gave up on batches after its retries.
    #[error("Import error ({uri}): {message}")]
    Import { uri: String, message: String },
}

impl GraphStoreError {
    pub fn connection(uri: impl Into<String>, message: impl ToString) -> Self {
        Self::Connection {
            uri: uri.into(),
            message: message.to_string(),
        }
    }

    pub fn query(statement: impl Into<String>, message: impl ToString) -> Self {
        Self::Query {
            statement: statement.into(),
            message: message.to_string(),
        }
    }

    pub fn import(uri: impl Into<String>, message: impl ToString) -> Self {
        Self::Import {
            uri: uri.into(),
            message: message.to_string(),
        }
    }
}
