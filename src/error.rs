use sea_orm::{DbBackend, DbErr, TransactionError};
use thiserror::Error;

/// An error from building, running or comparing a query pair, or from persisting a post graph
#[derive(Error, Debug)]
pub enum LateralErr {
    /// An error from the underlying database operations
    #[error(transparent)]
    Db(#[from] DbErr),
    /// The statement uses a `LATERAL` join, which the backend cannot execute
    #[error("{scenario} requires LATERAL join support, which {backend:?} lacks")]
    LateralUnsupported {
        /// Name of the query pair
        scenario: &'static str,
        /// Backend of the connection
        backend: DbBackend,
    },
    /// A named placeholder in native SQL has no bound value
    #[error("No value bound for named parameter `:{0}`")]
    MissingParam(String),
    /// A bound value does not match any named placeholder
    #[error("Named parameter `:{0}` does not appear in the statement")]
    UnusedParam(String),
    /// Native and builder forms returned a different number of rows
    #[error("{scenario}: native query returned {native} rows but builder query returned {builder}")]
    RowCountMismatch {
        /// Name of the query pair
        scenario: &'static str,
        /// Row count of the native form
        native: usize,
        /// Row count of the builder form
        builder: usize,
    },
    /// Native and builder forms returned the same number of rows with different values
    #[error("{scenario}: rows differ, native {native} vs builder {builder}")]
    RowMismatch {
        /// Name of the query pair
        scenario: &'static str,
        /// Debug rendering of the native rows
        native: String,
        /// Debug rendering of the builder rows
        builder: String,
    },
    /// The post has no assigned id, so it cannot be written
    #[error("Post has no assigned id")]
    TransientPost,
    /// The tag was never persisted; posts do not cascade to tags
    #[error("Tag `{0}` must be persisted before it is linked to a post")]
    TransientTag(String),
    /// Invalid configuration value
    #[error("Config Error: {0}")]
    Config(String),
}

impl From<TransactionError<DbErr>> for LateralErr {
    fn from(err: TransactionError<DbErr>) -> Self {
        match err {
            TransactionError::Connection(e) | TransactionError::Transaction(e) => Self::Db(e),
        }
    }
}

impl From<TransactionError<LateralErr>> for LateralErr {
    fn from(err: TransactionError<LateralErr>) -> Self {
        match err {
            TransactionError::Connection(e) => Self::Db(e),
            TransactionError::Transaction(e) => e,
        }
    }
}
