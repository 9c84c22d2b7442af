pub mod check;
pub mod export;
pub mod filter;
pub mod lookup;
pub mod stats;
pub mod task_ops;

use crate::io::store::StoreError;
use crate::model::task::InvalidStatus;

/// Error type for command-level operations
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("no matching tasks found")]
    NoMatch,
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),
    #[error(transparent)]
    Store(#[from] StoreError),
}
