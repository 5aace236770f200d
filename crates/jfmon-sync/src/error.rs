//! Synchronization error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Interval for {task} must be greater than zero")]
    InvalidInterval { task: &'static str },

    #[error("Invalid view state: {0}")]
    Core(#[from] jfmon_core::CoreError),
}

pub type SyncResult<T> = Result<T, SyncError>;
