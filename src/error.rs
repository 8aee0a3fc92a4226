//! Error type shared by the store and the task operations.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// Row index past the end of the collection
    #[error("task index {index} out of range (collection has {len} tasks)")]
    OutOfRange { index: usize, len: usize },

    #[error("task description must not be empty")]
    EmptyDescription,

    /// Writing or preparing the storage file failed
    #[error("persistence failure: {0}")]
    Io(#[from] io::Error),

    #[error("serialization failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
