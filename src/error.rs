use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid priority: {0:?}")]
    InvalidPriority(char),

    #[error("{}:{line}: not valid UTF-8", .path.display())]
    Encoding { path: PathBuf, line: usize },

    #[error("No task at index {0}")]
    TaskIndex(usize),

    #[error("Bad tag: {0}")]
    BadTag(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Watch error: {0}")]
    Watch(String),
}

impl From<notify::Error> for TodoError {
    fn from(e: notify::Error) -> Self {
        TodoError::Watch(e.to_string())
    }
}

impl From<serde_json::Error> for TodoError {
    fn from(e: serde_json::Error) -> Self {
        TodoError::Json(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
