//! Error types for sotto operations

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SottoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Config not found at {}", .0.display())]
    ConfigNotFound(PathBuf),
}
