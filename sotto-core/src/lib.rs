//! Sotto Core - Spoken filename resolution
//!
//! This library provides the core functionality for indexing a directory
//! tree and rewriting speech-to-text transcripts so that spoken file
//! references ("open main dot p y") become canonical relative paths
//! ("open @src/main.py").

pub mod config;
pub mod error;
pub mod index;
pub mod rewrite;

pub use config::Config;
pub use error::SottoError;
pub use index::{FileIndex, TreeIndex, TreeReport};
pub use rewrite::{resolve_spoken, rewrite_transcript, Rewrite, PATH_MARKER};

/// Result type alias for sotto operations
pub type Result<T> = std::result::Result<T, SottoError>;
