//! Recording output file port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::OutputTarget;

/// Output file errors
#[derive(Debug, Clone, Error)]
pub enum OutputError {
    #[error("Failed to open output file {}: {message}", .path.display())]
    Open { path: PathBuf, message: String },

    #[error("Failed to close output file {}: {message}", .path.display())]
    Close { path: PathBuf, message: String },
}

/// Port that hands out the file the encoder writes into
#[async_trait]
pub trait OutputFiles: Send + Sync {
    /// Create (or truncate) the file at the target's path
    async fn open(&self, target: &OutputTarget) -> Result<Box<dyn OutputFile>, OutputError>;
}

/// An open output file
#[async_trait]
pub trait OutputFile: Send + Sync {
    fn path(&self) -> &Path;

    /// Flush and close. Closing twice is a no-op.
    async fn close(&self) -> Result<(), OutputError>;
}
