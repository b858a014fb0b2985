//! Filesystem output adapter

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ports::{OutputError, OutputFile, OutputFiles};
use crate::domain::recording::OutputTarget;

/// Creates recording files on the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FileOutputs;

impl FileOutputs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputFiles for FileOutputs {
    async fn open(&self, target: &OutputTarget) -> Result<Box<dyn OutputFile>, OutputError> {
        let path = target.path.clone();
        let open_error = |e: std::io::Error| OutputError::Open {
            path: path.clone(),
            message: e.to_string(),
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(open_error)?;
        }

        let file = File::create(&path).await.map_err(open_error)?;
        debug!(path = %path.display(), "Output file opened");

        Ok(Box::new(LocalFile {
            path,
            file: Mutex::new(Some(file)),
        }))
    }
}

/// An open file; closing syncs it to disk
struct LocalFile {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

#[async_trait]
impl OutputFile for LocalFile {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn close(&self) -> Result<(), OutputError> {
        let Some(file) = self.file.lock().await.take() else {
            return Ok(());
        };
        file.sync_all().await.map_err(|e| OutputError::Close {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %self.path.display(), "Output file closed");
        Ok(())
    }
}
