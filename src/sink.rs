//! Dataset sink: serialize a run's records to a timestamped JSON file.

use crate::record::Post;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Writes record sequences into a directory, one file per invocation.
#[derive(Debug, Clone)]
pub struct DatasetSink {
    dir: PathBuf,
}

impl DatasetSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory datasets are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the records as pretty-printed UTF-8 JSON under a unique,
    /// time-ordered name (`posts_YYYYmmdd_HHMMSS.json`, numeric suffix on
    /// a same-second collision). Returns the path written.
    pub fn write(&self, posts: &[Post]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output dir: {}", self.dir.display()))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let mut path = self.dir.join(format!("posts_{stamp}.json"));
        let mut suffix = 2u32;
        while path.exists() {
            path = self.dir.join(format!("posts_{stamp}_{suffix}.json"));
            suffix += 1;
        }

        let json = serde_json::to_string_pretty(posts)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write dataset: {}", path.display()))?;
        Ok(path)
    }
}
