//! On-disk archive of fetched post batches.
//!
//! Every non-empty fetch is written out as a timestamped JSON file before
//! extraction runs, so raw source data survives independently of what the
//! pipeline makes of it. Archive failures are the caller's to log; they
//! never abort a cycle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use gridwatch_common::{RawPost, StreamKind};

pub struct PostArchive {
    dir: PathBuf,
}

#[derive(Serialize)]
struct ArchivedBatch<'a> {
    stream: StreamKind,
    fetched_at: String,
    post_count: usize,
    posts: &'a [RawPost],
}

impl PostArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write one fetched batch; returns the file path.
    pub async fn save_batch(&self, stream: StreamKind, posts: &[RawPost]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating archive dir {}", self.dir.display()))?;

        let now = Utc::now();
        let filename = format!(
            "{}_posts_{}.json",
            stream.cursor_key(),
            now.format("%Y%m%d_%H%M%S")
        );
        let path = self.dir.join(filename);

        let batch = ArchivedBatch {
            stream,
            fetched_at: now.to_rfc3339(),
            post_count: posts.len(),
            posts,
        };
        let json = serde_json::to_string_pretty(&batch).context("serializing post batch")?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("writing archive {}", path.display()))?;

        info!(stream = %stream, posts = posts.len(), path = %path.display(), "archived fetched batch");
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
