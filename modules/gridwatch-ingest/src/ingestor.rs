//! Pipeline orchestration: one fetch cycle over both post streams.
//!
//! Per stream: read cursor → fetch → advance cursor (non-empty fetch only)
//! → archive the batch → per post: correlate, assemble, embed + store.
//! Streams are independent; a failing stream is logged and skipped for the
//! cycle, never fatal to the process.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use gridwatch_common::StreamKind;

use crate::archive::PostArchive;
use crate::assembler::OutageAssembler;
use crate::cursor::CursorStore;
use crate::store::RecordWriter;
use crate::traits::PostSource;

/// Counters for one ingest cycle.
#[derive(Debug, Default)]
pub struct IngestStats {
    pub posts_fetched: u32,
    pub records_built: u32,
    pub records_stored: u32,
    pub skipped_no_location: u32,
    pub streams_failed: u32,
}

impl std::fmt::Display for IngestStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Ingest Cycle Complete ===")?;
        writeln!(f, "Posts fetched:       {}", self.posts_fetched)?;
        writeln!(f, "Records built:       {}", self.records_built)?;
        writeln!(f, "Records stored:      {}", self.records_stored)?;
        writeln!(f, "Skipped (no area):   {}", self.skipped_no_location)?;
        writeln!(f, "Streams failed:      {}", self.streams_failed)?;
        Ok(())
    }
}

pub struct Ingestor {
    source: Arc<dyn PostSource>,
    cursors: Arc<dyn CursorStore>,
    assembler: OutageAssembler,
    writer: RecordWriter,
    archive: Option<PostArchive>,
    max_results: u32,
}

impl Ingestor {
    pub fn new(
        source: Arc<dyn PostSource>,
        cursors: Arc<dyn CursorStore>,
        assembler: OutageAssembler,
        writer: RecordWriter,
        archive: Option<PostArchive>,
        max_results: u32,
    ) -> Self {
        Self {
            source,
            cursors,
            assembler,
            writer,
            archive,
            max_results,
        }
    }

    /// Run one full cycle: provider timeline, then mentions.
    pub async fn run_cycle(&self) -> IngestStats {
        let mut stats = IngestStats::default();

        for stream in [StreamKind::Provider, StreamKind::Mentions] {
            if let Err(e) = self.process_stream(stream, &mut stats).await {
                error!(stream = %stream, error = %e, "stream cycle failed");
                stats.streams_failed += 1;
            }
        }

        stats
    }

    async fn process_stream(&self, stream: StreamKind, stats: &mut IngestStats) -> Result<()> {
        let since = self
            .cursors
            .read(stream)
            .await
            .with_context(|| format!("reading {stream} cursor"))?;

        let posts = self
            .source
            .fetch(stream, since.as_deref(), self.max_results)
            .await
            .with_context(|| format!("fetching {stream} stream"))?;

        if posts.is_empty() {
            debug!(stream = %stream, "no new posts");
            return Ok(());
        }

        // Streams return newest first; the head id is the next cycle's
        // `since` boundary. Written before processing so a post that yields
        // nothing is never refetched.
        self.cursors
            .write(stream, &posts[0].id)
            .await
            .with_context(|| format!("advancing {stream} cursor"))?;

        if let Some(archive) = &self.archive {
            if let Err(e) = archive.save_batch(stream, &posts).await {
                error!(stream = %stream, error = %e, "failed to archive batch");
            }
        }

        info!(stream = %stream, posts = posts.len(), "processing fetched posts");
        stats.posts_fetched += posts.len() as u32;

        for post in &posts {
            match self.assembler.process(post) {
                Some(record) => {
                    stats.records_built += 1;
                    self.writer
                        .write(&record)
                        .await
                        .with_context(|| format!("writing record for post {}", post.id))?;
                    stats.records_stored += 1;
                }
                None => stats.skipped_no_location += 1,
            }
        }

        Ok(())
    }
}
