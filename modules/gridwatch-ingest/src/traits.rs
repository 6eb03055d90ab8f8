// Trait abstractions for the ingest pipeline's collaborators.
//
// PostSource — the external post-fetching service (X API in production).
// OutageStore — the relational store that owns durability and dedup.
// EntityRecognizer — optional generic NER, resolved once at startup.
//
// These enable deterministic testing with mock sources and stores:
// no network, no database.

use anyhow::Result;
use async_trait::async_trait;

use gridwatch_common::{OutageRecord, RawPost, StreamKind};

// ---------------------------------------------------------------------------
// PostSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch posts for a stream, newest first, at most `max_results`.
    ///
    /// `since_id` is an exclusive lower bound: only posts newer than it are
    /// returned. Reply context (the original post's text) is resolved for
    /// provider posts. Rate limiting is handled inside the source — it waits
    /// and retries rather than failing.
    async fn fetch(
        &self,
        stream: StreamKind,
        since_id: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<RawPost>>;
}

// ---------------------------------------------------------------------------
// OutageStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait OutageStore: Send + Sync {
    /// Persist a fully built record with its embedding. Dedup by post id is
    /// the store's concern.
    async fn insert(&self, record: &OutageRecord, embedding: &[f32]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// EntityRecognizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    /// Geopolitical entity (country, city, district).
    Gpe,
    /// Non-political location (mountain, river, region).
    Location,
    Other,
}

#[derive(Debug, Clone)]
pub struct NamedEntity {
    pub text: String,
    pub label: EntityLabel,
}

/// Generic named-entity recognition over original-case text. Optional: its
/// absence degrades location extraction to gazetteer-only matching.
pub trait EntityRecognizer: Send + Sync {
    fn entities(&self, text: &str) -> Vec<NamedEntity>;
}
