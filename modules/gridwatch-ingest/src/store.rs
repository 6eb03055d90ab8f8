//! Relational persistence for outage records.
//!
//! The store owns durability and dedup by post id; the pipeline hands it a
//! fully built record plus its embedding and nothing else. `RecordWriter`
//! is the seam between the two collaborators: embed first, insert second,
//! so a malformed record can never reach the store.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use gridwatch_common::{OutageRecord, TextEmbedder};

use crate::traits::OutageStore;

/// Idempotent schema setup.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS outages (
            id UUID PRIMARY KEY,
            post_id TEXT NOT NULL UNIQUE,
            areas TEXT[] NOT NULL,
            outage_type TEXT NOT NULL,
            status TEXT NOT NULL,
            reported_at TIMESTAMPTZ NOT NULL,
            estimated_duration TEXT,
            cause TEXT,
            post_text TEXT NOT NULL,
            confidence REAL NOT NULL,
            embedding REAL[] NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await
    .context("creating outages table")?;
    Ok(())
}

pub struct PgOutageStore {
    pool: PgPool,
}

impl PgOutageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OutageStore for PgOutageStore {
    async fn insert(&self, record: &OutageRecord, embedding: &[f32]) -> Result<()> {
        // Re-fetched posts are dropped here, not upstream: the post id is
        // the dedup key.
        sqlx::query(
            r#"
            INSERT INTO outages
                (id, post_id, areas, outage_type, status, reported_at,
                 estimated_duration, cause, post_text, confidence, embedding)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (post_id) DO NOTHING
            "#,
        )
        .bind(record.id)
        .bind(&record.post_id)
        .bind(&record.areas)
        .bind(record.outage_type.to_string())
        .bind(record.status.to_string())
        .bind(record.reported_at)
        .bind(&record.estimated_duration)
        .bind(&record.cause)
        .bind(&record.text)
        .bind(record.confidence)
        .bind(embedding)
        .execute(&self.pool)
        .await
        .context("inserting outage record")?;

        info!(post_id = %record.post_id, areas = ?record.areas, "outage record stored");
        Ok(())
    }
}

/// Embeds a record and hands it to the store. Either failure propagates;
/// a record is persisted whole or not at all.
pub struct RecordWriter {
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn OutageStore>,
}

impl RecordWriter {
    pub fn new(embedder: Arc<dyn TextEmbedder>, store: Arc<dyn OutageStore>) -> Self {
        Self { embedder, store }
    }

    pub async fn write(&self, record: &OutageRecord) -> Result<()> {
        let input = embedding_input(record);
        let embedding = self
            .embedder
            .embed(&input)
            .await
            .context("embedding outage record")?;
        self.store
            .insert(record, &embedding)
            .await
            .context("storing outage record")
    }
}

/// The embedding input: cause and post text, joined, empty parts skipped.
fn embedding_input(record: &OutageRecord) -> String {
    let parts = [record.cause.as_deref(), Some(record.text.as_str())];
    parts
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
