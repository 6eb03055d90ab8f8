//! Embedding dispatch.
//!
//! The embedding service is consumed as an opaque `embed(text) -> vector`
//! collaborator. `HttpEmbedder` talks to an OpenAI-compatible endpoint;
//! `BoundedEmbedder` caps in-flight embedding work so a burst of records
//! never starves the rest of the pipeline. Callers block on completion and
//! always get a whole vector or an error.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tokio::sync::Semaphore;

pub use gridwatch_common::TextEmbedder;

/// Embedder backed by an OpenAI-compatible `/embeddings` endpoint.
pub struct HttpEmbedder {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl TextEmbedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .http
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": text,
            }))
            .send()
            .await
            .context("embedding request failed")?
            .error_for_status()
            .context("embedding service returned an error")?;

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .context("malformed embedding response")?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .unwrap_or_default();
        if vector.is_empty() {
            bail!("embedding service returned an empty vector");
        }
        Ok(vector)
    }
}

/// Caps concurrent embedding dispatches. Callers acquire a permit, then
/// block on the inner embedder's completion.
pub struct BoundedEmbedder {
    inner: Arc<dyn TextEmbedder>,
    permits: Semaphore,
}

impl BoundedEmbedder {
    pub fn new(inner: Arc<dyn TextEmbedder>, workers: usize) -> Self {
        Self {
            inner,
            permits: Semaphore::new(workers.max(1)),
        }
    }
}

#[async_trait::async_trait]
impl TextEmbedder for BoundedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let _permit = self
            .permits
            .acquire()
            .await
            .context("embedding pool closed")?;
        self.inner.embed(text).await
    }
}

/// No-op embedder for contexts that don't need embeddings (tests, dry runs).
pub struct NoOpEmbedder;

#[async_trait::async_trait]
impl TextEmbedder for NoOpEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![])
    }
}
