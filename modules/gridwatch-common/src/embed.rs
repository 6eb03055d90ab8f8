use anyhow::Result;

/// Text → fixed-length vector. Implementations may be remote services or
/// local models; callers only see the vector or an error.
#[async_trait::async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
