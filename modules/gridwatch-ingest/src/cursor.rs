//! Per-stream fetch cursors: the last externally-assigned post id
//! successfully fetched for a stream.
//!
//! Written only after a fetch that returned at least one post, with the
//! newest post's id; read at the start of the next cycle as the `since`
//! boundary. The provider and mentions streams keep fully independent state.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use gridwatch_common::StreamKind;

#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Last processed id for a stream. `None` means no prior state — a
    /// first run, not an error.
    async fn read(&self, stream: StreamKind) -> Result<Option<String>>;

    /// Record the newest processed id for a stream.
    async fn write(&self, stream: StreamKind, id: &str) -> Result<()>;
}

/// One flat file per stream under a configured directory. Writes go through
/// a temp file and an atomic rename so a crash never leaves a torn cursor.
pub struct FileCursorStore {
    dir: PathBuf,
}

impl FileCursorStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, stream: StreamKind) -> PathBuf {
        self.dir.join(format!("{}.cursor", stream.cursor_key()))
    }
}

#[async_trait]
impl CursorStore for FileCursorStore {
    async fn read(&self, stream: StreamKind) -> Result<Option<String>> {
        let path = self.path_for(stream);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let id = contents.trim().to_string();
                Ok((!id.is_empty()).then_some(id))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading cursor {}", path.display())),
        }
    }

    async fn write(&self, stream: StreamKind, id: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating cursor dir {}", self.dir.display()))?;

        let path = self.path_for(stream);
        let tmp = path.with_extension("cursor.tmp");
        tokio::fs::write(&tmp, id)
            .await
            .with_context(|| format!("writing cursor {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("committing cursor {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_before_any_write_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCursorStore::new(dir.path());
        assert_eq!(store.read(StreamKind::Provider).await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCursorStore::new(dir.path());
        store.write(StreamKind::Provider, "1912345").await.unwrap();
        assert_eq!(
            store.read(StreamKind::Provider).await.unwrap(),
            Some("1912345".to_string())
        );
    }

    #[tokio::test]
    async fn streams_do_not_share_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCursorStore::new(dir.path());
        store.write(StreamKind::Provider, "100").await.unwrap();
        assert_eq!(store.read(StreamKind::Mentions).await.unwrap(), None);

        store.write(StreamKind::Mentions, "200").await.unwrap();
        assert_eq!(
            store.read(StreamKind::Provider).await.unwrap(),
            Some("100".to_string())
        );
    }

    #[tokio::test]
    async fn cursor_survives_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileCursorStore::new(dir.path());
            store.write(StreamKind::Provider, "42").await.unwrap();
        }
        let reopened = FileCursorStore::new(dir.path());
        assert_eq!(
            reopened.read(StreamKind::Provider).await.unwrap(),
            Some("42".to_string())
        );
    }

    #[tokio::test]
    async fn rewrite_overwrites_previous_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCursorStore::new(dir.path());
        store.write(StreamKind::Mentions, "10").await.unwrap();
        store.write(StreamKind::Mentions, "11").await.unwrap();
        assert_eq!(
            store.read(StreamKind::Mentions).await.unwrap(),
            Some("11".to_string())
        );
    }
}
