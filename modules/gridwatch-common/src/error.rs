use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridWatchError {
    #[error("Post source error: {0}")]
    Source(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Cursor error: {0}")]
    Cursor(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
