use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // X (Twitter) API
    pub x_bearer_token: String,
    pub provider_handle: String,

    // Embeddings
    pub embedding_api_url: String,
    pub embedding_api_key: String,
    pub embedding_model: String,

    // Ingestion
    pub max_results: u32,
    pub cursor_dir: String,
    pub data_dir: String,
    pub embed_workers: usize,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            x_bearer_token: required_env("X_BEARER_TOKEN"),
            provider_handle: env::var("PROVIDER_HANDLE")
                .unwrap_or_else(|_| "reg_rwanda".to_string()),
            embedding_api_url: required_env("EMBEDDING_API_URL"),
            embedding_api_key: required_env("EMBEDDING_API_KEY"),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string()),
            max_results: env::var("MAX_RESULTS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("MAX_RESULTS must be a number"),
            cursor_dir: env::var("CURSOR_DIR").unwrap_or_else(|_| "cursors".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            embed_workers: env::var("EMBED_WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .expect("EMBED_WORKERS must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
