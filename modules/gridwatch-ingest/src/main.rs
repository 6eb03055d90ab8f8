use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridwatch_common::Config;
use gridwatch_ingest::archive::PostArchive;
use gridwatch_ingest::assembler::OutageAssembler;
use gridwatch_ingest::cursor::FileCursorStore;
use gridwatch_ingest::embedder::{BoundedEmbedder, HttpEmbedder};
use gridwatch_ingest::extractor::LocationExtractor;
use gridwatch_ingest::gazetteer;
use gridwatch_ingest::ingestor::Ingestor;
use gridwatch_ingest::source::XApiSource;
use gridwatch_ingest::store::{self, PgOutageStore, RecordWriter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("gridwatch_ingest=info".parse()?),
        )
        .init();

    info!("GridWatch ingest starting...");

    // Load config
    let config = Config::from_env();

    // Connect to Postgres and run migrations
    let pool = PgPool::connect(&config.database_url).await?;
    store::migrate(&pool).await?;

    // Wire collaborators. No entity recognizer is configured by default;
    // extraction degrades to gazetteer-only matching.
    let source = Arc::new(XApiSource::new(
        &config.x_bearer_token,
        &config.provider_handle,
    ));
    let embedder = Arc::new(BoundedEmbedder::new(
        Arc::new(HttpEmbedder::new(
            &config.embedding_api_url,
            &config.embedding_api_key,
            &config.embedding_model,
        )),
        config.embed_workers,
    ));
    let writer = RecordWriter::new(embedder, Arc::new(PgOutageStore::new(pool)));
    let assembler = OutageAssembler::new(LocationExtractor::new(
        gazetteer::rwanda_gazetteer(),
        None,
    ));
    let cursors = Arc::new(FileCursorStore::new(&config.cursor_dir));
    let archive = PostArchive::new(&config.data_dir);

    let ingestor = Ingestor::new(
        source,
        cursors,
        assembler,
        writer,
        Some(archive),
        config.max_results,
    );

    let stats = ingestor.run_cycle().await;
    info!("{stats}");

    Ok(())
}
