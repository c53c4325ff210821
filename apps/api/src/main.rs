mod config;
mod db;
mod document;
mod errors;
mod export;
mod generation;
mod llm_client;
mod models;
mod projection;
mod routes;
mod session;
mod state;
mod storage;
mod uploads;

#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::export::RedisExportQueue;
use crate::generation::LlmContentGenerator;
use crate::llm_client::LlmClient;
use crate::projection::TemplateCatalog;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;
use crate::storage::PgResumeStore;
use crate::uploads::S3PhotoStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; missing required variables abort startup
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized (export queue: {})", config.export_queue);

    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let templates = TemplateCatalog::builtin();
    info!("{} templates available", templates.all().len());

    let sessions = SessionStore::new();
    let sweep_every = config
        .session_idle_ttl
        .clamp(Duration::from_secs(1), Duration::from_secs(60));
    sessions.spawn_idle_sweeper(config.session_idle_ttl, sweep_every);
    info!(
        "Idle sessions expire after {}s",
        config.session_idle_ttl.as_secs()
    );

    let state = AppState {
        config: config.clone(),
        sessions,
        templates: Arc::new(templates),
        resumes: Arc::new(PgResumeStore::new(db)),
        photos: Arc::new(S3PhotoStore::new(
            s3,
            config.s3_bucket.clone(),
            config.s3_public_url.clone(),
        )),
        generator: Arc::new(LlmContentGenerator::new(llm)),
        exports: Arc::new(RedisExportQueue::new(redis, config.export_queue.clone())),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins once the editor frontend has a fixed host
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resume-api-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
