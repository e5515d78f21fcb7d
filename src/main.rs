mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, ApiInfoModifier};
use crate::core::{database, middleware};
use crate::features::categories::routes as categories_routes;
use crate::features::reviews::routes as reviews_routes;
use crate::features::AppServices;
use crate::modules::storage::{MemoryStorage, PostgresStorage, Storage};
use axum::response::Redirect;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let storage = init_storage(&config).await?;
    let services = AppServices::new(storage);
    tracing::info!("Category and review services initialized");

    let app = build_router(services, &config);

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Review list available at {}",
        format!("http://{}/reviews", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store.
async fn init_storage(config: &Config) -> anyhow::Result<Arc<dyn Storage>> {
    match &config.database {
        Some(db_config) => {
            let pool = database::connect(db_config).await?;
            tracing::info!("Using PostgreSQL storage");
            Ok(Arc::new(PostgresStorage::new(pool)))
        }
        None if config.app.seed_demo_data => {
            tracing::info!("DATABASE_URL not set, using in-memory storage with demo data");
            Ok(Arc::new(MemoryStorage::with_demo_data()))
        }
        None => {
            tracing::info!("DATABASE_URL not set, using empty in-memory storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

fn build_router(services: AppServices, config: &Config) -> Router {
    let mut openapi = ApiDoc::openapi();
    ApiInfoModifier {
        title: config.api_docs.title.clone(),
        version: config.api_docs.version.clone(),
    }
    .modify(&mut openapi);

    // Simple health check endpoint
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }

    let docs_route = Router::new().route(
        "/api-docs/openapi.json",
        get(move || {
            let doc = openapi.clone();
            async move { Json(doc) }
        }),
    );

    Router::new()
        .route("/", get(|| async { Redirect::to("/reviews") }))
        .route("/health", get(health_check))
        .merge(docs_route)
        .merge(reviews_routes::routes(services.clone(), &config.ui))
        .merge(categories_routes::routes(services, &config.ui))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
