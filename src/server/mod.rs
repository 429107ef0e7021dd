use crate::config::Config;
use crate::library::MediaRoot;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::service::TowerToHyperService;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    timeout::RequestBodyTimeoutLayer,
    trace::TraceLayer,
};

pub mod error;
pub mod openapi;
pub mod routes_api;
pub mod routes_library;
pub mod routes_stream;

pub use error::AppError;

/// Shared application context.
///
/// Built once at startup; handlers only ever read it.
#[derive(Clone)]
pub struct AppContext {
    pub root: Arc<MediaRoot>,
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn new(root: MediaRoot, config: Config) -> Self {
        Self {
            root: Arc::new(root),
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::RANGE])
        .expose_headers([
            header::ACCEPT_RANGES,
            header::CONTENT_RANGE,
            header::CONTENT_LENGTH,
        ]);

    let read_timeout = ctx.config.server.read_timeout();

    let mut app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        // OpenAPI documentation (Swagger UI at /api/docs)
        .merge(openapi::openapi_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(RequestBodyTimeoutLayer::new(read_timeout)),
        )
        .with_state(ctx);

    // Serve the UI if a directory is provided, falling back to index.html
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        } else {
            tracing::warn!("Static directory {:?} does not exist; UI disabled", dir);
        }
    }

    app
}

fn api_routes() -> Router<AppContext> {
    routes_api::api_routes()
        .merge(routes_library::library_routes())
        .merge(routes_stream::stream_routes())
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server and run until Ctrl+C or SIGTERM.
pub async fn start_server(config: Config, root: MediaRoot) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config.server.static_dir.clone();
    let read_timeout = config.server.read_timeout();
    let ctx = AppContext::new(root, config);
    let app = create_router(ctx.clone(), static_dir);

    tracing::info!(
        "Starting server on http://{} (root={})",
        addr,
        ctx.root.path().display()
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    serve(listener, app, read_timeout, shutdown_signal()).await;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Accept connections until `shutdown` resolves.
///
/// Each connection gets `read_timeout` to deliver a complete request head.
/// Request bodies are bounded by the router's body timeout layer; responses
/// are never timed out, so long streams keep going.
pub async fn serve<F>(listener: TcpListener, app: Router, read_timeout: Duration, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _addr)) => {
                        tokio::spawn(handle_connection(stream, app.clone(), read_timeout));
                    }
                    Err(e) => {
                        tracing::debug!("Accept error: {e}");
                    }
                }
            }
            _ = &mut shutdown => break,
        }
    }
}

async fn handle_connection(stream: TcpStream, app: Router, read_timeout: Duration) {
    let io = TokioIo::new(stream);
    let hyper_service = TowerToHyperService::new(app.into_service());

    if let Err(e) = http1::Builder::new()
        .timer(TokioTimer::new())
        .header_read_timeout(read_timeout)
        .serve_connection(io, hyper_service)
        .with_upgrades()
        .await
    {
        // Covers stalled heads and clients hanging up mid-stream.
        tracing::debug!("Connection closed with error: {e}");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
