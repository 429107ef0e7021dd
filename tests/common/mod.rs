//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which lays out a media directory in a temp dir
//! and builds a full [`AppContext`] over it. [`TestHarness::with_server`]
//! starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt;
use reelshelf::config::Config;
use reelshelf::library::MediaRoot;
use reelshelf::server::{create_router, serve, AppContext};
use tempfile::TempDir;

/// Deterministic, non-repeating-per-256 byte pattern.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..=255u8).cycle().take(len).collect()
}

/// Test harness wrapping a temp media root and its [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a harness with default configuration over an empty root.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a harness with a custom configuration over an empty root.
    pub fn with_config(config: Config) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = MediaRoot::new(dir.path()).expect("failed to build media root");
        let ctx = AppContext::new(root, config);
        Self { ctx, dir }
    }

    /// Absolute path of the media root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file under the root, creating parent directories.
    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone(), None)
    }

    /// Start the server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Like [`TestHarness::with_server`], with a custom configuration.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = harness.router();
        let read_timeout = harness.ctx.config.server.read_timeout();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(serve(
            listener,
            app,
            read_timeout,
            std::future::pending::<()>(),
        ));

        (harness, addr)
    }
}

/// Collect a response body into bytes.
pub async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(body: Body) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}
