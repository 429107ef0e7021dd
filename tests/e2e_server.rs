//! Server end-to-end tests
//!
//! Runs the router on a real socket and talks to it over HTTP.

mod common;

use common::{pattern, TestHarness};
use reelshelf::config::Config;
use reqwest::{header, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Duration};

fn short_read_timeout() -> Config {
    let mut config = Config::default();
    config.server.read_timeout_secs = 1;
    config
}

#[tokio::test]
async fn test_range_request_over_http() {
    let (h, addr) = TestHarness::with_server().await;
    let data = pattern(500);
    h.write("video.mp4", &data);

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/api/stream?path=video.mp4", addr))
        .header(header::RANGE, "bytes=100-199")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).unwrap(),
        "bytes 100-199/500"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );
    let body = response.bytes().await.unwrap();
    assert_eq!(&body[..], &data[100..200]);
}

#[tokio::test]
async fn test_full_download_over_http() {
    let (h, addr) = TestHarness::with_server().await;
    let data = pattern(256 * 1024 + 17);
    h.write("big.mkv", &data);

    let response = reqwest::get(format!("http://{}/api/stream?path=big.mkv", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCEPT_RANGES).unwrap(),
        "bytes"
    );
    let body = response.bytes().await.unwrap();
    assert_eq!(body.len(), data.len());
    assert_eq!(&body[..], &data[..]);
}

#[tokio::test]
async fn test_client_disconnect_mid_stream() {
    let (h, addr) = TestHarness::with_server().await;
    h.write("huge.mp4", &pattern(8 * 1024 * 1024));
    h.write("small.mp4", b"still serving");

    let client = reqwest::Client::new();
    let mut response = client
        .get(format!("http://{}/api/stream?path=huge.mp4", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Read a little, then hang up.
    let first = response.chunk().await.unwrap();
    assert!(first.is_some());
    drop(response);
    drop(client);

    let response = timeout(
        Duration::from_secs(10),
        reqwest::get(format!("http://{}/api/stream?path=small.mp4", addr)),
    )
    .await
    .expect("server stopped responding after disconnect")
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "still serving");
}

#[tokio::test]
async fn test_cors_exposes_range_headers() {
    let (h, addr) = TestHarness::with_server().await;
    h.write("video.mp4", &pattern(10));

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/api/stream?path=video.mp4", addr))
        .header(header::ORIGIN, "http://example.com")
        .header(header::RANGE, "bytes=0-4")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
    let exposed = response
        .headers()
        .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_lowercase();
    assert!(exposed.contains("content-range"));
}

#[tokio::test]
async fn test_tree_over_http() {
    let (h, addr) = TestHarness::with_server().await;
    h.write("a.mp4", &pattern(3));

    let json: serde_json::Value = reqwest::get(format!("http://{}/api/tree", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let name = h.root().file_name().unwrap().to_str().unwrap();
    assert_eq!(json[name]["a.mp4"], 3);
}

#[tokio::test]
async fn test_stalled_request_head_is_closed() {
    let (_h, addr) = TestHarness::with_server_config(short_read_timeout()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    // No terminating blank line, so the head never completes.
    stream
        .write_all(b"GET /api/tree HTTP/1.1\r\nHost: x\r\n")
        .await
        .unwrap();

    let mut buf = [0u8; 1024];
    let read = timeout(Duration::from_secs(5), stream.read(&mut buf))
        .await
        .expect("connection still open after the read timeout");
    // A close, a reset or a 408 all end the exchange without serving it.
    if let Ok(n) = read {
        let text = String::from_utf8_lossy(&buf[..n]);
        assert!(n == 0 || text.starts_with("HTTP/1.1 408"), "got {text:?}");
    }
}

#[tokio::test]
async fn test_stalled_request_body_is_rejected() {
    let (h, addr) = TestHarness::with_server_config(short_read_timeout()).await;
    h.write("a.mp4", b"video");

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"POST /api/rename HTTP/1.1\r\nHost: x\r\n\
              Content-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"path\":",
        )
        .await
        .unwrap();

    let mut response = Vec::new();
    let mut buf = [0u8; 1024];
    let result = timeout(Duration::from_secs(5), async {
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    response.extend_from_slice(&buf[..n]);
                    if response.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
            }
        }
    })
    .await;
    assert!(result.is_ok(), "stalled body was never timed out");

    let text = String::from_utf8_lossy(&response);
    assert!(text.starts_with("HTTP/1.1 400"), "got {text:?}");
    assert!(h.root().join("a.mp4").exists());
}

#[tokio::test]
async fn test_slow_reader_outlives_read_timeout() {
    let (h, addr) = TestHarness::with_server_config(short_read_timeout()).await;
    let data = pattern(4 * 1024 * 1024);
    h.write("long.mp4", &data);

    let response = reqwest::get(format!("http://{}/api/stream?path=long.mp4", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Stall well past the read timeout before draining the body.
    sleep(Duration::from_millis(2500)).await;

    let body = response.bytes().await.unwrap();
    assert_eq!(body.len(), data.len());
    assert_eq!(&body[..], &data[..]);
}
