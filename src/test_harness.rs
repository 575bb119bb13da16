//! Mock service harness for tests
//!
//! Wraps a mockito server that can play any number of shorteners and
//! uploaders at once. Shorteners share the `/api?api=<key>` base and are told
//! apart by their key; uploaders get one path each.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::Value;
use std::net::SocketAddr;

use crate::types::{ShortenerConfig, UploaderConfig};

pub struct TestHarness {
    pub server: ServerGuard,
}

impl TestHarness {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        Self { server }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Shortener config pointing at this server
    pub fn shortener(&self, name: &str, key: &str) -> ShortenerConfig {
        ShortenerConfig::new(name, format!("{}/api?api=", self.url()), key)
    }

    /// Uploader config pointing at `path` on this server
    pub fn uploader(&self, name: &str, path: &str, key: &str) -> UploaderConfig {
        UploaderConfig::new(name, format!("{}{}", self.url(), path), key)
    }

    /// Answer `GET /api?api=<key>&url=<target>` with `body`
    pub async fn mock_shortener(&mut self, key: &str, target: &str, body: Value) -> Mock {
        self.server
            .mock("GET", "/api")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api".to_string(), key.to_string()),
                Matcher::UrlEncoded("url".to_string(), target.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Shortener with `key` fails with `status` for any target
    pub async fn mock_shortener_failure(&mut self, key: &str, status: usize) -> Mock {
        self.server
            .mock("GET", "/api")
            .match_query(Matcher::UrlEncoded("api".to_string(), key.to_string()))
            .with_status(status)
            .with_body("error")
            .create_async()
            .await
    }

    /// Answer `POST <path>` carrying the key as bearer token and form field
    pub async fn mock_uploader(&mut self, path: &str, key: &str, source: &str, body: Value) -> Mock {
        self.server
            .mock("POST", path)
            .match_header("authorization", format!("Bearer {}", key).as_str())
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("url".to_string(), source.to_string()),
                Matcher::UrlEncoded("api_key".to_string(), key.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Uploader at `path` fails with `status`
    pub async fn mock_uploader_failure(&mut self, path: &str, status: usize) -> Mock {
        self.server
            .mock("POST", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"upload failed"}"#)
            .create_async()
            .await
    }

    /// Any request with `method` gets `status` and `body`
    pub async fn mock_status(&mut self, method: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, Matcher::Any)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await
    }
}

/// A TCP server that accepts connections and never answers
pub async fn hanging_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}
