//! Instance-type catalog retrieval
//!
//! The catalog is a JSON document keyed by instance-type identifier,
//! fetched over HTTP or read from a local path. Any failure here is fatal
//! before analysis starts.

use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// Fetch the raw catalog document from an http(s) URL or a filesystem
/// path.
pub async fn fetch(source: &str) -> Result<String> {
    if let Ok(url) = Url::parse(source) {
        if matches!(url.scheme(), "http" | "https") {
            return fetch_remote(url).await;
        }
    }

    std::fs::read_to_string(source)
        .with_context(|| format!("failed to read instance type catalog from {}", source))
}

async fn fetch_remote(url: Url) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("failed to create HTTP client")?;

    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("failed to fetch instance type catalog from {}", url))?;

    anyhow::ensure!(
        response.status().is_success(),
        "instance type catalog fetch returned {}",
        response.status()
    );

    response
        .text()
        .await
        .context("failed to read instance type catalog response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetches_catalog_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/types.json")
            .with_status(200)
            .with_body(r#"{"db.t3.micro": {"vcpu": 2, "mem": 1, "stdPrice": 0.017}}"#)
            .create_async()
            .await;

        let body = fetch(&format!("{}/types.json", server.url())).await.unwrap();
        assert!(body.contains("db.t3.micro"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_status_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/types.json")
            .with_status(500)
            .create_async()
            .await;

        let err = fetch(&format!("{}/types.json", server.url())).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn reads_catalog_from_local_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.json");
        std::fs::write(&path, "{}").unwrap();

        let body = fetch(path.to_str().unwrap()).await.unwrap();
        assert_eq!(body, "{}");
    }

    #[tokio::test]
    async fn missing_local_path_is_fatal() {
        assert!(fetch("/nonexistent/types.json").await.is_err());
    }
}
