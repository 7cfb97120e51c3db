//! HTTP client used to fetch release artifacts.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::status::download_error;
use crate::download::ArtifactSource;

/// HTTP artifact source. Each download is a single attempt.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Downloads `url` into memory.
    #[tracing::instrument(skip(self))]
    pub async fn download_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Downloading {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(url, &e))?;

        let mut response = response
            .error_for_status()
            .map_err(|e| download_error(url, &e))?;

        // Sized by what arrives, not by the declared Content-Length.
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| download_error(url, &e))
            .context("Failed to read chunk from download stream")?
        {
            bytes.extend_from_slice(&chunk);
        }

        debug!(
            "Downloaded {:.2} MB",
            bytes.len() as f64 / (1024.0 * 1024.0)
        );

        Ok(bytes)
    }
}

#[async_trait]
impl ArtifactSource for HttpClient {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.download_bytes(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one raw HTTP response and closes the connection.
    async fn serve_raw(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}/dppm-linux-amd64", addr)
    }

    #[tokio::test]
    async fn test_download_bytes_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/dppm-linux-amd64")
            .with_status(200)
            .with_body("binary content")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let bytes = client
            .download_bytes(&format!("{}/dppm-linux-amd64", url))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, b"binary content");
    }

    #[tokio::test]
    async fn test_download_bytes_not_found_is_download_error() {
        let mut server = mockito::Server::new_async().await;
        let url = format!("{}/missing", server.url());

        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let err = client.download_bytes(&url).await.unwrap_err();

        mock.assert_async().await;
        match InstallError::find(&err) {
            Some(InstallError::Download { url: failed, reason }) => {
                assert_eq!(failed, &url);
                assert!(reason.contains("404"));
            }
            other => panic!("expected download error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_download_bytes_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let url = format!("{}/flaky", server.url());

        let mock = server
            .mock("GET", "/flaky")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result = client.download(&url).await;

        mock.assert_async().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_download_bytes_oversized_content_length_is_download_error() {
        let url = serve_raw("HTTP/1.1 200 OK\r\nContent-Length: 100000000000000\r\n\r\nabc").await;

        let client = HttpClient::new(Client::new());
        let err = client.download_bytes(&url).await.unwrap_err();

        match InstallError::find(&err) {
            Some(InstallError::Download { url: failed, .. }) => assert_eq!(failed, &url),
            other => panic!("expected download error, got {:?}", other),
        }
        assert_eq!(InstallError::find(&err).map(|e| e.exit_code()), Some(4));
    }
}
