//! Backend client abstraction and HTTP implementation.
//!
//! Defines the [`BackendApi`] trait — the seam between the state stores and
//! the network — and [`HttpBackend`], the reqwest implementation speaking to
//! the Sentinel REST backend:
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | [`BackendApi::send_message`] | `POST /chat` |
//! | [`BackendApi::list_sources`] | `GET /sources` |
//! | [`BackendApi::upload_file`] | `POST /upload` (multipart) |
//! | [`BackendApi::delete_source`] | `DELETE /sources/{path}` |
//! | [`BackendApi::health`] | `GET /health` |
//!
//! There is deliberately no retry or backoff: a failed request surfaces
//! immediately and the stores decide what to show. Non-2xx responses become
//! errors carrying the status and body text.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::models::{ChatReply, Source, SourceList};

/// The backend as seen by the state stores: an opaque set of calls that
/// either succeed with a typed result or fail with a transport error.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Send a chat message, optionally authenticated with an API key.
    async fn send_message(&self, content: &str, api_key: Option<&str>) -> Result<ChatReply>;

    /// Fetch the authoritative list of uploaded sources.
    async fn list_sources(&self) -> Result<Vec<Source>>;

    /// Upload one file. The server parses and indexes it; the client only
    /// ships bytes.
    async fn upload_file(&self, path: &Path) -> Result<()>;

    /// Delete a source by its path (the identity key).
    async fn delete_source(&self, path: &str) -> Result<()>;

    /// Liveness probe.
    async fn health(&self) -> Result<()>;
}

/// HTTP implementation of [`BackendApi`].
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.backend.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into an error with status and body text.
async fn error_for_status(resp: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    bail!("{} failed with {}: {}", what, status, body);
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn send_message(&self, content: &str, api_key: Option<&str>) -> Result<ChatReply> {
        let mut body = serde_json::json!({ "message": content });
        if let Some(key) = api_key {
            body["api_key"] = serde_json::Value::String(key.to_string());
        }

        debug!(url = %self.url("/chat"), "sending chat message");
        let resp = self
            .client
            .post(self.url("/chat"))
            .json(&body)
            .send()
            .await
            .context("Failed to reach backend")?;

        let resp = error_for_status(resp, "chat request").await?;
        let reply: ChatReply = resp.json().await.context("Invalid chat response body")?;
        debug!(success = reply.success, "chat reply received");
        Ok(reply)
    }

    async fn list_sources(&self) -> Result<Vec<Source>> {
        let resp = self
            .client
            .get(self.url("/sources"))
            .send()
            .await
            .context("Failed to reach backend")?;

        let resp = error_for_status(resp, "sources request").await?;
        let list: SourceList = resp.json().await.context("Invalid sources response body")?;
        debug!(count = list.sources.len(), "source list fetched");
        Ok(list.sources)
    }

    async fn upload_file(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?;

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        debug!(file = %name, size = bytes.len(), "uploading file");
        let part = reqwest::multipart::Part::bytes(bytes).file_name(name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .context("Failed to reach backend")?;

        error_for_status(resp, "upload").await?;
        Ok(())
    }

    async fn delete_source(&self, path: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/sources/{}", path)))
            .send()
            .await
            .context("Failed to reach backend")?;

        error_for_status(resp, "delete").await?;
        Ok(())
    }

    async fn health(&self) -> Result<()> {
        let resp = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .context("Failed to reach backend")?;

        error_for_status(resp, "health check").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let mut cfg = Config::minimal();
        cfg.backend.base_url = "http://localhost:8000/".to_string();
        let backend = HttpBackend::new(&cfg).unwrap();
        assert_eq!(backend.url("/chat"), "http://localhost:8000/chat");
    }

    #[test]
    fn test_url_joins_paths() {
        let backend = HttpBackend::new(&Config::minimal()).unwrap();
        assert_eq!(
            backend.url("/sources/lore.pdf"),
            "http://127.0.0.1:8000/sources/lore.pdf"
        );
    }
}
