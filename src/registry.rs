//! Uploaded-source registry.
//!
//! [`SourceRegistry`] caches the backend's list of uploaded documents. It
//! never derives its own state: every mutation (upload, delete) is followed
//! by a full re-fetch of the authoritative list, so the cache can never
//! drift from the server. There are no optimistic inserts.

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use crate::api::BackendApi;
use crate::models::Source;

#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
    loading: bool,
    uploading: bool,
    error: Option<String>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the cached list with the server's authoritative one.
    ///
    /// Failures are absorbed into the error state rather than returned; the
    /// previous list is kept as-is in that case. The loading flag is cleared
    /// on every path.
    pub async fn refresh(&mut self, api: &dyn BackendApi) {
        self.loading = true;
        self.error = None;

        match api.list_sources().await {
            Ok(sources) => {
                debug!(count = sources.len(), "source list refreshed");
                self.sources = sources;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    /// Upload one file, then re-sync the list on success.
    ///
    /// On failure the error is both recorded and propagated, so a batch
    /// loop can decide whether to continue with the remaining files. No
    /// entry is added locally before the server confirms — the list only
    /// ever changes via [`refresh`](Self::refresh).
    pub async fn upload(&mut self, api: &dyn BackendApi, path: &Path) -> Result<()> {
        self.uploading = true;
        self.error = None;

        let result = api.upload_file(path).await;
        match &result {
            Ok(()) => self.refresh(api).await,
            Err(e) => self.error = Some(e.to_string()),
        }

        self.uploading = false;
        result
    }

    /// Delete a source by path, then re-sync the list on success.
    ///
    /// Same error contract as [`upload`](Self::upload).
    pub async fn remove(&mut self, api: &dyn BackendApi, path: &str) -> Result<()> {
        self.error = None;

        let result = api.delete_source(path).await;
        match &result {
            Ok(()) => self.refresh(api).await,
            Err(e) => self.error = Some(e.to_string()),
        }

        result
    }
}
