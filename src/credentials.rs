//! API key storage.
//!
//! [`CredentialStore`] keeps a single opaque API key, mirrored to one file
//! on disk (default `~/.sentinel/api_key`). An empty string means "absent":
//! setting an empty key deletes the file.
//!
//! The in-memory value only changes on explicit local calls; external
//! writers (another process editing the file) are observable through
//! [`CredentialStore::stored`], a read-only snapshot that re-reads the file
//! each time. Callers choose which view they want.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct CredentialStore {
    path: PathBuf,
    api_key: String,
}

impl CredentialStore {
    /// Read the key file once and construct the store. A missing file is an
    /// empty key, not an error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let api_key = read_key(&path);
        Self { path, api_key }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The key as an optional value, for callers that pass it along.
    pub fn api_key_opt(&self) -> Option<&str> {
        if self.api_key.is_empty() {
            None
        } else {
            Some(self.api_key.as_str())
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Update the key in memory and on disk.
    ///
    /// A non-empty key is written to the file (created with mode 0600 on
    /// unix); an empty key deletes the file.
    pub fn set_api_key(&mut self, key: &str) -> Result<()> {
        self.api_key = key.to_string();

        if key.is_empty() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to remove key file: {}", self.path.display())
                    })
                }
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&self.path, key)
            .with_context(|| format!("Failed to write key file: {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)
                .with_context(|| format!("Failed to chmod key file: {}", self.path.display()))?;
        }

        Ok(())
    }

    pub fn clear_api_key(&mut self) -> Result<()> {
        self.set_api_key("")
    }

    /// Snapshot of what is currently on disk.
    ///
    /// This observes writes made by other processes without touching the
    /// in-memory value — a store that loaded a key keeps using it even if
    /// the file changes underneath.
    pub fn stored(&self) -> String {
        read_key(&self.path)
    }
}

fn read_key(path: &Path) -> String {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
        CredentialStore::load(dir.path().join("api_key"))
    }

    #[test]
    fn test_missing_file_means_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.has_api_key());
        assert_eq!(store.api_key(), "");
        assert!(store.api_key_opt().is_none());
    }

    #[test]
    fn test_set_then_has_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.set_api_key("sk-123").unwrap();
        assert!(store.has_api_key());
        assert_eq!(store.api_key_opt(), Some("sk-123"));

        store.set_api_key("").unwrap();
        assert!(!store.has_api_key());
    }

    #[test]
    fn test_key_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.set_api_key("sk-persist").unwrap();

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.api_key(), "sk-persist");
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_key");
        let mut store = CredentialStore::load(&path);

        store.set_api_key("sk-temp").unwrap();
        assert!(path.exists());

        store.clear_api_key().unwrap();
        assert!(!path.exists());
        assert!(!store.has_api_key());

        // Clearing twice is fine.
        store.clear_api_key().unwrap();
    }

    #[test]
    fn test_stored_snapshot_sees_external_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_key");
        let mut store = CredentialStore::load(&path);
        store.set_api_key("sk-local").unwrap();

        // Another process rewrites the file.
        std::fs::write(&path, "sk-external").unwrap();

        // The snapshot sees it; the in-memory value does not move.
        assert_eq!(store.stored(), "sk-external");
        assert_eq!(store.api_key(), "sk-local");
    }

    #[test]
    fn test_load_trims_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_key");
        std::fs::write(&path, "sk-123\n").unwrap();

        let store = CredentialStore::load(&path);
        assert_eq!(store.api_key(), "sk-123");
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_key");
        let mut store = CredentialStore::load(&path);
        store.set_api_key("sk-123").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
