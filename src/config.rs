use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    #[serde(default = "default_credentials_path")]
    pub path: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: default_credentials_path(),
        }
    }
}

fn default_credentials_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sentinel")
        .join("api_key")
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Globs applied when `sources add` is given a directory.
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    /// Files larger than this are rejected before any network call.
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            include_globs: default_include_globs(),
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

fn default_include_globs() -> Vec<String> {
    vec![
        "**/*.pdf".to_string(),
        "**/*.md".to_string(),
        "**/*.txt".to_string(),
    ]
}
fn default_max_file_size_mb() -> u64 {
    50
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self {
            backend: BackendConfig::default(),
            credentials: CredentialsConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate backend
    if config.backend.base_url.is_empty() {
        anyhow::bail!("backend.base_url must not be empty");
    }
    if !config.backend.base_url.starts_with("http://")
        && !config.backend.base_url.starts_with("https://")
    {
        anyhow::bail!(
            "backend.base_url must start with http:// or https:// (got '{}')",
            config.backend.base_url
        );
    }
    if config.backend.timeout_secs == 0 {
        anyhow::bail!("backend.timeout_secs must be > 0");
    }

    // Validate upload
    if config.upload.max_file_size_mb == 0 {
        anyhow::bail!("upload.max_file_size_mb must be > 0");
    }

    Ok(config)
}

/// Load the config if the file exists, otherwise fall back to defaults.
///
/// A present-but-invalid file is still an error — silently ignoring a typo'd
/// config would be worse than failing.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::minimal())
    }
}

/// Write a commented default config file for `sentinel init`.
///
/// Refuses to overwrite an existing file.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("config file already exists: {}", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let template = format!(
        r#"# Sentinel client configuration.

[backend]
# Base URL of the Sentinel backend.
base_url = "{base_url}"
# Transport timeout in seconds. There is no retry; a failed request
# surfaces immediately.
timeout_secs = {timeout}

[credentials]
# File holding the API key. Managed by `sentinel key set|clear`.
path = "{cred_path}"

[upload]
# Globs applied when `sources add` is given a directory.
include_globs = ["**/*.pdf", "**/*.md", "**/*.txt"]
# Reject files larger than this before uploading.
max_file_size_mb = {max_mb}
"#,
        base_url = default_base_url(),
        timeout = default_timeout_secs(),
        cred_path = default_credentials_path().display(),
        max_mb = default_max_file_size_mb(),
    );

    std::fs::write(path, template)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_defaults() {
        let cfg = Config::minimal();
        assert_eq!(cfg.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.backend.timeout_secs, 120);
        assert_eq!(cfg.upload.max_file_size_mb, 50);
        assert!(!cfg.upload.include_globs.is_empty());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.backend.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");
        std::fs::write(&path, "[backend]\nbase_url = \"localhost:8000\"\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");
        std::fs::write(&path, "[backend]\ntimeout_secs = 0\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_write_default_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("sentinel.toml");
        write_default_config(&path).unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.backend.base_url, "http://127.0.0.1:8000");

        // Second init must refuse to clobber.
        assert!(write_default_config(&path).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.backend.timeout_secs, 120);
    }
}
