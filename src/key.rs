//! API key command runners.

use anyhow::Result;

use crate::config::Config;
use crate::credentials::CredentialStore;

pub fn run_key_set(config: &Config, key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key must not be empty (use `sentinel key clear` to remove it)");
    }

    let mut store = CredentialStore::load(&config.credentials.path);
    store.set_api_key(key)?;
    println!("API key saved to {}", config.credentials.path.display());
    Ok(())
}

pub fn run_key_clear(config: &Config) -> Result<()> {
    let mut store = CredentialStore::load(&config.credentials.path);
    store.clear_api_key()?;
    println!("API key cleared");
    Ok(())
}

pub fn run_key_status(config: &Config) -> Result<()> {
    let store = CredentialStore::load(&config.credentials.path);
    if store.has_api_key() {
        println!("API key: {} (set)", mask(store.api_key()));
    } else {
        println!("API key: not set");
    }
    Ok(())
}

/// Show enough of the key to recognize it, never the whole thing.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_short_key() {
        assert_eq!(mask("abc"), "***");
    }

    #[test]
    fn test_mask_long_key() {
        assert_eq!(mask("sk-1234567890abcdef"), "sk-1…cdef");
    }
}
