//! Backend health probe.

use anyhow::Result;

use crate::api::{BackendApi, HttpBackend};
use crate::config::Config;
use crate::credentials::CredentialStore;

/// Ping `GET /health` and report credential presence.
pub async fn run_status(config: &Config) -> Result<()> {
    let api = HttpBackend::new(config)?;
    let credentials = CredentialStore::load(&config.credentials.path);

    print!("backend  {:<32} ", config.backend.base_url);
    match api.health().await {
        Ok(()) => println!("online"),
        Err(e) => {
            println!("unreachable");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    println!(
        "api key  {:<32} {}",
        config.credentials.path.display(),
        if credentials.has_api_key() {
            "set"
        } else {
            "not set"
        }
    );

    Ok(())
}
