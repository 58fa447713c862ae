//! Chat command runners.
//!
//! `sentinel chat` runs an interactive session over [`SessionStore`];
//! `sentinel ask` sends a single message and exits. Both load the stored
//! API key once at startup and pass it explicitly on every send — there is
//! no ambient credential state.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::api::{BackendApi, HttpBackend};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::models::Role;
use crate::session::SessionStore;

/// Interactive chat loop.
///
/// Reads one message per line from stdin. `/clear` resets the session,
/// `/quit` (or EOF) exits. When stdin is not a terminal the prompt is
/// suppressed, so the loop can be driven by a pipe.
pub async fn run_chat(config: &Config) -> Result<()> {
    let api = HttpBackend::new(config)?;
    let credentials = CredentialStore::load(&config.credentials.path);
    let mut session = SessionStore::new();

    let interactive = atty::is(atty::Stream::Stdin);
    if interactive {
        println!("Sentinel chat. /clear resets the session, /quit exits.");
        if !credentials.has_api_key() {
            println!("No API key set — run `sentinel key set <key>` for authenticated chat.");
        }
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                if interactive {
                    println!("(session cleared)");
                }
                continue;
            }
            _ => {}
        }

        send_and_print(&mut session, &api, &credentials, &line).await;
    }

    Ok(())
}

/// One-shot send: print the reply and exit nonzero if the session recorded
/// an error.
pub async fn run_ask(config: &Config, message: &str) -> Result<()> {
    let api = HttpBackend::new(config)?;
    let credentials = CredentialStore::load(&config.credentials.path);
    let mut session = SessionStore::new();

    send_and_print(&mut session, &api, &credentials, message).await;

    if session.error().is_some() {
        std::process::exit(1);
    }
    Ok(())
}

async fn send_and_print(
    session: &mut SessionStore,
    api: &dyn BackendApi,
    credentials: &CredentialStore,
    message: &str,
) {
    session.send(api, message, credentials.api_key_opt()).await;

    // A transport failure leaves an apology in the conversation; an
    // application failure leaves only the error state.
    match session.last() {
        Some(m) if m.role == Role::Assistant => println!("{}", m.content),
        _ => {}
    }
    if let Some(error) = session.error() {
        eprintln!("Error: {}", error);
    }
}
