//! Chat session state.
//!
//! [`SessionStore`] holds the ordered message list for the current process
//! run plus loading/error flags. Messages are append-only and strictly
//! chronological; nothing is deduplicated or reordered. The list lives only
//! in memory and is destroyed by [`SessionStore::clear`] or process exit.

use tracing::debug;

use crate::api::BackendApi;
use crate::models::Message;

#[derive(Default)]
pub struct SessionStore {
    messages: Vec<Message>,
    loading: bool,
    error: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Send a user message and reconcile the session with the outcome.
    ///
    /// Whitespace-only content is dropped without touching any state. The
    /// user message is appended optimistically before the network call.
    /// Afterwards, exactly one of three things happens:
    ///
    /// - the backend succeeded: an assistant message with its reply is
    ///   appended;
    /// - the backend reported an application failure (`success == false`):
    ///   the failure text becomes the error state and **no** assistant
    ///   message is appended;
    /// - the transport failed: the error state is set and a synthetic
    ///   assistant apology is appended so the conversation itself shows
    ///   something went wrong.
    ///
    /// The loading flag is cleared on every path.
    pub async fn send(&mut self, api: &dyn BackendApi, content: &str, api_key: Option<&str>) {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return;
        }

        self.messages.push(Message::user(trimmed));
        self.loading = true;
        self.error = None;

        match api.send_message(trimmed, api_key).await {
            Ok(reply) if reply.success => {
                self.messages.push(Message::assistant(reply.response));
            }
            Ok(reply) => {
                debug!(error = %reply.response, "backend reported failure");
                self.error = Some(reply.response);
            }
            Err(e) => {
                let description = e.to_string();
                debug!(error = %description, "transport failure");
                self.error = Some(description.clone());
                self.messages.push(Message::assistant(format!(
                    "Sorry, I encountered an error: {}. \
                     Please make sure the backend server is running.",
                    description
                )));
            }
        }

        // Runs on every branch above — the finally of this function.
        self.loading = false;
    }

    /// Reset the session: empty message list, no error.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.error = None;
    }
}
