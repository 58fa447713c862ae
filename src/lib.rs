//! # Sentinel Chat
//!
//! A terminal client for the Sentinel chat-with-documents backend.
//!
//! The client keeps three independent caches in front of the backend's REST
//! API: the chat session, the uploaded-source list, and the API key. Each
//! store is synchronously coordinated — an intent mutates local state, calls
//! the backend, and reconciles with the result.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────────┐
//! │   CLI    │──▶│ State stores   │──▶│  BackendApi   │──▶ REST backend
//! │(sentinel)│   │ session/sources│   │  (reqwest)    │    /chat /sources
//! └──────────┘   │ /credentials   │   └──────────────┘    /upload /health
//!                └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! sentinel init                    # write a default config
//! sentinel key set sk-...          # store the API key
//! sentinel sources add docs/       # upload documents
//! sentinel chat                    # talk to your documents
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`api`] | Backend client trait and HTTP implementation |
//! | [`session`] | Chat session store |
//! | [`registry`] | Uploaded-source registry |
//! | [`credentials`] | API key store |
//! | [`chat`] | `chat` / `ask` command runners |
//! | [`sources`] | `sources` command runners |
//! | [`key`] | `key` command runners |
//! | [`status`] | Backend health probe |

pub mod api;
pub mod chat;
pub mod config;
pub mod credentials;
pub mod key;
pub mod models;
pub mod registry;
pub mod session;
pub mod sources;
pub mod status;
