//! Anaume · fill-in-the-blank quiz backend for Japanese-language learning.
//!
//! Server side: validated quiz storage (`store`), share links with QR
//! codes (`share`), and the HTTP API (`routes`). Client side: the play
//! state machine (`session`), results aggregation (`results`), and the
//! history snapshot bridge (`history`), all pure modules any UI layer
//! can drive.

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod history;
pub mod protocol;
pub mod results;
pub mod routes;
pub mod seeds;
pub mod session;
pub mod share;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::QuizStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: QuizStore,
    pub config: Arc<AppConfig>,
}
