//! Anaume · Japanese Quiz Backend
//!
//! - Axum HTTP API + static play/admin pages
//! - JSON-snapshot quiz store (QUIZ_DB_PATH)
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   ADMIN_TOKEN   : bearer token for authoring endpoints
//!   BASE_URL      : public origin used in share links / QR codes
//!   QUIZ_DB_PATH  : store snapshot path (default "db/quiz.json")
//!   LOG_LEVEL     : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT    : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::{error, info};

use anaume_backend::config::AppConfig;
use anaume_backend::routes::build_router;
use anaume_backend::store::QuizStore;
use anaume_backend::{seeds, telemetry, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let config = AppConfig::from_env();

    let store = match &config.db_path {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            QuizStore::open(path)?
        }
        None => QuizStore::in_memory(),
    };

    if let Err(e) = seeds::ensure_sample_quiz(&store).await {
        error!(target: "anaume_backend", error = %e, "Sample quiz seeding failed");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState {
        store,
        config: Arc::new(config),
    };
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(target: "anaume_backend", %addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(target: "anaume_backend", "Shutdown signal received");
    }
}
