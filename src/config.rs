//! Environment-driven configuration, read once at startup.
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   ADMIN_TOKEN   : bearer token for authoring endpoints (unset = disabled)
//!   BASE_URL      : public origin for share links (falls back to the
//!                   request's Host header)
//!   QUIZ_DB_PATH  : JSON snapshot path (default "db/quiz.json"; unset to
//!                   "" for a purely in-memory store)

use std::path::PathBuf;

use tracing::info;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub admin_token: Option<String>,
    pub base_url: Option<String>,
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let admin_token = std::env::var("ADMIN_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let base_url = std::env::var("BASE_URL")
            .ok()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());

        let db_path = match std::env::var("QUIZ_DB_PATH") {
            Ok(p) if p.trim().is_empty() => None,
            Ok(p) => Some(PathBuf::from(p)),
            Err(_) => Some(PathBuf::from("db/quiz.json")),
        };

        let cfg = Self {
            port,
            admin_token,
            base_url,
            db_path,
        };
        info!(
            target: "anaume_backend",
            port = cfg.port,
            admin_auth = cfg.admin_token.is_some(),
            persistent = cfg.db_path.is_some(),
            "Configuration loaded"
        );
        cfg
    }
}
