//! Error taxonomy shared by the store and the HTTP surface.
//!
//! Validation and not-found errors carry the human-readable message shown
//! verbatim in the author UI; they are never retried automatically.
//! Title conflicts additionally carry the id of the quiz already owning
//! the title so the caller can offer overwrite-vs-rename.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing required fields (400).
    #[error("{0}")]
    Validation(String),

    /// Unknown quiz id (404).
    #[error("{0}")]
    NotFound(&'static str),

    /// Another quiz already owns the (case-insensitive) title (409).
    #[error("同じタイトルのクイズが既に存在します。")]
    TitleConflict { existing_id: String },

    /// Missing or invalid admin credentials on a mutating endpoint (401).
    #[error("管理者認証に失敗しました。")]
    Unauthorized,

    /// ADMIN_TOKEN not configured at all; mutating endpoints are disabled (503).
    #[error("管理者認証が未設定です。ADMIN_TOKEN を設定してください。")]
    AuthNotConfigured,

    /// Snapshot persistence failure (500).
    #[error("保存に失敗しました。")]
    Persist(#[source] std::io::Error),

    /// Anything else that is fatal to the request (500).
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::TitleConflict { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::AuthNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Persist(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(target: "anaume_backend", error = %self, "request failed");
        }
        let body = match &self {
            AppError::TitleConflict { existing_id } => json!({
                "message": self.to_string(),
                "conflictQuizId": existing_id,
            }),
            _ => json!({ "message": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_the_taxonomy() {
        assert_eq!(
            AppError::validation("x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("クイズが見つかりません。").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::TitleConflict { existing_id: "a".into() }.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::AuthNotConfigured.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
