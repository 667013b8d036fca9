//! HTTP endpoint handlers. Thin wrappers over the store and the share
//! issuer; each handler is instrumented and logs basic result info.
//! Read access to a quiz is public on purpose: anonymous learners reach
//! the play endpoint holding only a quiz id. Everything mutating goes
//! through the admin token check.

use axum::{
    extract::{Path, State},
    http::{header::HOST, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::auth::authorize_admin;
use crate::domain::{Quiz, QuizLog};
use crate::error::AppError;
use crate::protocol::*;
use crate::share;
use crate::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
    Json(HealthOut { ok: true })
}

/// Public origin for share links: BASE_URL when configured, otherwise
/// reconstructed from the request's Host header.
fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.config.base_url {
        return url.clone();
    }
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost:3000");
    format!("http://{host}")
}

#[instrument(level = "info", skip_all)]
pub async fn list_quizzes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<QuizListOut>, AppError> {
    authorize_admin(&headers, state.config.admin_token.as_deref())?;
    let items = state.store.list_quizzes().await;
    Ok(Json(QuizListOut { items }))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Quiz>, AppError> {
    let quiz = state.store.get_quiz(&id).await?;
    info!(target: "quiz", %id, questions = quiz.questions.len(), "Quiz served");
    Ok(Json(quiz))
}

#[instrument(level = "info", skip_all, fields(title = %body.title))]
pub async fn create_quiz(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SaveQuizIn>,
) -> Result<impl IntoResponse, AppError> {
    authorize_admin(&headers, state.config.admin_token.as_deref())?;
    let quiz = state.store.create_quiz(&body.title, body.questions).await?;
    let share = share::issue(&quiz.id, &base_url(&state, &headers))?;
    Ok((
        StatusCode::CREATED,
        Json(SaveQuizOut {
            id: quiz.id,
            quiz_url: share.quiz_url,
            qr_data_url: share.qr_data_url,
        }),
    ))
}

#[instrument(level = "info", skip_all, fields(%id, title = %body.title))]
pub async fn update_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<SaveQuizIn>,
) -> Result<Json<SaveQuizOut>, AppError> {
    authorize_admin(&headers, state.config.admin_token.as_deref())?;
    let quiz = state
        .store
        .update_quiz(&id, &body.title, body.questions)
        .await?;
    let share = share::issue(&quiz.id, &base_url(&state, &headers))?;
    Ok(Json(SaveQuizOut {
        id: quiz.id,
        quiz_url: share.quiz_url,
        qr_data_url: share.qr_data_url,
    }))
}

#[instrument(level = "info", skip(state, headers), fields(%id))]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    authorize_admin(&headers, state.config.admin_token.as_deref())?;
    state.store.delete_quiz(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state, body), fields(%id, learner = %body.learner_name))]
pub async fn record_play_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PlayLogIn>,
) -> Result<Json<PlayLogAckOut>, AppError> {
    state
        .store
        .record_play_log(&id, &body.learner_name, body.correct_count, body.total_attempts)
        .await?;
    Ok(Json(PlayLogAckOut { success: true }))
}

#[instrument(level = "info", skip_all, fields(%id))]
pub async fn list_play_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<QuizLog>>, AppError> {
    authorize_admin(&headers, state.config.admin_token.as_deref())?;
    Ok(Json(state.store.list_play_logs(&id).await))
}

/// JSON 404 for anything else under /api, instead of the SPA fallback.
pub async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "APIエンドポイントが見つかりません。" })),
    )
}
