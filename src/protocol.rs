//! Public request/response DTOs for the HTTP API (serde ready).
//! Kept small and stable so the play page and admin UI can evolve
//! independently of the backend internals.

use serde::{Deserialize, Serialize};

use crate::domain::{QuestionDraft, QuizSummary};

/// Body of POST /api/quizzes and PUT /api/quizzes/:id.
#[derive(Debug, Deserialize)]
pub struct SaveQuizIn {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

/// Response to a successful create/update: the id plus share material.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveQuizOut {
    pub id: String,
    pub quiz_url: String,
    pub qr_data_url: String,
}

#[derive(Debug, Serialize)]
pub struct QuizListOut {
    pub items: Vec<QuizSummary>,
}

/// Body of POST /api/quizzes/:id/log (public, submitted by the results
/// screen exactly once per completed play-through).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayLogIn {
    #[serde(default)]
    pub learner_name: String,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub total_attempts: u32,
}

#[derive(Debug, Serialize)]
pub struct PlayLogAckOut {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
