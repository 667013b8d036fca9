//! QuizStore: validated storage for quiz documents and per-learner play
//! logs.
//!
//! Everything lives in memory behind a single `RwLock`; mutations are
//! mirrored to a JSON snapshot on disk (QUIZ_DB_PATH) so data survives
//! restarts. Holding the write lock across the title-uniqueness check and
//! the insert makes conflicting author writes effectively atomic; two
//! authors cannot race the same title in.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{Question, QuestionDraft, Quiz, QuizLog, QuizSummary, MIN_QUESTIONS};
use crate::error::AppError;

#[derive(Default, Serialize, Deserialize)]
struct StoreInner {
    quizzes: HashMap<String, Quiz>,
    /// One row per (quiz_id, learner_name). Small enough to scan.
    logs: Vec<QuizLog>,
}

#[derive(Clone)]
pub struct QuizStore {
    inner: Arc<RwLock<StoreInner>>,
    path: Option<PathBuf>,
}

impl QuizStore {
    /// Purely in-memory store (tests, ephemeral deployments).
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
            path: None,
        }
    }

    /// Store backed by a JSON snapshot at `path`. A missing file starts
    /// empty; a corrupt one is an error rather than silent data loss.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(AppError::Persist)?;
            let inner: StoreInner = serde_json::from_str(&raw)
                .map_err(|e| AppError::Internal(format!("snapshot parse failed: {e}")))?;
            info!(target: "quiz", quizzes = inner.quizzes.len(), logs = inner.logs.len(), "Loaded store snapshot");
            inner
        } else {
            StoreInner::default()
        };
        Ok(Self {
            inner: Arc::new(RwLock::new(inner)),
            path: Some(path),
        })
    }

    /// Serialize the current state to disk. Called with the write lock
    /// held, via a temp file + rename so a crash never truncates the
    /// snapshot.
    fn persist(&self, inner: &StoreInner) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(inner)
            .map_err(|e| AppError::Internal(format!("snapshot encode failed: {e}")))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, raw).map_err(AppError::Persist)?;
        std::fs::rename(&tmp, path).map_err(AppError::Persist)?;
        Ok(())
    }

    /// Validate title + questions; shared by create and update.
    fn normalize_input(
        title: &str,
        drafts: Vec<QuestionDraft>,
    ) -> Result<(String, Vec<Question>), AppError> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("タイトルは必須です。"));
        }
        if drafts.len() < MIN_QUESTIONS {
            return Err(AppError::validation("問題は5問以上必要です。"));
        }
        let questions = drafts
            .into_iter()
            .enumerate()
            .map(|(i, d)| d.normalize(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((title, questions))
    }

    /// Case-insensitive title collision, optionally excluding one quiz id
    /// (the quiz being updated).
    fn find_title_owner(inner: &StoreInner, title: &str, exclude: Option<&str>) -> Option<String> {
        let needle = title.to_lowercase();
        inner
            .quizzes
            .values()
            .find(|q| q.title.to_lowercase() == needle && Some(q.id.as_str()) != exclude)
            .map(|q| q.id.clone())
    }

    #[instrument(level = "info", skip(self, drafts), fields(title = %title, count = drafts.len()))]
    pub async fn create_quiz(
        &self,
        title: &str,
        drafts: Vec<QuestionDraft>,
    ) -> Result<Quiz, AppError> {
        let (title, questions) = Self::normalize_input(title, drafts)?;

        let mut inner = self.inner.write().await;
        if let Some(existing_id) = Self::find_title_owner(&inner, &title, None) {
            warn!(target: "quiz", %existing_id, "Title collision on create");
            return Err(AppError::TitleConflict { existing_id });
        }

        let quiz = Quiz {
            id: Uuid::new_v4().to_string()[..8].to_string(),
            title,
            questions,
            created_at: Utc::now(),
        };
        inner.quizzes.insert(quiz.id.clone(), quiz.clone());
        // Memory and the snapshot must agree: undo on a failed write.
        if let Err(e) = self.persist(&inner) {
            inner.quizzes.remove(&quiz.id);
            return Err(e);
        }
        info!(target: "quiz", id = %quiz.id, questions = quiz.questions.len(), "Quiz created");
        Ok(quiz)
    }

    #[instrument(level = "info", skip(self, drafts), fields(%id, title = %title))]
    pub async fn update_quiz(
        &self,
        id: &str,
        title: &str,
        drafts: Vec<QuestionDraft>,
    ) -> Result<Quiz, AppError> {
        let (title, questions) = Self::normalize_input(title, drafts)?;

        let mut inner = self.inner.write().await;
        if !inner.quizzes.contains_key(id) {
            return Err(AppError::NotFound("更新対象が見つかりません。"));
        }
        if let Some(existing_id) = Self::find_title_owner(&inner, &title, Some(id)) {
            warn!(target: "quiz", %id, %existing_id, "Title collision on update");
            return Err(AppError::TitleConflict { existing_id });
        }

        let quiz = inner
            .quizzes
            .get_mut(id)
            .ok_or(AppError::NotFound("更新対象が見つかりません。"))?;
        let previous = quiz.clone();
        quiz.title = title;
        quiz.questions = questions;
        let updated = quiz.clone();
        if let Err(e) = self.persist(&inner) {
            inner.quizzes.insert(id.to_string(), previous);
            return Err(e);
        }
        info!(target: "quiz", %id, "Quiz updated");
        Ok(updated)
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_quiz(&self, id: &str) -> Result<Quiz, AppError> {
        self.inner
            .read()
            .await
            .quizzes
            .get(id)
            .cloned()
            .ok_or(AppError::NotFound("クイズが見つかりません。"))
    }

    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn delete_quiz(&self, id: &str) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let Some(removed) = inner.quizzes.remove(id) else {
            return Err(AppError::NotFound("削除対象が見つかりません。"));
        };
        // Orphaned play logs are useless without their quiz.
        let dropped_logs: Vec<QuizLog> = inner
            .logs
            .iter()
            .filter(|l| l.quiz_id == id)
            .cloned()
            .collect();
        inner.logs.retain(|l| l.quiz_id != id);
        if let Err(e) = self.persist(&inner) {
            inner.quizzes.insert(id.to_string(), removed);
            inner.logs.extend(dropped_logs);
            return Err(e);
        }
        info!(target: "quiz", %id, "Quiz deleted");
        Ok(())
    }

    /// Summaries of all quizzes, newest first.
    pub async fn list_quizzes(&self) -> Vec<QuizSummary> {
        let inner = self.inner.read().await;
        let mut items: Vec<QuizSummary> = inner
            .quizzes
            .values()
            .map(|q| QuizSummary {
                id: q.id.clone(),
                title: q.title.clone(),
                question_count: q.questions.len(),
                created_at: q.created_at,
            })
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    /// Upsert the play log row for (quiz_id, learner_name): `play_count`
    /// increments on every submission, the `latest_*` fields are
    /// overwritten rather than accumulated.
    #[instrument(level = "info", skip(self), fields(%quiz_id, learner = %learner_name))]
    pub async fn record_play_log(
        &self,
        quiz_id: &str,
        learner_name: &str,
        correct_count: u32,
        total_attempts: u32,
    ) -> Result<(), AppError> {
        let learner_name = learner_name.trim();
        if learner_name.is_empty() {
            return Err(AppError::validation("学習者名が必要です。"));
        }

        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let existing = inner
            .logs
            .iter()
            .position(|l| l.quiz_id == quiz_id && l.learner_name == learner_name);
        match existing {
            Some(i) => {
                let previous = inner.logs[i].clone();
                let log = &mut inner.logs[i];
                log.play_count += 1;
                log.latest_correct = correct_count;
                log.latest_total_attempts = total_attempts;
                log.updated_at = now;
                if let Err(e) = self.persist(&inner) {
                    inner.logs[i] = previous;
                    return Err(e);
                }
            }
            None => {
                inner.logs.push(QuizLog {
                    quiz_id: quiz_id.to_string(),
                    learner_name: learner_name.to_string(),
                    play_count: 1,
                    latest_correct: correct_count,
                    latest_total_attempts: total_attempts,
                    updated_at: now,
                });
                if let Err(e) = self.persist(&inner) {
                    inner.logs.pop();
                    return Err(e);
                }
            }
        }
        info!(target: "quiz", %quiz_id, learner = %learner_name, "Play log recorded");
        Ok(())
    }

    /// Play logs for one quiz, most recently updated first.
    pub async fn list_play_logs(&self, quiz_id: &str) -> Vec<QuizLog> {
        let inner = self.inner.read().await;
        let mut logs: Vec<QuizLog> = inner
            .logs
            .iter()
            .filter(|l| l.quiz_id == quiz_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        logs
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.quizzes.is_empty()
    }
}
