//! Domain models: quizzes, questions, per-learner play logs, and the
//! write-time normalization/validation that guards every store mutation.
//!
//! A quiz is immutable once a learner holds its id; only the authenticated
//! author path mutates quiz content. Validation happens here, before
//! anything reaches the store, so a play session can never observe a
//! half-formed question set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Marker inside `sentence` standing for the blanked-out correct choice.
pub const BLANK_MARKER: &str = "（　　）";

/// A quiz must ship at least this many questions.
pub const MIN_QUESTIONS: usize = 5;

/// Every question offers exactly three choices.
pub const CHOICE_COUNT: usize = 3;

/// Extra teaching material for one incorrect choice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherChoice {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub example: String,
}

/// A validated fill-in-the-blank question. Identity is stable across quiz
/// edits via `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub sentence: String,
    pub choices: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
    /// One entry per incorrect choice, in the order the incorrect choices
    /// appear once the correct one is removed.
    pub others: Vec<OtherChoice>,
    #[serde(default)]
    pub image_url: String,
}

impl Question {
    /// The choice the blank stands for.
    pub fn correct_choice(&self) -> &str {
        &self.choices[self.correct_index]
    }
}

/// Raw question payload as submitted by the author UI (or an external
/// generator). Everything is optional here; `normalize` decides what is
/// acceptable.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub correct_index: Option<usize>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub others: Vec<OtherChoice>,
    #[serde(default)]
    pub image_url: String,
}

impl QuestionDraft {
    /// Trim, fill defaults, and enforce the question invariants.
    /// `index` is zero-based and only used for the error message.
    pub fn normalize(self, index: usize) -> Result<Question, AppError> {
        let n = index + 1;
        let prompt = self.prompt.trim().to_string();
        let sentence = self.sentence.trim().to_string();
        let choices: Vec<String> = self.choices.iter().map(|c| c.trim().to_string()).collect();
        let explanation = self.explanation.trim().to_string();

        if prompt.is_empty() {
            return Err(AppError::validation(format!("問題{n}: 設問文は必須です。")));
        }
        if choices.len() != CHOICE_COUNT || choices.iter().any(|c| c.is_empty()) {
            return Err(AppError::validation(format!(
                "問題{n}: 選択肢は3件すべて必須です。"
            )));
        }
        for (i, c) in choices.iter().enumerate() {
            if choices[i + 1..].contains(c) {
                return Err(AppError::validation(format!(
                    "問題{n}: 選択肢が重複しています。"
                )));
            }
        }
        let correct_index = match self.correct_index {
            Some(i) if i < CHOICE_COUNT => i,
            _ => {
                return Err(AppError::validation(format!(
                    "問題{n}: 正解は1〜3から選択してください。"
                )))
            }
        };
        if explanation.is_empty() {
            return Err(AppError::validation(format!("問題{n}: 解説は必須です。")));
        }
        if sentence.matches(BLANK_MARKER).count() != 1 {
            return Err(AppError::validation(format!(
                "問題{n}: 例文には空欄「{BLANK_MARKER}」を1つだけ含めてください。"
            )));
        }

        // One teaching entry per incorrect choice; missing entries become
        // empty placeholders, matching what the author UI submits.
        let mut others: Vec<OtherChoice> = self.others;
        others.resize_with(CHOICE_COUNT - 1, OtherChoice::default);
        for o in &mut others {
            o.word = o.word.trim().to_string();
            o.usage = o.usage.trim().to_string();
            o.example = o.example.trim().to_string();
        }

        Ok(Question {
            id: self
                .id
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            prompt,
            sentence,
            choices,
            correct_index,
            explanation,
            others,
            image_url: sanitize_image_url(&self.image_url),
        })
    }
}

/// Keep only image locations we are willing to serve back to learners:
/// paths under the generated-image directory, or absolute http(s) URLs.
/// Anything else is blanked rather than rejected.
pub fn sanitize_image_url(value: &str) -> String {
    let src = value.trim();
    if src.starts_with("/images/gen/") {
        return src.to_string();
    }
    let lower = src.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return src.to_string();
    }
    String::new()
}

/// A stored quiz. `created_at` is set once at creation and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

/// List-view projection of a quiz.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub question_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Per-learner play log. One row per (quiz_id, learner_name); `latest_*`
/// reflect only the most recent play-through while `play_count`
/// accumulates across submissions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizLog {
    pub quiz_id: String,
    pub learner_name: String,
    pub play_count: u32,
    pub latest_correct: u32,
    pub latest_total_attempts: u32,
    pub updated_at: DateTime<Utc>,
}
