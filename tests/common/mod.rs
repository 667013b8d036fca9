use std::sync::Arc;

use anaume_backend::config::AppConfig;
use anaume_backend::domain::{OtherChoice, QuestionDraft};
use anaume_backend::store::QuizStore;
use anaume_backend::AppState;

pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

pub fn test_config(admin_token: Option<&str>) -> AppConfig {
    AppConfig {
        port: 0,
        admin_token: admin_token.map(str::to_string),
        base_url: Some("http://quiz.test".to_string()),
        db_path: None,
    }
}

pub fn test_state(admin_token: Option<&str>) -> AppState {
    AppState {
        store: QuizStore::in_memory(),
        config: Arc::new(test_config(admin_token)),
    }
}

/// `n` structurally valid drafts with distinct choices per question.
pub fn draft_questions(n: usize) -> Vec<QuestionDraft> {
    (0..n)
        .map(|i| QuestionDraft {
            id: Some(format!("q{i}")),
            prompt: format!("設問 {}", i + 1),
            sentence: "今日は（　　）晴れている。".to_string(),
            choices: vec![
                format!("せいかい{i}"),
                format!("はずれA{i}"),
                format!("はずれB{i}"),
            ],
            correct_index: Some(0),
            explanation: "正解の理由の説明。".to_string(),
            others: vec![OtherChoice::default(), OtherChoice::default()],
            image_url: String::new(),
        })
        .collect()
}
