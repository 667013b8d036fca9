//! ResultsAggregator: turn a finished session into a summary, and submit
//! the completion log in the background.
//!
//! Log submission is strictly best-effort: the results screen renders
//! whether or not the POST succeeds, so failures are logged locally and
//! never surfaced to the learner.

use serde::Serialize;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::session::{MissRecord, QuizSession};

/// Final tallies of one play-through.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    /// Questions never missed: total − |deduped misses|.
    pub first_try_correct: usize,
    pub total_attempts: usize,
    /// `round(100 * first_try_correct / total)`.
    pub percentage: u32,
    pub missed_words: Vec<MissRecord>,
    /// Displayed ratio: questions solved over every attempt taken,
    /// retries and timeouts included (e.g. "5/8").
    pub score_display: String,
}

/// Pure function of the session's terminal state; no side effects.
pub fn finalize(session: &QuizSession) -> ResultsSummary {
    let total = session.total_questions();
    let missed = session.user_answers().len();
    let first_try_correct = total.saturating_sub(missed);
    let percentage = if total == 0 {
        0
    } else {
        ((first_try_correct as f64 / total as f64) * 100.0).round() as u32
    };
    ResultsSummary {
        first_try_correct,
        total_attempts: session.total_attempts(),
        percentage,
        missed_words: session.user_answers().to_vec(),
        score_display: format!("{}/{}", total, session.total_attempts()),
    }
}

/// POST the completion log once. Any failure is logged and swallowed.
#[instrument(level = "info", skip(client, summary), fields(%quiz_id, learner = %learner_name))]
pub async fn submit_log(
    client: &reqwest::Client,
    base_url: &str,
    quiz_id: &str,
    learner_name: &str,
    summary: &ResultsSummary,
) {
    let url = format!(
        "{}/api/quizzes/{}/log",
        base_url.trim_end_matches('/'),
        quiz_id
    );
    let body = json!({
        "learnerName": learner_name,
        "correctCount": summary.first_try_correct,
        "totalAttempts": summary.total_attempts,
    });
    match client.post(&url).json(&body).send().await {
        Ok(res) if res.status().is_success() => {
            info!(target: "quiz_play", %quiz_id, "Play log submitted");
        }
        Ok(res) => {
            error!(target: "quiz_play", %quiz_id, status = %res.status(), "Play log rejected");
        }
        Err(e) => {
            error!(target: "quiz_play", %quiz_id, error = %e, "Play log submission failed");
        }
    }
}

/// Fire-and-forget wrapper: the spawned task outlives any navigation and
/// is never cancelled or awaited by the caller.
pub fn spawn_submit_log(
    client: reqwest::Client,
    base_url: String,
    quiz_id: String,
    learner_name: String,
    summary: ResultsSummary,
) {
    tokio::spawn(async move {
        submit_log(&client, &base_url, &quiz_id, &learner_name, &summary).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OtherChoice, Question};
    use crate::session::{Screen, SessionEvent};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: format!("q{i}"),
                prompt: "設問".into(),
                sentence: "（　　）です。".into(),
                choices: vec![format!("a{i}"), format!("b{i}"), format!("c{i}")],
                correct_index: 0,
                explanation: "解説。".into(),
                others: vec![OtherChoice::default(), OtherChoice::default()],
                image_url: String::new(),
            })
            .collect()
    }

    #[test]
    fn finalize_matches_the_worked_example() {
        // Five questions, one first-encounter miss, retried successfully.
        let mut s = QuizSession::with_rng(questions(5), StdRng::seed_from_u64(2));
        s.dispatch(SessionEvent::Start);
        let mut missed_once = false;
        while s.screen() != Screen::Results {
            match s.screen() {
                Screen::Playing => {
                    let q = s.current_question().unwrap();
                    let first_time = !missed_once
                        && !s.user_answers().iter().any(|m| m.question_id == q.id);
                    let idx = if first_time { 1 } else { 0 };
                    if first_time {
                        missed_once = true;
                    }
                    s.dispatch(SessionEvent::Answer { choice_index: idx });
                }
                _ => {
                    s.dispatch(SessionEvent::Next);
                }
            }
        }
        let summary = finalize(&s);
        assert_eq!(summary.first_try_correct, 4);
        assert_eq!(summary.total_attempts, 6);
        assert_eq!(summary.percentage, 80);
        assert_eq!(summary.score_display, "5/6");
        assert_eq!(summary.missed_words.len(), 1);
    }

    #[test]
    fn finalize_handles_the_all_correct_case() {
        let mut s = QuizSession::with_rng(questions(5), StdRng::seed_from_u64(3));
        s.dispatch(SessionEvent::Start);
        while s.screen() != Screen::Results {
            match s.screen() {
                Screen::Playing => {
                    s.dispatch(SessionEvent::Answer { choice_index: 0 });
                }
                _ => {
                    s.dispatch(SessionEvent::Next);
                }
            }
        }
        let summary = finalize(&s);
        assert_eq!(summary.first_try_correct, 5);
        assert_eq!(summary.percentage, 100);
        assert!(summary.missed_words.is_empty());
        assert_eq!(summary.score_display, "5/5");
    }
}
