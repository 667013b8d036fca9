//! HistoryBridge: serialize/deserialize adapter between QuizSession and
//! browser-style history entries.
//!
//! A snapshot is captured after every transition the UI initiates and
//! pushed as the history entry's state payload; on back/forward
//! navigation the payload is restored into a fresh session and the target
//! screen re-rendered without pushing again. Navigation never reaches
//! into scoring: this module only copies fields in and out.
//!
//! Restoring a `Playing` screen re-arms a full 30-second countdown; the
//! originally elapsed time is not preserved.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Question;
use crate::session::{MissRecord, QuizSession, Screen};

/// Everything needed to rebuild the session at one point in the flow.
/// Questions themselves are not serialized, only ids; the immutable
/// question set is re-supplied on restore.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub screen_id: Screen,
    pub solved_count: usize,
    pub remaining_question_ids: Vec<String>,
    pub current_question_id: Option<String>,
    pub last_answer_correct: Option<bool>,
    pub user_answers: Vec<MissRecord>,
    pub total_attempts: usize,
    #[serde(default)]
    pub is_replay_mode: bool,
}

impl SessionSnapshot {
    pub fn capture(session: &QuizSession) -> Self {
        Self {
            screen_id: session.screen(),
            solved_count: session.solved_count(),
            remaining_question_ids: session.remaining_question_ids().to_vec(),
            current_question_id: session.current_question_id().map(str::to_string),
            last_answer_correct: session.last_answer_correct(),
            user_answers: session.user_answers().to_vec(),
            total_attempts: session.total_attempts(),
            is_replay_mode: session.is_replay_mode(),
        }
    }

    /// Rebuild a session against the (unchanged) question set. Ids that no
    /// longer resolve are dropped rather than failing the restore.
    pub fn restore(&self, questions: Vec<Question>) -> QuizSession {
        let known = |id: &String| questions.iter().any(|q| &q.id == id);

        let queue: Vec<String> = self
            .remaining_question_ids
            .iter()
            .filter(|id| known(id))
            .cloned()
            .collect();
        let dropped = self.remaining_question_ids.len() - queue.len();
        if dropped > 0 {
            debug!(target: "quiz_play", dropped, "Snapshot referenced unknown questions");
        }
        let current = self.current_question_id.clone().filter(|id| known(id));

        QuizSession::from_parts(
            questions,
            self.screen_id,
            queue,
            current,
            self.solved_count,
            self.user_answers.clone(),
            self.total_attempts,
            self.last_answer_correct,
            self.is_replay_mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OtherChoice;
    use crate::session::SessionEvent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn questions() -> Vec<Question> {
        (1..=5)
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

    fn mid_session() -> QuizSession {
        let mut s = QuizSession::with_rng(questions(), StdRng::seed_from_u64(21));
        s.dispatch(SessionEvent::Start);
        s.dispatch(SessionEvent::Answer { choice_index: 1 }); // miss
        s.dispatch(SessionEvent::Next);
        s
    }

    #[test]
    fn capture_restore_round_trips_the_play_state() {
        let s = mid_session();
        let snap = SessionSnapshot::capture(&s);
        let restored = snap.restore(questions());

        assert_eq!(restored.screen(), s.screen());
        assert_eq!(restored.solved_count(), s.solved_count());
        assert_eq!(restored.total_attempts(), s.total_attempts());
        assert_eq!(restored.user_answers(), s.user_answers());
        assert_eq!(restored.remaining_question_ids(), s.remaining_question_ids());
        assert_eq!(restored.current_question_id(), s.current_question_id());
        assert_eq!(SessionSnapshot::capture(&restored), snap);
    }

    #[test]
    fn restored_playing_screen_accepts_a_fresh_answer_and_timeout() {
        let s = mid_session();
        let snap = SessionSnapshot::capture(&s);

        // The timer restarts from scratch on re-entry to Playing.
        let mut restored = snap.restore(questions());
        let epoch = restored.timer_epoch();
        assert_eq!(
            restored.dispatch(SessionEvent::Timeout { epoch }),
            Screen::Feedback
        );

        let mut restored = snap.restore(questions());
        restored.dispatch(SessionEvent::Answer { choice_index: 0 });
        assert_eq!(restored.screen(), Screen::Feedback);
    }

    #[test]
    fn restored_feedback_screen_keeps_input_locked() {
        let mut s = QuizSession::with_rng(questions(), StdRng::seed_from_u64(22));
        s.dispatch(SessionEvent::Start);
        s.dispatch(SessionEvent::Answer { choice_index: 0 });
        let snap = SessionSnapshot::capture(&s);

        let mut restored = snap.restore(questions());
        let attempts = restored.total_attempts();
        restored.dispatch(SessionEvent::Answer { choice_index: 0 });
        assert_eq!(restored.total_attempts(), attempts);
        // Next still advances normally.
        restored.dispatch(SessionEvent::Next);
        assert_eq!(restored.screen(), Screen::Playing);
    }

    #[test]
    fn unknown_ids_are_dropped_on_restore() {
        let s = mid_session();
        let mut snap = SessionSnapshot::capture(&s);
        snap.remaining_question_ids.push("ghost".into());
        snap.current_question_id = Some("ghost".into());

        let restored = snap.restore(questions());
        assert!(!restored
            .remaining_question_ids()
            .iter()
            .any(|id| id == "ghost"));
        assert_eq!(restored.current_question_id(), None);
    }

    #[test]
    fn snapshot_serializes_with_the_wire_field_names() {
        let s = mid_session();
        let snap = SessionSnapshot::capture(&s);
        let v = serde_json::to_value(&snap).unwrap();
        assert!(v.get("screenId").is_some());
        assert!(v.get("remainingQuestionIds").is_some());
        assert!(v.get("totalAttempts").is_some());

        let back: SessionSnapshot = serde_json::from_value(v).unwrap();
        assert_eq!(back, snap);
    }
}
