//! QuizSession: the state machine driving one learner's play-through.
//!
//! Screens flow `Home → Playing ⇄ Feedback → Results`, with a wrong answer
//! reinserting the question into the queue at a random non-immediate
//! position, and a post-results "replay" detour that revisits one missed
//! question without touching the finished session's tallies.
//!
//! The machine is deliberately UI-framework-agnostic: every transition
//! goes through [`QuizSession::dispatch`], and the 30-second countdown is
//! modelled as data. On each entry to `Playing` the session bumps a timer
//! epoch; whoever drives the UI arms a timer carrying that epoch and
//! delivers [`SessionEvent::Timeout`] when it fires. A timeout whose epoch
//! no longer matches is stale (the question was already answered or
//! navigated away from) and is ignored, which is what "cancelling" the
//! timer means here.

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Question;

/// Fixed countdown per question attempt.
pub const QUESTION_TIME_LIMIT_SECS: u64 = 30;

/// The four screens of the play flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Home,
    Playing,
    Feedback,
    Results,
}

/// A question the learner missed on first encounter: at most one record
/// per question id, regardless of how many retries it took.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissRecord {
    pub question_id: String,
    /// The correct choice, shown in the results review list.
    pub word: String,
}

/// Inputs the UI (or a test) can feed into the machine.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// "Start quiz": shuffles a fresh queue and resets all tallies.
    Start,
    /// The learner picked choice `choice_index` on the current question.
    Answer { choice_index: usize },
    /// The countdown armed at `epoch` elapsed with no answer.
    Timeout { epoch: u64 },
    /// "Next" on the feedback screen.
    Next,
    /// From the results screen: revisit one missed question (detour).
    Replay { question_id: String },
}

pub struct QuizSession {
    questions: Vec<Question>,
    rng: StdRng,

    screen: Screen,
    /// Remaining question ids, front is served next. A question appears at
    /// most once, except while re-queued after a wrong answer.
    queue: Vec<String>,
    current: Option<String>,
    solved_count: usize,
    user_answers: Vec<MissRecord>,
    total_attempts: usize,
    last_answer_correct: Option<bool>,
    replay_mode: bool,
    /// Input lock: exactly one answer/timeout is accepted per question
    /// instance.
    answered: bool,
    timer_epoch: u64,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self::with_rng(questions, StdRng::from_entropy())
    }

    /// Deterministic construction for tests.
    pub fn with_rng(questions: Vec<Question>, rng: StdRng) -> Self {
        Self {
            questions,
            rng,
            screen: Screen::Home,
            queue: Vec::new(),
            current: None,
            solved_count: 0,
            user_answers: Vec::new(),
            total_attempts: 0,
            last_answer_correct: None,
            replay_mode: false,
            answered: false,
            timer_epoch: 0,
        }
    }

    /// Rebuild a session from restored navigation state. Unknown question
    /// ids have already been dropped by the caller.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        questions: Vec<Question>,
        screen: Screen,
        queue: Vec<String>,
        current: Option<String>,
        solved_count: usize,
        user_answers: Vec<MissRecord>,
        total_attempts: usize,
        last_answer_correct: Option<bool>,
        replay_mode: bool,
    ) -> Self {
        let mut session = Self::with_rng(questions, StdRng::from_entropy());
        session.screen = screen;
        session.queue = queue;
        session.current = current;
        session.solved_count = solved_count;
        session.user_answers = user_answers;
        session.total_attempts = total_attempts;
        session.last_answer_correct = last_answer_correct;
        session.replay_mode = replay_mode;
        // Input re-locks on feedback, re-opens on a (fresh-timer) question.
        session.answered = screen == Screen::Feedback;
        session.timer_epoch = 1;
        session
    }

    /// Single transition function. Events that make no sense on the
    /// current screen (a second answer, a stale timeout, a replay outside
    /// the results screen) are ignored, mirroring disabled UI inputs.
    pub fn dispatch(&mut self, event: SessionEvent) -> Screen {
        match event {
            SessionEvent::Start => self.start(),
            SessionEvent::Answer { choice_index } => self.answer(choice_index),
            SessionEvent::Timeout { epoch } => self.timeout(epoch),
            SessionEvent::Next => self.next(),
            SessionEvent::Replay { question_id } => self.replay(&question_id),
        }
        self.screen
    }

    fn start(&mut self) {
        let mut ids: Vec<String> = self.questions.iter().map(|q| q.id.clone()).collect();
        ids.shuffle(&mut self.rng);
        self.queue = ids;
        self.solved_count = 0;
        self.user_answers.clear();
        self.total_attempts = 0;
        self.last_answer_correct = None;
        self.replay_mode = false;
        if self.queue.is_empty() {
            // Nothing to play: an empty question set finishes immediately.
            self.current = None;
            self.screen = Screen::Results;
        } else {
            self.current = Some(self.queue.remove(0));
            self.enter_playing();
        }
    }

    fn answer(&mut self, choice_index: usize) {
        if self.screen != Screen::Playing || self.answered {
            debug!(target: "quiz_play", choice_index, "Ignoring answer: input locked");
            return;
        }
        let Some(q) = self.current_question().cloned() else {
            return;
        };
        if choice_index >= q.choices.len() {
            debug!(target: "quiz_play", choice_index, "Ignoring answer: no such choice");
            return;
        }
        self.answered = true;
        // Bumping the epoch here is what cancels the outstanding countdown.
        self.timer_epoch += 1;
        self.total_attempts += 1;
        let correct = choice_index == q.correct_index;
        if !correct {
            self.record_miss(&q);
        }
        self.last_answer_correct = Some(correct);
        self.screen = Screen::Feedback;
    }

    fn timeout(&mut self, epoch: u64) {
        if self.screen != Screen::Playing || self.answered || epoch != self.timer_epoch {
            debug!(target: "quiz_play", epoch, current_epoch = self.timer_epoch, "Ignoring stale timeout");
            return;
        }
        let Some(q) = self.current_question().cloned() else {
            return;
        };
        self.answered = true;
        self.timer_epoch += 1;
        self.total_attempts += 1;
        self.record_miss(&q);
        self.last_answer_correct = Some(false);
        self.screen = Screen::Feedback;
    }

    fn next(&mut self) {
        if self.screen != Screen::Feedback {
            return;
        }

        if self.replay_mode {
            // A replay is a detour: return to results, main queue untouched.
            self.replay_mode = false;
            self.current = None;
            self.screen = Screen::Results;
            return;
        }

        match self.last_answer_correct {
            Some(true) => self.solved_count += 1,
            Some(false) => {
                if let Some(id) = self.current.clone() {
                    // Never index 0: the learner is not asked the same
                    // question again immediately.
                    let at = if self.queue.is_empty() {
                        0
                    } else {
                        self.rng.gen_range(1..=self.queue.len())
                    };
                    self.queue.insert(at, id);
                }
            }
            None => {}
        }

        let finished = self.solved_count >= self.questions.len()
            || (self.current.is_none() && self.queue.is_empty());
        if finished || self.queue.is_empty() {
            self.current = None;
            self.screen = Screen::Results;
        } else {
            self.current = Some(self.queue.remove(0));
            self.enter_playing();
        }
    }

    fn replay(&mut self, question_id: &str) {
        if self.screen != Screen::Results {
            return;
        }
        if !self.questions.iter().any(|q| q.id == question_id) {
            debug!(target: "quiz_play", %question_id, "Ignoring replay of unknown question");
            return;
        }
        self.replay_mode = true;
        self.current = Some(question_id.to_string());
        self.enter_playing();
    }

    fn enter_playing(&mut self) {
        self.answered = false;
        self.timer_epoch += 1;
        self.screen = Screen::Playing;
    }

    fn record_miss(&mut self, q: &Question) {
        if !self.user_answers.iter().any(|m| m.question_id == q.id) {
            self.user_answers.push(MissRecord {
                question_id: q.id.clone(),
                word: q.correct_choice().to_string(),
            });
        }
    }

    // -------- read access for UIs, the results aggregator, and the
    // history bridge --------

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        let id = self.current.as_deref()?;
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn current_question_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn remaining_question_ids(&self) -> &[String] {
        &self.queue
    }

    pub fn solved_count(&self) -> usize {
        self.solved_count
    }

    pub fn user_answers(&self) -> &[MissRecord] {
        &self.user_answers
    }

    pub fn total_attempts(&self) -> usize {
        self.total_attempts
    }

    pub fn last_answer_correct(&self) -> Option<bool> {
        self.last_answer_correct
    }

    pub fn is_replay_mode(&self) -> bool {
        self.replay_mode
    }

    /// Epoch to arm the next countdown with; see the module docs.
    pub fn timer_epoch(&self) -> u64 {
        self.timer_epoch
    }
}
