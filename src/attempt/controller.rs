//! Attempt session controller.
//!
//! Drives one quiz attempt from loading to scoring. Network calls run as
//! spawned tasks and report back through an event channel, as do countdown
//! ticks, so the caller's input loop never waits on the network. The caller
//! feeds events back in with [`AttemptController::handle_event`].

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, QuizApi};
use crate::models::{
    AttemptId, OptionId, Question, QuestionId, Quiz, QuizId, SubmissionResult,
};

use super::answers::AnswerStore;
use super::error::AttemptError;
use super::format::{format_clock, progress_percent};
use super::state::{AttemptFailure, AttemptState};
use super::timer::Countdown;

/// Snapshot fetched when an attempt starts.
#[derive(Debug, Clone)]
pub struct LoadedAttempt {
    pub quiz: Quiz,
    pub attempt_id: AttemptId,
    pub questions: Vec<Question>,
    /// Seconds allowed; `None` for an untimed quiz.
    pub time_limit_secs: Option<u64>,
}

/// Something that happened outside the caller's control.
///
/// `epoch` ties an event to the `start` call that caused it; events from an
/// earlier run are dropped.
#[derive(Debug)]
pub enum AttemptEvent {
    Loaded {
        epoch: u64,
        outcome: Result<LoadedAttempt, ApiError>,
    },
    Tick {
        epoch: u64,
        remaining: u64,
    },
    Expired {
        epoch: u64,
    },
    Submitted {
        epoch: u64,
        outcome: Result<SubmissionResult, ApiError>,
    },
}

/// Owns the state, answers and countdown of one attempt.
///
/// Dropping the controller cancels its countdown.
pub struct AttemptController {
    api: Arc<dyn QuizApi>,
    state: AttemptState,
    quiz_id: Option<QuizId>,
    loaded: Option<LoadedAttempt>,
    answers: AnswerStore,
    active_index: usize,
    remaining_secs: Option<u64>,
    countdown: Countdown,
    epoch: u64,
    events_tx: UnboundedSender<AttemptEvent>,
    events_rx: UnboundedReceiver<AttemptEvent>,
}

impl AttemptController {
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            state: AttemptState::Idle,
            quiz_id: None,
            loaded: None,
            answers: AnswerStore::new(),
            active_index: 0,
            remaining_secs: None,
            countdown: Countdown::new(),
            epoch: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.loaded.as_ref().map(|loaded| &loaded.quiz)
    }

    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.loaded.as_ref().map(|loaded| loaded.attempt_id)
    }

    pub fn questions(&self) -> &[Question] {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.questions.as_slice())
            .unwrap_or_default()
    }

    pub fn question_count(&self) -> usize {
        self.questions().len()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions().get(self.active_index)
    }

    pub fn selection(&self, question_id: QuestionId) -> Option<OptionId> {
        self.answers.get(question_id)
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn answered_count(&self) -> usize {
        self.answers.size()
    }

    pub fn all_answered(&self) -> bool {
        self.answers.size() == self.question_count()
    }

    pub fn progress_percent(&self) -> u16 {
        progress_percent(self.active_index, self.question_count())
    }

    /// "answered 2/3"
    pub fn answered_label(&self) -> String {
        format!("answered {}/{}", self.answered_count(), self.question_count())
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        self.remaining_secs
    }

    /// Remaining time as `m:ss`, or `None` for an untimed attempt.
    pub fn formatted_remaining(&self) -> Option<String> {
        self.remaining_secs.map(format_clock)
    }

    pub fn result(&self) -> Option<&SubmissionResult> {
        match &self.state {
            AttemptState::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&'static str> {
        match &self.state {
            AttemptState::Errored(failure) => Some(failure.message()),
            _ => None,
        }
    }

    /// Begins loading `quiz_id`. Accepted when idle, or after a failed load
    /// as a manual retry. The outcome arrives as [`AttemptEvent::Loaded`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, quiz_id: QuizId) -> Result<(), AttemptError> {
        match self.state {
            AttemptState::Idle | AttemptState::Errored(AttemptFailure::Load) => {}
            _ => return Err(self.invalid("start")),
        }

        self.epoch += 1;
        self.quiz_id = Some(quiz_id);
        self.state = AttemptState::Loading;
        info!(%quiz_id, "loading quiz attempt");

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let outcome = load(api.as_ref(), quiz_id).await;
            let _ = tx.send(AttemptEvent::Loaded { epoch, outcome });
        });

        Ok(())
    }

    /// Records `option_id` as the answer to `question_id`. No network call.
    pub fn select_answer(
        &mut self,
        question_id: QuestionId,
        option_id: OptionId,
    ) -> Result<(), AttemptError> {
        if self.state != AttemptState::InProgress {
            return Err(self.invalid("select an answer"));
        }

        let question = self
            .questions()
            .iter()
            .find(|question| question.id == question_id)
            .ok_or(AttemptError::UnknownQuestion(question_id))?;
        if !question.has_option(option_id) {
            return Err(AttemptError::UnknownOption {
                question_id,
                option_id,
            });
        }

        self.answers.set(question_id, option_id);
        debug!(%question_id, %option_id, "answer selected");
        Ok(())
    }

    /// Moves to `index`, clamped to the question range. Returns the new index.
    pub fn go_to_question(&mut self, index: isize) -> Result<usize, AttemptError> {
        if !self.state.can_navigate() {
            return Err(self.invalid("change question"));
        }

        let last = self.question_count().saturating_sub(1);
        self.active_index = index.clamp(0, last as isize) as usize;
        Ok(self.active_index)
    }

    pub fn next(&mut self) -> Result<usize, AttemptError> {
        self.go_to_question(self.active_index as isize + 1)
    }

    pub fn previous(&mut self) -> Result<usize, AttemptError> {
        self.go_to_question(self.active_index as isize - 1)
    }

    /// Sends the answers for scoring.
    ///
    /// Returns `Ok(true)` when a submission was issued and `Ok(false)` when
    /// one is already pending or done. Accepted from `InProgress` and, to let
    /// the user try again, after a failed submit. The countdown is stopped
    /// before anything is sent. The outcome arrives as
    /// [`AttemptEvent::Submitted`].
    pub fn submit(&mut self) -> Result<bool, AttemptError> {
        match self.state {
            AttemptState::InProgress | AttemptState::Errored(AttemptFailure::Submit) => {}
            AttemptState::Submitting | AttemptState::Completed(_) => {
                debug!(state = self.state.name(), "submit ignored");
                return Ok(false);
            }
            _ => return Err(self.invalid("submit")),
        }
        let Some(attempt_id) = self.attempt_id() else {
            return Err(self.invalid("submit"));
        };

        self.countdown.stop();

        let answers = self.answers.to_submission();
        info!(
            %attempt_id,
            answered = answers.len(),
            total = self.question_count(),
            "submitting attempt"
        );
        self.state = AttemptState::Submitting;

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let outcome = api.submit_attempt(attempt_id, &answers).await;
            let _ = tx.send(AttemptEvent::Submitted { epoch, outcome });
        });

        Ok(true)
    }

    /// Waits for the next event. Never yields `None` while the controller
    /// is alive, since it holds a sender itself.
    pub async fn next_event(&mut self) -> Option<AttemptEvent> {
        self.events_rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<AttemptEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Applies every event already queued. Returns how many were handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.try_next_event() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Handles events until no network call is outstanding.
    pub async fn settle(&mut self) {
        while self.state.is_busy() {
            match self.events_rx.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }

    pub fn handle_event(&mut self, event: AttemptEvent) {
        match event {
            AttemptEvent::Loaded { epoch, outcome } if epoch == self.epoch => {
                self.on_loaded(outcome)
            }
            AttemptEvent::Tick { epoch, remaining } if epoch == self.epoch => {
                self.on_tick(remaining)
            }
            AttemptEvent::Expired { epoch } if epoch == self.epoch => self.on_expired(),
            AttemptEvent::Submitted { epoch, outcome } if epoch == self.epoch => {
                self.on_submitted(outcome)
            }
            stale => debug!(?stale, "dropping event from an earlier run"),
        }
    }

    fn on_loaded(&mut self, outcome: Result<LoadedAttempt, ApiError>) {
        if self.state != AttemptState::Loading {
            debug!(state = self.state.name(), "load result ignored");
            return;
        }

        let loaded = match outcome {
            Ok(loaded) if loaded.questions.is_empty() => {
                error!(quiz_id = ?self.quiz_id, "quiz has no questions");
                self.state = AttemptState::Errored(AttemptFailure::Load);
                return;
            }
            Ok(loaded) => loaded,
            Err(e) => {
                error!(quiz_id = ?self.quiz_id, error = %e, "failed to load quiz attempt");
                self.state = AttemptState::Errored(AttemptFailure::Load);
                return;
            }
        };

        info!(
            attempt_id = %loaded.attempt_id,
            questions = loaded.questions.len(),
            time_limit = ?loaded.time_limit_secs,
            "attempt started"
        );

        self.answers = AnswerStore::with_order(loaded.questions.iter().map(|q| q.id));
        self.active_index = 0;
        self.remaining_secs = loaded.time_limit_secs;
        let time_limit = loaded.time_limit_secs;
        self.loaded = Some(loaded);
        self.state = AttemptState::InProgress;

        if let Some(limit) = time_limit {
            self.start_countdown(limit);
        }
    }

    fn start_countdown(&mut self, limit: u64) {
        let epoch = self.epoch;
        let tick_tx = self.events_tx.clone();
        let expire_tx = self.events_tx.clone();
        self.countdown.start(
            limit,
            move |remaining| {
                let _ = tick_tx.send(AttemptEvent::Tick { epoch, remaining });
            },
            move || {
                let _ = expire_tx.send(AttemptEvent::Expired { epoch });
            },
        );
    }

    fn on_tick(&mut self, remaining: u64) {
        if self.state != AttemptState::InProgress {
            return;
        }
        // Never let a late tick move the clock back up.
        let current = self.remaining_secs.unwrap_or(remaining);
        self.remaining_secs = Some(current.min(remaining));
    }

    fn on_expired(&mut self) {
        if self.state != AttemptState::InProgress {
            return;
        }
        self.remaining_secs = Some(0);
        info!(attempt_id = ?self.attempt_id(), "time limit reached, submitting");
        if let Err(e) = self.submit() {
            warn!(error = %e, "automatic submit rejected");
        }
    }

    fn on_submitted(&mut self, outcome: Result<SubmissionResult, ApiError>) {
        if self.state != AttemptState::Submitting {
            debug!(state = self.state.name(), "submit result ignored");
            return;
        }

        match outcome {
            Ok(result) => {
                info!(
                    attempt_id = ?self.attempt_id(),
                    score = result.score,
                    correct = result.correct_count,
                    total = result.total_questions,
                    "attempt completed"
                );
                self.state = AttemptState::Completed(result);
            }
            Err(e) => {
                error!(attempt_id = ?self.attempt_id(), error = %e, "failed to submit attempt");
                self.state = AttemptState::Errored(AttemptFailure::Submit);
            }
        }
    }

    fn invalid(&self, operation: &'static str) -> AttemptError {
        AttemptError::InvalidState {
            operation,
            state: self.state.name(),
        }
    }
}

async fn load(api: &dyn QuizApi, quiz_id: QuizId) -> Result<LoadedAttempt, ApiError> {
    let quiz = api.get_quiz(quiz_id).await?;
    let started = api.start_attempt(quiz_id).await?;
    let questions = api.get_questions(quiz_id).await?;

    Ok(LoadedAttempt {
        time_limit_secs: started.time_limit_secs.or(quiz.time_limit_secs),
        attempt_id: started.attempt_id,
        quiz,
        questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Endpoint, MockQuizApi};
    use crate::models::AnswerSubmission;
    use std::time::Duration;
    use tokio::time::sleep;

    fn q(id: i64) -> QuestionId {
        QuestionId::new(id)
    }

    fn o(id: i64) -> OptionId {
        OptionId::new(id)
    }

    async fn started(api: &Arc<MockQuizApi>) -> AttemptController {
        let mut controller = AttemptController::new(api.clone());
        controller.start(QuizId::new(1)).unwrap();
        controller.settle().await;
        controller
    }

    #[tokio::test(start_paused = true)]
    async fn start_loads_quiz_and_starts_clock() {
        let api = Arc::new(MockQuizApi::sample(3, Some(600)));
        let mut controller = AttemptController::new(api.clone());
        assert_eq!(controller.state(), &AttemptState::Idle);

        controller.start(QuizId::new(1)).unwrap();
        assert_eq!(controller.state(), &AttemptState::Loading);
        controller.settle().await;

        assert_eq!(controller.state(), &AttemptState::InProgress);
        assert_eq!(controller.question_count(), 3);
        assert_eq!(controller.attempt_id(), Some(AttemptId::new(1)));
        assert_eq!(controller.formatted_remaining().as_deref(), Some("10:00"));
        assert_eq!(controller.current_question().map(|q| q.id), Some(q(1)));
        assert_eq!(api.call_count(Endpoint::GetQuiz), 1);
        assert_eq!(api.call_count(Endpoint::StartAttempt), 1);
        assert_eq!(api.call_count(Endpoint::GetQuestions), 1);

        sleep(Duration::from_millis(2500)).await;
        controller.process_pending();
        assert_eq!(controller.remaining_secs(), Some(598));
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_limit_overrides_quiz_limit() {
        let api = Arc::new(MockQuizApi::sample(2, Some(600)).with_attempt_time_limit(Some(90)));
        let controller = started(&api).await;
        assert_eq!(controller.formatted_remaining().as_deref(), Some("1:30"));
    }

    #[tokio::test(start_paused = true)]
    async fn untimed_quiz_has_no_clock() {
        let api = Arc::new(MockQuizApi::sample(2, None));
        let mut controller = started(&api).await;

        assert_eq!(controller.remaining_secs(), None);
        assert_eq!(controller.formatted_remaining(), None);

        sleep(Duration::from_secs(3600)).await;
        controller.process_pending();
        assert_eq!(controller.state(), &AttemptState::InProgress);
    }

    #[tokio::test(start_paused = true)]
    async fn operations_rejected_before_start() {
        let api = Arc::new(MockQuizApi::sample(2, Some(60)));
        let mut controller = AttemptController::new(api.clone());

        assert!(matches!(
            controller.select_answer(q(1), o(11)),
            Err(AttemptError::InvalidState { .. })
        ));
        assert!(controller.next().is_err());
        assert!(controller.submit().is_err());
        assert_eq!(api.call_count(Endpoint::SubmitAttempt), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_is_rejected() {
        let api = Arc::new(MockQuizApi::sample(2, Some(60)));
        let mut controller = started(&api).await;
        assert!(controller.start(QuizId::new(1)).is_err());
        assert_eq!(api.call_count(Endpoint::StartAttempt), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn select_validates_ids() {
        let api = Arc::new(MockQuizApi::sample(2, Some(60)));
        let mut controller = started(&api).await;

        assert_eq!(
            controller.select_answer(q(7), o(11)),
            Err(AttemptError::UnknownQuestion(q(7)))
        );
        assert_eq!(
            controller.select_answer(q(1), o(21)),
            Err(AttemptError::UnknownOption {
                question_id: q(1),
                option_id: o(21)
            })
        );
        assert_eq!(controller.answered_count(), 0);

        controller.select_answer(q(1), o(12)).unwrap();
        controller.select_answer(q(1), o(12)).unwrap();
        controller.select_answer(q(1), o(11)).unwrap();
        assert_eq!(controller.selection(q(1)), Some(o(11)));
        assert_eq!(controller.answered_count(), 1);
        assert!(!controller.all_answered());

        controller.select_answer(q(2), o(23)).unwrap();
        assert!(controller.all_answered());
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_clamps_without_wrapping() {
        let api = Arc::new(MockQuizApi::sample(5, Some(60)));
        let mut controller = started(&api).await;

        assert_eq!(controller.go_to_question(-1), Ok(0));
        assert_eq!(controller.go_to_question(7), Ok(4));
        assert_eq!(controller.next(), Ok(4));
        assert_eq!(controller.go_to_question(2), Ok(2));
        assert_eq!(controller.previous(), Ok(1));
        assert_eq!(controller.previous(), Ok(0));
        assert_eq!(controller.previous(), Ok(0));
    }

    #[tokio::test(start_paused = true)]
    async fn progress_tracks_active_question() {
        let api = Arc::new(MockQuizApi::sample(3, Some(60)));
        let mut controller = started(&api).await;

        assert_eq!(controller.progress_percent(), 33);
        controller.next().unwrap();
        assert_eq!(controller.progress_percent(), 67);
        controller.next().unwrap();
        assert_eq!(controller.progress_percent(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn double_submit_sends_once() {
        let api = Arc::new(MockQuizApi::sample(2, Some(60)));
        let mut controller = started(&api).await;
        controller.select_answer(q(1), o(11)).unwrap();

        assert_eq!(controller.submit(), Ok(true));
        assert_eq!(controller.submit(), Ok(false));
        assert_eq!(controller.state(), &AttemptState::Submitting);

        controller.settle().await;
        assert!(matches!(controller.state(), AttemptState::Completed(_)));
        assert_eq!(controller.submit(), Ok(false));
        assert_eq!(api.call_count(Endpoint::SubmitAttempt), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_submits_answered_questions_only() {
        let api = Arc::new(MockQuizApi::sample(3, Some(600)));
        let mut controller = started(&api).await;

        controller.select_answer(q(1), o(11)).unwrap();
        controller.select_answer(q(3), o(31)).unwrap();
        assert_eq!(controller.answered_label(), "answered 2/3");

        while !matches!(controller.state(), AttemptState::Completed(_)) {
            let event = controller.next_event().await.unwrap();
            controller.handle_event(event);
        }

        assert_eq!(controller.remaining_secs(), Some(0));
        assert_eq!(controller.formatted_remaining().as_deref(), Some("0:00"));
        assert_eq!(
            api.submissions(),
            vec![vec![
                AnswerSubmission { question_id: q(1), option_id: o(11) },
                AnswerSubmission { question_id: q(3), option_id: o(31) },
            ]]
        );
        let result = controller.result().unwrap();
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.total_questions, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_submit_stops_the_clock() {
        let api = Arc::new(MockQuizApi::sample(2, Some(5)));
        let mut controller = started(&api).await;

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(controller.submit(), Ok(true));
        controller.settle().await;

        sleep(Duration::from_secs(30)).await;
        controller.process_pending();

        assert_eq!(api.call_count(Endpoint::SubmitAttempt), 1);
        assert!(matches!(controller.state(), AttemptState::Completed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_time_limit_submits_immediately() {
        let api = Arc::new(MockQuizApi::sample(2, Some(0)));
        let mut controller = started(&api).await;

        while !matches!(controller.state(), AttemptState::Completed(_)) {
            let event = controller.next_event().await.unwrap();
            controller.handle_event(event);
        }
        assert_eq!(api.submissions(), vec![Vec::new()]);
    }

    #[tokio::test(start_paused = true)]
    async fn load_failure_is_generic_and_retryable() {
        let api = Arc::new(MockQuizApi::sample(2, Some(60)));
        api.fail_next(
            Endpoint::GetQuiz,
            ApiError::Transport("connection refused by 10.0.0.7:5000".into()),
        );

        let mut controller = started(&api).await;
        assert_eq!(controller.state(), &AttemptState::Errored(AttemptFailure::Load));
        assert_eq!(controller.failure_message(), Some("Failed to load quiz"));
        assert_eq!(api.call_count(Endpoint::StartAttempt), 0);

        controller.start(QuizId::new(1)).unwrap();
        controller.settle().await;
        assert_eq!(controller.state(), &AttemptState::InProgress);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_start_is_a_load_failure() {
        let api = Arc::new(MockQuizApi::sample(2, Some(60)));
        api.fail_next(Endpoint::StartAttempt, ApiError::Unauthorized("expired".into()));

        let controller = started(&api).await;
        assert_eq!(controller.failure_message(), Some("Failed to load quiz"));
        assert_eq!(api.call_count(Endpoint::GetQuestions), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_quiz_fails_to_load() {
        let api = Arc::new(MockQuizApi::sample(0, Some(60)));
        let controller = started(&api).await;
        assert_eq!(controller.state(), &AttemptState::Errored(AttemptFailure::Load));
    }

    #[tokio::test(start_paused = true)]
    async fn submit_failure_allows_manual_retry() {
        let api = Arc::new(MockQuizApi::sample(2, Some(60)));
        api.fail_next(Endpoint::SubmitAttempt, ApiError::Transport("502".into()));
        let mut controller = started(&api).await;
        controller.select_answer(q(2), o(21)).unwrap();

        controller.submit().unwrap();
        controller.settle().await;
        assert_eq!(controller.state(), &AttemptState::Errored(AttemptFailure::Submit));
        assert_eq!(controller.failure_message(), Some("Failed to submit quiz"));
        assert_eq!(controller.selection(q(2)), Some(o(21)));

        // No automatic retry.
        sleep(Duration::from_secs(120)).await;
        controller.process_pending();
        assert_eq!(api.call_count(Endpoint::SubmitAttempt), 1);

        assert_eq!(controller.submit(), Ok(true));
        controller.settle().await;
        assert!(matches!(controller.state(), AttemptState::Completed(_)));
        assert_eq!(api.call_count(Endpoint::SubmitAttempt), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn browsing_allowed_while_submitting() {
        let api = Arc::new(MockQuizApi::sample(3, Some(60)));
        let mut controller = started(&api).await;

        controller.submit().unwrap();
        assert_eq!(controller.next(), Ok(1));
        assert!(matches!(
            controller.select_answer(q(2), o(21)),
            Err(AttemptError::InvalidState { .. })
        ));

        controller.settle().await;
        assert!(controller.next().is_err());
    }
}
