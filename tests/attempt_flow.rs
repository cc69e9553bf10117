//! End-to-end attempt flow against a stub quiz service.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quizmaster_client::api::{AUTH_HEADER, HttpQuizApi, Session};
use quizmaster_client::attempt::{AttemptController, AttemptFailure, AttemptState};
use quizmaster_client::models::{AttemptId, OptionId, QuestionId, QuizId};
use quizmaster_client::review::{Grade, load_review};

const TOKEN: &str = "integration-token";

async fn mount_quiz(server: &MockServer, time_limit: u64) {
    Mock::given(method("GET"))
        .and(path("/api/quizzes/4"))
        .and(header(AUTH_HEADER, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "title": "Lifetimes",
            "description": "Borrowing across scopes",
            "time_limit": 900
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/quizzes/4/attempt"))
        .and(header(AUTH_HEADER, TOKEN))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Quiz attempt started",
            "attempt_id": 55,
            "time_limit": time_limit
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/quizzes/4/questions"))
        .and(header(AUTH_HEADER, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "text": "What does 'a name?", "options": [
                {"id": 11, "text": "A lifetime"}, {"id": 12, "text": "A label"}]},
            {"id": 2, "text": "Is &mut T Copy?", "options": [
                {"id": 21, "text": "Yes"}, {"id": 22, "text": "No"}]},
            {"id": 3, "text": "Which outlives which?", "options": [
                {"id": 31, "text": "'static"}, {"id": 32, "text": "'a"}]}
        ])))
        .mount(server)
        .await;
}

fn controller(server: &MockServer, token: Option<&str>) -> AttemptController {
    let session = Session::new(server.uri());
    let session = match token {
        Some(token) => session.with_token(token),
        None => session,
    };
    AttemptController::new(Arc::new(HttpQuizApi::new(session).unwrap()))
}

#[tokio::test]
async fn answer_submit_and_review() {
    let server = MockServer::start().await;
    mount_quiz(&server, 600).await;

    Mock::given(method("PUT"))
        .and(path("/api/attempts/55"))
        .and(body_json(json!({
            "answers": [
                {"question_id": 1, "option_id": 11},
                {"question_id": 2, "option_id": 21},
                {"question_id": 3, "option_id": 31}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Quiz completed",
            "score": 66.67,
            "correct_count": 2,
            "total_questions": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut attempt = controller(&server, Some(TOKEN));
    attempt.start(QuizId::new(4)).unwrap();
    attempt.settle().await;

    assert_eq!(attempt.state(), &AttemptState::InProgress);
    assert_eq!(attempt.attempt_id(), Some(AttemptId::new(55)));
    assert_eq!(attempt.formatted_remaining().as_deref(), Some("10:00"));

    attempt.select_answer(QuestionId::new(3), OptionId::new(31)).unwrap();
    attempt.select_answer(QuestionId::new(1), OptionId::new(11)).unwrap();
    attempt.select_answer(QuestionId::new(2), OptionId::new(21)).unwrap();
    assert!(attempt.all_answered());

    assert_eq!(attempt.submit(), Ok(true));
    assert_eq!(attempt.submit(), Ok(false));
    attempt.settle().await;

    let result = attempt.result().unwrap();
    assert_eq!(result.correct_count, 2);
    assert_eq!(Grade::from_score(result.score), Grade::Borderline);

    Mock::given(method("GET"))
        .and(path("/api/attempts/55"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 55, "user_id": 9, "quiz_id": 4, "score": 66.67,
            "started_at": "2024-03-05T14:30:00",
            "completed_at": "2024-03-05T14:31:05"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/attempts/55/answers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "text": "What does 'a name?", "selected_option_id": 11,
             "options": [{"id": 11, "text": "A lifetime", "is_correct": true},
                         {"id": 12, "text": "A label", "is_correct": false}]},
            {"id": 2, "text": "Is &mut T Copy?", "selected_option_id": 21, "is_correct": true,
             "options": [{"id": 21, "text": "Yes", "is_correct": false},
                         {"id": 22, "text": "No", "is_correct": true}]},
            {"id": 3, "text": "Which outlives which?", "selected_option_id": 31,
             "options": [{"id": 31, "text": "'static", "is_correct": true},
                         {"id": 32, "text": "'a", "is_correct": false}]}
        ])))
        .mount(&server)
        .await;

    let api = HttpQuizApi::new(Session::new(server.uri()).with_token(TOKEN)).unwrap();
    let review = load_review(&api, AttemptId::new(55)).await.unwrap();
    assert_eq!(review.correct_count(), 2);
    assert_eq!(review.incorrect_count(), 1);
    assert!(!review.passed());
    assert_eq!(
        review.formatted_time_taken().as_deref(),
        Some("1 minute 5 seconds")
    );
}

#[tokio::test]
async fn expiry_submits_partial_answers() {
    let server = MockServer::start().await;
    mount_quiz(&server, 1).await;

    Mock::given(method("PUT"))
        .and(path("/api/attempts/55"))
        .and(body_json(json!({
            "answers": [{"question_id": 2, "option_id": 22}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "score": 33.33,
            "correct_count": 1,
            "total_questions": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut attempt = controller(&server, Some(TOKEN));
    attempt.start(QuizId::new(4)).unwrap();
    attempt.settle().await;
    attempt.select_answer(QuestionId::new(2), OptionId::new(22)).unwrap();
    assert_eq!(attempt.answered_label(), "answered 1/3");

    tokio::time::timeout(Duration::from_secs(10), async {
        while !matches!(attempt.state(), AttemptState::Completed(_)) {
            let event = attempt.next_event().await.unwrap();
            attempt.handle_event(event);
        }
    })
    .await
    .unwrap();

    assert_eq!(attempt.remaining_secs(), Some(0));
}

#[tokio::test]
async fn missing_token_fails_load_without_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut attempt = controller(&server, None);
    attempt.start(QuizId::new(4)).unwrap();
    attempt.settle().await;

    assert_eq!(attempt.state(), &AttemptState::Errored(AttemptFailure::Load));
    assert_eq!(attempt.failure_message(), Some("Failed to load quiz"));
}

#[tokio::test]
async fn server_error_on_submit_is_recoverable() {
    let server = MockServer::start().await;
    mount_quiz(&server, 600).await;

    Mock::given(method("PUT"))
        .and(path("/api/attempts/55"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/attempts/55"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "score": 0.0,
            "correct_count": 0,
            "total_questions": 3
        })))
        .mount(&server)
        .await;

    let mut attempt = controller(&server, Some(TOKEN));
    attempt.start(QuizId::new(4)).unwrap();
    attempt.settle().await;

    attempt.submit().unwrap();
    attempt.settle().await;
    assert_eq!(attempt.failure_message(), Some("Failed to submit quiz"));

    assert_eq!(attempt.submit(), Ok(true));
    attempt.settle().await;
    assert!(matches!(attempt.state(), AttemptState::Completed(_)));
}
