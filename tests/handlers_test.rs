mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use quizforge::db::Db;
use quizforge::{names, router, trivia::TriviaClient, AppState};
use tower::ServiceExt;

fn trivia_stub() -> TriviaClient {
    TriviaClient::new("http://127.0.0.1:9".to_string()).expect("build trivia client")
}

async fn logged_in_app() -> (axum::Router, Db, String, i64) {
    let db = common::create_test_db().await;
    let user_id = db.create_user("alice", "hunter2!").await.unwrap();
    let session = db.create_user_session(user_id).await.unwrap();
    let cookie = format!("{}={}", names::USER_SESSION_COOKIE_NAME, session);

    let app = router(AppState {
        db: db.clone(),
        trivia: trivia_stub(),
        secure_cookies: false,
    });
    (app, db, cookie, user_id)
}

fn post(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("cookie", cookie)
        .header("HX-Request", "true")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::empty())
        .expect("request build should succeed")
}

#[tokio::test]
async fn deleting_a_nonexistent_question_is_not_found() {
    let (app, _db, cookie, _) = logged_in_app().await;

    let resp = app
        .oneshot(post(&names::delete_question_url(9999), &cookie))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_another_users_question_is_not_found() {
    let (app, db, cookie, _) = logged_in_app().await;
    let bob = db.create_user("bob", "hunter2!").await.unwrap();
    let question_id = db.create_question("Q", "A", 1, bob).await.unwrap();

    let resp = app
        .oneshot(post(&names::delete_question_url(question_id), &cookie))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    // Bob's question is untouched.
    assert!(db.get_question(question_id).await.unwrap().is_some());
}

#[tokio::test]
async fn removing_a_question_that_is_not_on_the_quiz_is_not_found() {
    let (app, db, cookie, user_id) = logged_in_app().await;
    let quiz_id = db.create_quiz("Quiz", None, 1, user_id).await.unwrap();
    let unlinked = db.create_question("loose", "a", 1, user_id).await.unwrap();

    let resp = app
        .oneshot(post(&names::remove_question_url(quiz_id, unlinked), &cookie))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_nonexistent_quiz_is_not_found() {
    let (app, _db, cookie, _) = logged_in_app().await;

    let resp = app
        .oneshot(post(&names::delete_quiz_url(9999), &cookie))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
