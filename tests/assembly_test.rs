mod common;

use std::collections::VecDeque;
use std::sync::Mutex;

use common::create_test_db;
use quizforge::assembly::{self, AcquireError, ReplaceError};
use quizforge::db::Db;
use quizforge::models::{RawClue, RawClues};
use quizforge::trivia::{SourceError, TriviaSource};

/// Serves pre-scripted batches in order, then empty ones.
struct ScriptedSource {
    batches: Mutex<VecDeque<RawClues>>,
}

impl ScriptedSource {
    fn new(batches: Vec<RawClues>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
        }
    }
}

impl TriviaSource for ScriptedSource {
    async fn fetch_batch(&self, _count: usize) -> Result<RawClues, SourceError> {
        let mut batches = self.batches.lock().unwrap();
        Ok(batches.pop_front().unwrap_or_default())
    }
}

/// Never has anything to offer.
struct EmptySource;

impl TriviaSource for EmptySource {
    async fn fetch_batch(&self, _count: usize) -> Result<RawClues, SourceError> {
        Ok(vec![])
    }
}

/// Fails every request, as if the service were down.
struct DownSource;

impl TriviaSource for DownSource {
    async fn fetch_batch(&self, _count: usize) -> Result<RawClues, SourceError> {
        // A request that can never be built yields a real client error
        // without touching the network.
        let err = reqwest::Client::new()
            .get("http://")
            .build()
            .expect_err("empty host should not build");
        Err(SourceError::Unavailable(err))
    }
}

fn clue(question: &str, value: Option<i64>) -> RawClue {
    RawClue {
        question: question.to_string(),
        answer: format!("answer to {question}"),
        value,
    }
}

async fn seed_quiz(db: &Db) -> (i64, i64) {
    let user_id = db.create_user("alice", "hunter2!").await.unwrap();
    let quiz_id = db.create_quiz("Quiz", None, 2, user_id).await.unwrap();
    (user_id, quiz_id)
}

#[tokio::test]
async fn test_replace_preserves_round_and_difficulty() {
    let db = create_test_db().await;
    let (user_id, quiz_id) = seed_quiz(&db).await;

    let old_id = db
        .create_question("old", "stale", 3, user_id)
        .await
        .unwrap();
    db.link_question(quiz_id, old_id, 2).await.unwrap();

    // First batch holds only rejects; the match arrives in the second.
    let source = ScriptedSource::new(vec![
        vec![clue("too easy", Some(100)), clue("no value", None)],
        vec![clue("fresh", Some(550))],
    ]);

    let new_id = assembly::replace(&db, &source, quiz_id, old_id)
        .await
        .unwrap();
    assert_ne!(new_id, old_id);

    let link = db.get_quiz_question(quiz_id, new_id).await.unwrap().unwrap();
    assert_eq!(link.round, 2);
    assert_eq!(link.difficulty, 3);
    assert_eq!(link.user_id, user_id);

    // The old question keeps existing but is off the quiz.
    assert!(db.get_quiz_question(quiz_id, old_id).await.unwrap().is_none());
    let old = db.get_question(old_id).await.unwrap().unwrap();
    assert_eq!(old.question, "old");

    let questions = db.quiz_questions(quiz_id).await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].question, "fresh");
}

#[tokio::test]
async fn test_replace_leaves_quiz_untouched_when_source_is_exhausted() {
    let db = create_test_db().await;
    let (user_id, quiz_id) = seed_quiz(&db).await;

    let old_id = db.create_question("old", "a", 4, user_id).await.unwrap();
    db.link_question(quiz_id, old_id, 1).await.unwrap();

    let before = db.questions(user_id).await.unwrap().len();

    let err = assembly::replace(&db, &EmptySource, quiz_id, old_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ReplaceError::Acquire(_)));

    // Association and question table are exactly as before.
    let link = db.get_quiz_question(quiz_id, old_id).await.unwrap().unwrap();
    assert_eq!(link.round, 1);
    assert_eq!(db.questions(user_id).await.unwrap().len(), before);
}

#[tokio::test]
async fn test_unavailable_source_fails_assembly_on_first_batch() {
    let accepted = std::collections::HashSet::from([1]);
    let err = assembly::assemble(&DownSource, &accepted, 3, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AcquireError::Unavailable(_)));
}

#[tokio::test]
async fn test_replace_leaves_quiz_untouched_when_source_is_unavailable() {
    let db = create_test_db().await;
    let (user_id, quiz_id) = seed_quiz(&db).await;

    let old_id = db.create_question("old", "a", 2, user_id).await.unwrap();
    db.link_question(quiz_id, old_id, 1).await.unwrap();

    let before = db.questions(user_id).await.unwrap().len();

    let err = assembly::replace(&db, &DownSource, quiz_id, old_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReplaceError::Acquire(AcquireError::Unavailable(_))
    ));

    let link = db.get_quiz_question(quiz_id, old_id).await.unwrap().unwrap();
    assert_eq!(link.round, 1);
    assert_eq!(db.questions(user_id).await.unwrap().len(), before);
}

#[tokio::test]
async fn test_replace_rejects_unlinked_question() {
    let db = create_test_db().await;
    let (user_id, quiz_id) = seed_quiz(&db).await;

    let loose = db.create_question("loose", "a", 2, user_id).await.unwrap();

    let err = assembly::replace(&db, &EmptySource, quiz_id, loose)
        .await
        .unwrap_err();
    assert!(matches!(err, ReplaceError::NotFound));
}

#[tokio::test]
async fn test_assembled_round_persists() {
    let db = create_test_db().await;
    let (user_id, quiz_id) = seed_quiz(&db).await;

    let source = ScriptedSource::new(vec![vec![
        clue("Q1", Some(200)),  // band 1
        clue("Q2", Some(1100)), // out of range, skipped
        clue("Q3", Some(350)),  // band 2
        clue("Q4", Some(150)),  // band 1
    ]]);

    let accepted = std::collections::HashSet::from([1, 2]);
    let questions = assembly::assemble(&source, &accepted, 3, user_id)
        .await
        .unwrap();
    assert_eq!(questions.len(), 3);

    db.add_questions_to_round(quiz_id, 1, &questions)
        .await
        .unwrap();

    let stored = db.quiz_questions(quiz_id).await.unwrap();
    let texts: Vec<&str> = stored.iter().map(|q| q.question.as_str()).collect();
    assert_eq!(texts, vec!["Q1", "Q3", "Q4"]);
    assert!(stored.iter().all(|q| q.round == 1));
}
