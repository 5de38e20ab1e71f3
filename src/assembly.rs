//! Pulls candidate questions from the trivia source until a quiz round (or a
//! single replacement) can be filled.

use std::collections::HashSet;

use crate::db::Db;
use crate::difficulty::{classify, Classification};
use crate::models::NewQuestion;
use crate::trivia::{SourceError, TriviaSource};

/// Each batch requests this many times the outstanding question count. The
/// accept rate of a batch is unknown up front, so oversampling keeps the
/// number of round-trips down.
pub const OVERSAMPLE_FACTOR: usize = 5;

/// Upper bound on batches per `assemble` call. A source that never yields
/// matching clues must produce an error, not an infinite loop.
pub const MAX_FETCH_ATTEMPTS: u32 = 8;

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error(transparent)]
    Unavailable(#[from] SourceError),
    #[error(
        "trivia source exhausted after {attempts} batches: \
         {accepted} of {wanted} questions matched"
    )]
    Exhausted {
        attempts: u32,
        accepted: usize,
        wanted: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
    #[error("question is not linked to this quiz")]
    NotFound,
    #[error(transparent)]
    Acquire(#[from] AcquireError),
    #[error("database failure: {0}")]
    Db(color_eyre::Report),
}

impl From<color_eyre::Report> for ReplaceError {
    fn from(report: color_eyre::Report) -> Self {
        ReplaceError::Db(report)
    }
}

/// Collect exactly `target` questions whose difficulty band is in `accepted`,
/// tagged with `owner`. Questions are returned in source arrival order and
/// are not yet persisted.
pub async fn assemble(
    source: &impl TriviaSource,
    accepted: &HashSet<i64>,
    target: usize,
    owner: i64,
) -> Result<Vec<NewQuestion>, AcquireError> {
    let mut questions = Vec::with_capacity(target);
    if target == 0 {
        return Ok(questions);
    }

    for attempt in 1..=MAX_FETCH_ATTEMPTS {
        let batch = source.fetch_batch(target * OVERSAMPLE_FACTOR).await?;

        for clue in batch {
            match classify(clue.value) {
                Classification::Band(band) if accepted.contains(&band) => {
                    questions.push(NewQuestion {
                        question: clue.question,
                        answer: clue.answer,
                        difficulty: band,
                        user_id: owner,
                    });
                    if questions.len() == target {
                        return Ok(questions);
                    }
                }
                // Wrong band or no usable value: keep scanning the batch.
                Classification::Band(_) | Classification::Ineligible => {}
                Classification::OutOfRange(band) => {
                    tracing::debug!("skipping clue with out-of-range difficulty band {band}");
                }
            }
        }

        tracing::debug!(
            "assembly attempt {attempt}: {} of {target} questions accepted",
            questions.len()
        );
    }

    Err(AcquireError::Exhausted {
        attempts: MAX_FETCH_ATTEMPTS,
        accepted: questions.len(),
        wanted: target,
    })
}

/// Fetch a single question of exactly `band` difficulty.
pub async fn assemble_one(
    source: &impl TriviaSource,
    band: i64,
    owner: i64,
) -> Result<NewQuestion, AcquireError> {
    let mut questions = assemble(source, &HashSet::from([band]), 1, owner).await?;
    questions.pop().ok_or(AcquireError::Exhausted {
        attempts: MAX_FETCH_ATTEMPTS,
        accepted: 0,
        wanted: 1,
    })
}

/// Swap one question out of a quiz for a freshly fetched one of the same
/// difficulty, in the same round, owned by the same user.
///
/// The old association is removed only in the same transaction that inserts
/// the replacement question and its link, so a failed fetch (or a vanished
/// association) leaves the quiz untouched. The original question entity is
/// never deleted; other quizzes may still reference it.
///
/// Returns the id of the replacement question.
pub async fn replace(
    db: &Db,
    source: &impl TriviaSource,
    quiz_id: i64,
    question_id: i64,
) -> Result<i64, ReplaceError> {
    let link = db
        .get_quiz_question(quiz_id, question_id)
        .await?
        .ok_or(ReplaceError::NotFound)?;

    let replacement = assemble_one(source, link.difficulty, link.user_id).await?;

    let new_id = db
        .swap_quiz_question(quiz_id, question_id, &replacement, link.round)
        .await?;

    tracing::info!(
        "replaced question {question_id} with {new_id} in quiz {quiz_id} round {}",
        link.round
    );
    Ok(new_id)
}

#[cfg(test)]
mod tests {
    use std::future::{ready, Future};
    use std::pin::Pin;

    use super::*;
    use crate::models::{RawClue, RawClues};
    use crate::trivia::MockTriviaSource;

    fn clue(question: &str, answer: &str, value: Option<i64>) -> RawClue {
        RawClue {
            question: question.to_string(),
            answer: answer.to_string(),
            value,
        }
    }

    // The mocked trait returns futures, so the expectations have to as well.
    fn batch(
        clues: RawClues,
    ) -> Pin<Box<dyn Future<Output = Result<RawClues, SourceError>> + Send>> {
        Box::pin(ready(Ok(clues)))
    }

    #[tokio::test]
    async fn accepts_first_matching_clue_and_skips_nulls() {
        // Scenario from the product brief: value 1000 and 901 both classify
        // to band 5; the null is ignored; only the first hit is taken.
        let mut source = MockTriviaSource::new();
        source.expect_fetch_batch().times(1).returning(|_| {
            batch(vec![
                clue("Q1", "A1", Some(1000)),
                clue("Q2", "A2", None),
                clue("Q3", "A3", Some(901)),
            ])
        });

        let questions = assemble(&source, &HashSet::from([5]), 1, 42)
            .await
            .unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Q1");
        assert_eq!(questions[0].answer, "A1");
        assert_eq!(questions[0].difficulty, 5);
        assert_eq!(questions[0].user_id, 42);
    }

    #[tokio::test]
    async fn oversamples_each_batch() {
        let mut source = MockTriviaSource::new();
        source
            .expect_fetch_batch()
            .withf(|&count| count == 3 * OVERSAMPLE_FACTOR)
            .times(1)
            .returning(|_| {
                batch(vec![
                    clue("Q1", "A1", Some(100)),
                    clue("Q2", "A2", Some(150)),
                    clue("Q3", "A3", Some(200)),
                ])
            });

        let questions = assemble(&source, &HashSet::from([1]), 3, 7).await.unwrap();
        assert_eq!(questions.len(), 3);
    }

    #[tokio::test]
    async fn stops_mid_batch_once_target_is_reached() {
        let mut source = MockTriviaSource::new();
        source.expect_fetch_batch().times(1).returning(|_| {
            batch(vec![
                clue("Q1", "A1", Some(100)),
                clue("Q2", "A2", Some(100)),
                clue("Q3", "A3", Some(100)),
            ])
        });

        let questions = assemble(&source, &HashSet::from([1]), 2, 1).await.unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "Q1");
        assert_eq!(questions[1].question, "Q2");
    }

    #[tokio::test]
    async fn filters_on_the_accepted_difficulty_set() {
        let mut source = MockTriviaSource::new();
        source.expect_fetch_batch().times(1).returning(|_| {
            batch(vec![
                clue("easy", "a", Some(100)),   // band 1
                clue("mid", "b", Some(500)),    // band 3
                clue("hard", "c", Some(900)),   // band 5
                clue("mid2", "d", Some(600)),   // band 3
            ])
        });

        let questions = assemble(&source, &HashSet::from([3, 5]), 3, 1)
            .await
            .unwrap();

        let picked: Vec<&str> = questions.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(picked, vec!["mid", "hard", "mid2"]);
        assert!(questions.iter().all(|q| [3, 5].contains(&q.difficulty)));
    }

    #[tokio::test]
    async fn rejects_out_of_range_values_instead_of_clamping() {
        let mut source = MockTriviaSource::new();
        let mut calls = 0;
        source
            .expect_fetch_batch()
            .times(2)
            .returning(move |_| {
                calls += 1;
                if calls == 1 {
                    // Band 6: must not be relabeled as band 5.
                    batch(vec![clue("too hard", "x", Some(1200))])
                } else {
                    batch(vec![clue("just right", "y", Some(1000))])
                }
            });

        let questions = assemble(&source, &HashSet::from([5]), 1, 1).await.unwrap();
        assert_eq!(questions[0].question, "just right");
    }

    #[tokio::test]
    async fn gives_up_after_the_attempt_bound() {
        let mut source = MockTriviaSource::new();
        source
            .expect_fetch_batch()
            .times(MAX_FETCH_ATTEMPTS as usize)
            .returning(|_| batch(vec![clue("nope", "n", None)]));

        let err = assemble(&source, &HashSet::from([5]), 2, 1)
            .await
            .unwrap_err();

        match err {
            AcquireError::Exhausted {
                attempts,
                accepted,
                wanted,
            } => {
                assert_eq!(attempts, MAX_FETCH_ATTEMPTS);
                assert_eq!(accepted, 0);
                assert_eq!(wanted, 2);
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_target_never_touches_the_source() {
        let mut source = MockTriviaSource::new();
        source.expect_fetch_batch().times(0);

        let questions = assemble(&source, &HashSet::from([1]), 0, 1).await.unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn keeps_accumulating_across_short_batches() {
        let mut source = MockTriviaSource::new();
        let mut calls = 0;
        source.expect_fetch_batch().times(3).returning(move |_| {
            calls += 1;
            batch(vec![clue(&format!("Q{calls}"), "a", Some(250))])
        });

        let questions = assemble(&source, &HashSet::from([2]), 3, 9).await.unwrap();
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| q.user_id == 9));
    }
}
