use color_eyre::Result;

use super::models::{Quiz, QuizSummary};
use super::Db;
use crate::models::NewQuestion;

impl Db {
    pub async fn create_quiz(
        &self,
        name: &str,
        description: Option<&str>,
        rounds: i64,
        user_id: i64,
    ) -> Result<i64> {
        let quiz_id: i64 = sqlx::query_scalar(
            "INSERT INTO quizzes (name, description, rounds, user_id) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(description)
        .bind(rounds)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("new quiz created with id: {quiz_id} for user_id: {user_id}");
        Ok(quiz_id)
    }

    /// Persist a batch of assembled questions and link every one of them to
    /// `quiz_id` at `round`, atomically. A failure part-way leaves neither
    /// stray questions nor stray associations behind.
    pub async fn add_questions_to_round(
        &self,
        quiz_id: i64,
        round: i64,
        questions: &[NewQuestion],
    ) -> Result<Vec<i64>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(questions.len());

        for q in questions {
            let question_id: i64 = sqlx::query_scalar(
                "INSERT INTO questions (question, answer, difficulty, user_id) VALUES (?, ?, ?, ?) RETURNING id",
            )
            .bind(&q.question)
            .bind(&q.answer)
            .bind(q.difficulty)
            .bind(q.user_id)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO quiz_questions (quiz_id, question_id, round) VALUES (?, ?, ?)")
                .bind(quiz_id)
                .bind(question_id)
                .bind(round)
                .execute(&mut *tx)
                .await?;

            ids.push(question_id);
        }

        tx.commit().await?;

        tracing::info!(
            "added {} questions to quiz {quiz_id} round {round}",
            ids.len()
        );
        Ok(ids)
    }

    pub async fn quizzes(&self, user_id: i64) -> Result<Vec<QuizSummary>> {
        let quizzes = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT
              quizzes.id AS id,
              quizzes.name AS name,
              quizzes.rounds AS rounds,
              COUNT(quiz_questions.question_id) AS question_count
            FROM
              quizzes
              LEFT JOIN quiz_questions ON quiz_questions.quiz_id = quizzes.id
            WHERE
              quizzes.user_id = ?
            GROUP BY
              quizzes.id, quizzes.name, quizzes.rounds
            ORDER BY
              quizzes.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    pub async fn get_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            "SELECT id, name, description, rounds, user_id FROM quizzes WHERE id = ?",
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    /// Delete a quiz. Its association rows cascade away; the questions they
    /// pointed at stay.
    pub async fn delete_quiz(&self, quiz_id: i64, user_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM quizzes WHERE id = ? AND user_id = ?")
            .bind(quiz_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("quiz deleted with id: {quiz_id} by user_id: {user_id}");
        Ok(())
    }

    /// Verify that a quiz belongs to the given user (owner check)
    pub async fn verify_quiz_owner(&self, quiz_id: i64, user_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM quizzes WHERE id = ? AND user_id = ?)",
        )
        .bind(quiz_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
