use color_eyre::{eyre::eyre, Result};

use super::models::{Question, QuizChoice, QuizQuestionLink, RoundQuestion};
use super::Db;
use crate::models::NewQuestion;

impl Db {
    pub async fn create_question(
        &self,
        question: &str,
        answer: &str,
        difficulty: i64,
        user_id: i64,
    ) -> Result<i64> {
        let question_id: i64 = sqlx::query_scalar(
            "INSERT INTO questions (question, answer, difficulty, user_id) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(question)
        .bind(answer)
        .bind(difficulty)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("new question created with id: {question_id} for user_id: {user_id}");
        Ok(question_id)
    }

    pub async fn get_question(&self, question_id: i64) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            "SELECT id, question, answer, difficulty, user_id FROM questions WHERE id = ?",
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn questions(&self, user_id: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT id, question, answer, difficulty, user_id FROM questions WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    pub async fn update_question(
        &self,
        question_id: i64,
        question: &str,
        answer: &str,
        difficulty: i64,
    ) -> Result<()> {
        sqlx::query("UPDATE questions SET question = ?, answer = ?, difficulty = ? WHERE id = ?")
            .bind(question)
            .bind(answer)
            .bind(difficulty)
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("question updated with id: {question_id}");
        Ok(())
    }

    /// Delete a question. Its association rows cascade away; the quizzes
    /// they pointed at stay.
    pub async fn delete_question(&self, question_id: i64, user_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM questions WHERE id = ? AND user_id = ?")
            .bind(question_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("question deleted with id: {question_id} by user_id: {user_id}");
        Ok(())
    }

    // --- Quiz/question associations ---

    pub async fn link_question(&self, quiz_id: i64, question_id: i64, round: i64) -> Result<()> {
        sqlx::query("INSERT INTO quiz_questions (quiz_id, question_id, round) VALUES (?, ?, ?)")
            .bind(quiz_id)
            .bind(question_id)
            .bind(round)
            .execute(&self.pool)
            .await?;

        tracing::info!("question {question_id} linked to quiz {quiz_id} round {round}");
        Ok(())
    }

    /// Detach a question from a quiz. The question entity itself survives.
    pub async fn unlink_question(&self, quiz_id: i64, question_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = ? AND question_id = ?")
            .bind(quiz_id)
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("question {question_id} unlinked from quiz {quiz_id}");
        Ok(())
    }

    pub async fn get_quiz_question(
        &self,
        quiz_id: i64,
        question_id: i64,
    ) -> Result<Option<QuizQuestionLink>> {
        let link = sqlx::query_as::<_, QuizQuestionLink>(
            r#"
            SELECT qq.question_id, qq.round, q.difficulty, q.user_id
            FROM quiz_questions qq
            JOIN questions q ON q.id = qq.question_id
            WHERE qq.quiz_id = ? AND qq.question_id = ?
            "#,
        )
        .bind(quiz_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    /// All questions on a quiz, ordered by round then insertion order.
    pub async fn quiz_questions(&self, quiz_id: i64) -> Result<Vec<RoundQuestion>> {
        let questions = sqlx::query_as::<_, RoundQuestion>(
            r#"
            SELECT q.id, q.question, q.answer, q.difficulty, qq.round
            FROM quiz_questions qq
            JOIN questions q ON q.id = qq.question_id
            WHERE qq.quiz_id = ?
            ORDER BY qq.round, q.id
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// Quizzes owned by `user_id` that `question_id` is not already on, for
    /// the add-to-quiz select.
    pub async fn quizzes_without_question(
        &self,
        question_id: i64,
        user_id: i64,
    ) -> Result<Vec<QuizChoice>> {
        let choices = sqlx::query_as::<_, QuizChoice>(
            r#"
            SELECT id, name, rounds
            FROM quizzes
            WHERE user_id = ?
              AND id NOT IN (SELECT quiz_id FROM quiz_questions WHERE question_id = ?)
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(choices)
    }

    /// Replace one association atomically: insert the replacement question,
    /// link it at `round`, and remove the old link, all in one transaction.
    /// If the old link no longer exists the whole transaction rolls back, so
    /// a quiz can never end up with the round short a question or with an
    /// orphaned replacement.
    ///
    /// Returns the id of the inserted replacement question.
    pub async fn swap_quiz_question(
        &self,
        quiz_id: i64,
        old_question_id: i64,
        replacement: &NewQuestion,
        round: i64,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let new_question_id: i64 = sqlx::query_scalar(
            "INSERT INTO questions (question, answer, difficulty, user_id) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&replacement.question)
        .bind(&replacement.answer)
        .bind(replacement.difficulty)
        .bind(replacement.user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO quiz_questions (quiz_id, question_id, round) VALUES (?, ?, ?)")
            .bind(quiz_id)
            .bind(new_question_id)
            .bind(round)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = ? AND question_id = ?")
            .bind(quiz_id)
            .bind(old_question_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted != 1 {
            // Dropping the transaction rolls back the inserts above.
            return Err(eyre!(
                "association for question {old_question_id} on quiz {quiz_id} vanished"
            ));
        }

        tx.commit().await?;

        tracing::info!(
            "swapped question {old_question_id} for {new_question_id} on quiz {quiz_id}"
        );
        Ok(new_question_id)
    }
}
