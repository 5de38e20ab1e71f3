// Database model structs

#[derive(Clone, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

#[derive(sqlx::FromRow)]
pub struct Quiz {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub rounds: i64,
    pub user_id: i64,
}

#[derive(sqlx::FromRow)]
pub struct QuizSummary {
    pub id: i64,
    pub name: String,
    pub rounds: i64,
    pub question_count: i64,
}

#[derive(Clone, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub user_id: i64,
}

/// One association row joined with the data needed by the assembly and
/// replacement paths.
#[derive(sqlx::FromRow)]
pub struct QuizQuestionLink {
    pub question_id: i64,
    pub round: i64,
    pub difficulty: i64,
    pub user_id: i64,
}

/// A question as shown inside a quiz, with the round it is assigned to.
#[derive(sqlx::FromRow)]
pub struct RoundQuestion {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub round: i64,
}

/// Quiz choice for the "add question to quiz" select: only quizzes the
/// question is not already on.
#[derive(sqlx::FromRow)]
pub struct QuizChoice {
    pub id: i64,
    pub name: String,
    pub rounds: i64,
}
