use axum::{
    extract::{Form, Path, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    db::models::Question,
    difficulty,
    extractors::{AuthGuard, IsHtmx},
    rejections::{AppError, OptionExt, ResultExt},
    views, AppState,
};

use crate::views::question as question_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/questions", get(question_list))
        .route(
            "/questions/create",
            get(create_question_page).post(create_question_post),
        )
        .route("/questions/{id}", get(show_question).post(add_to_quiz))
        .route(
            "/questions/{id}/edit",
            get(edit_question_page).post(edit_question_post),
        )
        .route("/questions/{id}/delete", post(delete_question))
}

/// Load a question and check it belongs to `user_id`.
async fn owned_question(
    state: &AppState,
    question_id: i64,
    user_id: i64,
) -> Result<Question, AppError> {
    let question = state
        .db
        .get_question(question_id)
        .await
        .reject("could not get question")?
        .reject_not_found()?;

    if question.user_id != user_id {
        return Err(AppError::NotFound);
    }
    Ok(question)
}

async fn question_list(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let questions = state
        .db
        .questions(user.id)
        .await
        .reject("could not get questions")?;

    Ok(views::render(
        is_htmx,
        "My Questions",
        question_views::question_list(questions),
        Some(&user.username),
    ))
}

async fn create_question_page(AuthGuard(user): AuthGuard, IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Add Question",
        question_views::create_question(None),
        Some(&user.username),
    )
}

#[derive(Deserialize)]
struct QuestionPost {
    question: String,
    answer: String,
    difficulty: i64,
}

fn validate_question(body: &QuestionPost) -> Result<(), &'static str> {
    if body.question.trim().is_empty() {
        return Err("Question can't be blank");
    }
    if body.answer.trim().is_empty() {
        return Err("Answer can't be blank");
    }
    if !(difficulty::MIN_BAND..=difficulty::MAX_BAND).contains(&body.difficulty) {
        return Err("Select a difficulty");
    }
    Ok(())
}

async fn create_question_post(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Form(body): Form<QuestionPost>,
) -> Result<maud::Markup, AppError> {
    if let Err(msg) = validate_question(&body) {
        return Ok(views::titled(
            "Add Question",
            question_views::create_question(Some(msg)),
        ));
    }

    let question_id = state
        .db
        .create_question(
            body.question.trim(),
            body.answer.trim(),
            body.difficulty,
            user.id,
        )
        .await
        .reject("could not create question")?;

    show_question_body(&state, question_id, user.id, None).await
}

async fn show_question_body(
    state: &AppState,
    question_id: i64,
    user_id: i64,
    error: Option<&str>,
) -> Result<maud::Markup, AppError> {
    let question = owned_question(state, question_id, user_id).await?;
    let choices = state
        .db
        .quizzes_without_question(question_id, user_id)
        .await
        .reject("could not get quiz choices")?;

    Ok(views::titled(
        "Question",
        question_views::show_question(&question, choices, error),
    ))
}

async fn show_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(question_id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    let question = owned_question(&state, question_id, user.id).await?;
    let choices = state
        .db
        .quizzes_without_question(question_id, user.id)
        .await
        .reject("could not get quiz choices")?;

    Ok(views::render(
        is_htmx,
        "Question",
        question_views::show_question(&question, choices, None),
        Some(&user.username),
    ))
}

#[derive(Deserialize)]
struct AddToQuizPost {
    quiz_id: i64,
    round: i64,
}

async fn add_to_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Form(body): Form<AddToQuizPost>,
) -> Result<maud::Markup, AppError> {
    owned_question(&state, question_id, user.id).await?;

    let quiz = state
        .db
        .get_quiz(body.quiz_id)
        .await
        .reject("could not get quiz")?
        .reject_not_found()?;
    if quiz.user_id != user.id {
        return Err(AppError::NotFound);
    }

    if !(1..=quiz.rounds).contains(&body.round) {
        return show_question_body(
            &state,
            question_id,
            user.id,
            Some("That round does not exist on the selected quiz"),
        )
        .await;
    }

    // The composite primary key turns a double-add into an error; report it
    // instead of linking the question twice.
    if let Err(e) = state
        .db
        .link_question(quiz.id, question_id, body.round)
        .await
    {
        tracing::warn!("could not link question {question_id} to quiz {}: {e}", quiz.id);
        return show_question_body(
            &state,
            question_id,
            user.id,
            Some("This question is already on that quiz"),
        )
        .await;
    }

    let questions = state
        .db
        .quiz_questions(quiz.id)
        .await
        .reject("could not get quiz questions")?;
    Ok(views::titled(
        &quiz.name,
        crate::views::quiz::show_quiz(&quiz, &questions),
    ))
}

async fn edit_question_page(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(question_id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    let question = owned_question(&state, question_id, user.id).await?;

    Ok(views::render(
        is_htmx,
        "Edit Question",
        question_views::edit_question(&question, None),
        Some(&user.username),
    ))
}

async fn edit_question_post(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Form(body): Form<QuestionPost>,
) -> Result<maud::Markup, AppError> {
    let question = owned_question(&state, question_id, user.id).await?;

    if let Err(msg) = validate_question(&body) {
        return Ok(views::titled(
            "Edit Question",
            question_views::edit_question(&question, Some(msg)),
        ));
    }

    state
        .db
        .update_question(
            question_id,
            body.question.trim(),
            body.answer.trim(),
            body.difficulty,
        )
        .await
        .reject("could not update question")?;

    show_question_body(&state, question_id, user.id, None).await
}

async fn delete_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    owned_question(&state, question_id, user.id).await?;

    state
        .db
        .delete_question(question_id, user.id)
        .await
        .reject("could not delete question")?;

    let questions = state
        .db
        .questions(user.id)
        .await
        .reject("could not get questions")?;
    Ok(views::titled(
        "My Questions",
        question_views::question_list(questions),
    ))
}
