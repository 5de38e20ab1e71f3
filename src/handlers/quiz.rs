use std::collections::HashSet;

use axum::{
    extract::{Form, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::{
    assembly::{self, AcquireError, ReplaceError},
    db::models::Quiz,
    difficulty,
    extractors::{AuthGuard, IsHtmx},
    names,
    rejections::{AppError, OptionExt, ResultExt},
    views, AppState,
};

use crate::views::quiz as quiz_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes", get(quiz_list))
        .route("/quizzes/create", get(create_quiz_page).post(create_quiz_post))
        .route("/quizzes/{id}", get(show_quiz))
        .route("/quizzes/{id}/edit", get(edit_quiz))
        .route("/quizzes/{id}/delete", post(delete_quiz))
        .route("/quizzes/{id}/replace", post(replace_questions))
        .route("/quizzes/{id}/remove/{question_id}", post(remove_question))
}

/// Load a quiz and check it belongs to `user_id`. Quizzes of other users are
/// indistinguishable from missing ones.
async fn owned_quiz(state: &AppState, quiz_id: i64, user_id: i64) -> Result<Quiz, AppError> {
    let quiz = state
        .db
        .get_quiz(quiz_id)
        .await
        .reject("could not get quiz")?
        .reject_not_found()?;

    if quiz.user_id != user_id {
        return Err(AppError::NotFound);
    }
    Ok(quiz)
}

async fn quiz_list(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let quizzes = state
        .db
        .quizzes(user.id)
        .await
        .reject("could not get quizzes")?;

    Ok(views::render(
        is_htmx,
        "My Quizzes",
        quiz_views::quiz_list(quizzes),
        Some(&user.username),
    ))
}

async fn create_quiz_page(AuthGuard(user): AuthGuard, IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Create Quiz",
        quiz_views::create_quiz(None),
        Some(&user.username),
    )
}

struct CreateQuizForm {
    name: String,
    description: Option<String>,
    rounds: i64,
    qs_per_round: i64,
    /// Accepted difficulty bands per round, indexed by `round - 1`.
    round_diffs: Vec<HashSet<i64>>,
}

/// The create-quiz form carries repeated checkbox fields, so it arrives as
/// raw key/value pairs rather than a flat struct.
fn parse_create_quiz(pairs: Vec<(String, String)>) -> Result<CreateQuizForm, &'static str> {
    let mut name = None;
    let mut description = None;
    let mut rounds = None;
    let mut qs_per_round = None;
    let mut round_diffs: Vec<HashSet<i64>> =
        vec![HashSet::new(); names::MAX_ROUNDS as usize];

    for (key, value) in pairs {
        match key.as_str() {
            "name" => name = Some(value),
            "description" => description = Some(value),
            "rounds" => rounds = value.parse::<i64>().ok(),
            "qs_per_round" => qs_per_round = value.parse::<i64>().ok(),
            _ => {
                if let Some(round) = key
                    .strip_prefix("round_")
                    .and_then(|k| k.strip_suffix("_diff"))
                    .and_then(|r| r.parse::<usize>().ok())
                {
                    let band = value.parse::<i64>().ok();
                    match (round, band) {
                        (1..=5, Some(band))
                            if (difficulty::MIN_BAND..=difficulty::MAX_BAND)
                                .contains(&band) =>
                        {
                            round_diffs[round - 1].insert(band);
                        }
                        _ => return Err("invalid difficulty selection"),
                    }
                }
            }
        }
    }

    let name = name.map(|n| n.trim().to_string()).unwrap_or_default();
    if name.is_empty() {
        return Err("Quiz name can't be blank");
    }
    if name.chars().count() > names::MAX_QUIZ_NAME_LEN {
        return Err("Quiz name can't exceed 50 characters");
    }

    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if description
        .as_ref()
        .is_some_and(|d| d.chars().count() > names::MAX_QUIZ_DESCRIPTION_LEN)
    {
        return Err("Quiz description can't exceed 250 characters");
    }

    let rounds = rounds.ok_or("Select a number of rounds")?;
    if !(names::MIN_ROUNDS..=names::MAX_ROUNDS).contains(&rounds) {
        return Err("Select a number of rounds");
    }

    let qs_per_round = qs_per_round.ok_or("Select questions per round")?;
    if !names::QUESTIONS_PER_ROUND_CHOICES.contains(&qs_per_round) {
        return Err("Select questions per round");
    }

    for round in 1..=rounds {
        if round_diffs[(round - 1) as usize].is_empty() {
            return Err("Select at least one difficulty level for every round");
        }
    }

    Ok(CreateQuizForm {
        name,
        description,
        rounds,
        qs_per_round,
        round_diffs,
    })
}

fn acquire_error_message(err: &AcquireError) -> &'static str {
    match err {
        AcquireError::Unavailable(_) => "The trivia source is unavailable. Try again later.",
        AcquireError::Exhausted { .. } => {
            "The trivia source ran out of questions matching the requested difficulty."
        }
    }
}

async fn create_quiz_post(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<axum::response::Response, AppError> {
    let form = match parse_create_quiz(pairs) {
        Ok(form) => form,
        Err(msg) => {
            return Ok(views::titled("Create Quiz", quiz_views::create_quiz(Some(msg)))
                .into_response())
        }
    };

    let quiz_id = state
        .db
        .create_quiz(&form.name, form.description.as_deref(), form.rounds, user.id)
        .await
        .reject("could not create quiz")?;

    // Rounds are filled and committed one at a time: a failed round leaves
    // the earlier ones in place, and the error page links to the quiz.
    for round in 1..=form.rounds {
        let accepted = &form.round_diffs[(round - 1) as usize];
        let questions = match assembly::assemble(
            &state.trivia,
            accepted,
            form.qs_per_round as usize,
            user.id,
        )
        .await
        {
            Ok(questions) => questions,
            Err(err) => {
                tracing::error!("assembly failed for quiz {quiz_id} round {round}: {err}");
                return Ok(views::titled(
                    "Create Quiz",
                    quiz_views::assembly_failed(quiz_id, round, acquire_error_message(&err)),
                )
                .into_response());
            }
        };

        state
            .db
            .add_questions_to_round(quiz_id, round, &questions)
            .await
            .reject("could not persist round questions")?;
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        "HX-Replace-Url",
        names::quiz_url(quiz_id)
            .parse()
            .map_err(|_| AppError::Internal("could not build redirect header"))?,
    );

    let body = quiz_page_body(&state, quiz_id, user.id).await?;
    Ok((headers, views::titled("Quiz", body)).into_response())
}

async fn quiz_page_body(
    state: &AppState,
    quiz_id: i64,
    user_id: i64,
) -> Result<maud::Markup, AppError> {
    let quiz = owned_quiz(state, quiz_id, user_id).await?;
    let questions = state
        .db
        .quiz_questions(quiz_id)
        .await
        .reject("could not get quiz questions")?;

    Ok(quiz_views::show_quiz(&quiz, &questions))
}

async fn show_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(quiz_id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    let quiz = owned_quiz(&state, quiz_id, user.id).await?;
    let questions = state
        .db
        .quiz_questions(quiz_id)
        .await
        .reject("could not get quiz questions")?;

    Ok(views::render(
        is_htmx,
        &quiz.name,
        quiz_views::show_quiz(&quiz, &questions),
        Some(&user.username),
    ))
}

async fn edit_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(quiz_id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    let quiz = owned_quiz(&state, quiz_id, user.id).await?;
    let questions = state
        .db
        .quiz_questions(quiz_id)
        .await
        .reject("could not get quiz questions")?;

    Ok(views::render(
        is_htmx,
        "Edit Quiz",
        quiz_views::edit_quiz(&quiz, &questions, None),
        Some(&user.username),
    ))
}

async fn delete_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    if !state
        .db
        .verify_quiz_owner(quiz_id, user.id)
        .await
        .reject("could not verify quiz owner")?
    {
        return Err(AppError::NotFound);
    }

    state
        .db
        .delete_quiz(quiz_id, user.id)
        .await
        .reject("could not delete quiz")?;

    let quizzes = state
        .db
        .quizzes(user.id)
        .await
        .reject("could not get quizzes")?;
    Ok(views::titled("My Quizzes", quiz_views::quiz_list(quizzes)))
}

async fn replace_questions(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<maud::Markup, AppError> {
    let quiz = owned_quiz(&state, quiz_id, user.id).await?;

    let checked: Vec<i64> = pairs
        .iter()
        .filter(|(key, _)| key == "checked_questions")
        .filter_map(|(_, value)| value.parse::<i64>().ok())
        .collect();

    let mut error = None;
    for question_id in checked {
        match assembly::replace(&state.db, &state.trivia, quiz_id, question_id).await {
            Ok(_) => {}
            Err(ReplaceError::NotFound) => return Err(AppError::NotFound),
            Err(ReplaceError::Acquire(err)) => {
                // Earlier replacements stand; this one changed nothing.
                tracing::error!("replacement failed on quiz {quiz_id}: {err}");
                error = Some(acquire_error_message(&err));
                break;
            }
            Err(ReplaceError::Db(e)) => {
                tracing::error!("replacement failed on quiz {quiz_id}: {e}");
                return Err(AppError::Internal("could not replace question"));
            }
        }
    }

    let questions = state
        .db
        .quiz_questions(quiz_id)
        .await
        .reject("could not get quiz questions")?;
    Ok(views::titled(
        "Edit Quiz",
        quiz_views::edit_quiz(&quiz, &questions, error),
    ))
}

async fn remove_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
) -> Result<maud::Markup, AppError> {
    let quiz = owned_quiz(&state, quiz_id, user.id).await?;

    // A question that was never on the quiz is a missing resource, not a
    // silent no-op.
    state
        .db
        .get_quiz_question(quiz_id, question_id)
        .await
        .reject("could not get quiz question")?
        .reject_not_found()?;

    state
        .db
        .unlink_question(quiz_id, question_id)
        .await
        .reject("could not remove question from quiz")?;

    let questions = state
        .db
        .quiz_questions(quiz_id)
        .await
        .reject("could not get quiz questions")?;
    Ok(views::titled(
        "Edit Quiz",
        quiz_views::edit_quiz(&quiz, &questions, None),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_pairs(name: &str) -> Vec<(String, String)> {
        vec![
            ("name".into(), name.into()),
            ("rounds".into(), "1".into()),
            ("qs_per_round".into(), "5".into()),
            ("round_1_diff".into(), "1".into()),
        ]
    }

    #[test]
    fn quiz_name_limit_counts_characters_not_bytes() {
        // Two bytes per character in UTF-8.
        let name = "ä".repeat(names::MAX_QUIZ_NAME_LEN);
        let form = parse_create_quiz(base_pairs(&name)).unwrap();
        assert_eq!(form.name, name);

        let too_long = "ä".repeat(names::MAX_QUIZ_NAME_LEN + 1);
        assert!(parse_create_quiz(base_pairs(&too_long)).is_err());
    }

    #[test]
    fn description_limit_counts_characters_not_bytes() {
        let mut pairs = base_pairs("Quiz");
        pairs.push((
            "description".into(),
            "é".repeat(names::MAX_QUIZ_DESCRIPTION_LEN),
        ));
        assert!(parse_create_quiz(pairs).is_ok());

        let mut pairs = base_pairs("Quiz");
        pairs.push((
            "description".into(),
            "é".repeat(names::MAX_QUIZ_DESCRIPTION_LEN + 1),
        ));
        assert!(parse_create_quiz(pairs).is_err());
    }
}
