use axum::{
    extract::{Form, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderValue, StatusCode,
    },
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    extractors::{AuthGuard, IsHtmx},
    names,
    rejections::{AppError, ResultExt},
    utils, views, AppState,
};

use crate::views::homepage as homepage_views;
use crate::views::quiz as quiz_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(homepage))
        .route("/register", get(register_page).post(register_post))
        .route("/login", get(login_page).post(login_post))
        .route("/logout", post(logout_post))
        .route(
            "/delete-profile",
            get(delete_profile_page).post(delete_profile_post),
        )
}

async fn homepage(
    State(state): State<AppState>,
    jar: CookieJar,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<axum::response::Response, AppError> {
    if let Some(session_id) = jar
        .get(names::USER_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        if let Ok(Some(user)) = state.db.get_user_by_session(&session_id).await {
            let quizzes = state
                .db
                .quizzes(user.id)
                .await
                .reject("could not get quizzes")?;
            return Ok(views::render(
                is_htmx,
                "My Quizzes",
                quiz_views::quiz_list(quizzes),
                Some(&user.username),
            )
            .into_response());
        }
    }

    Ok(views::render(is_htmx, "Welcome", homepage_views::landing_page(), None).into_response())
}

async fn register_page(IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Register",
        homepage_views::register(homepage_views::RegisterState::NoError),
        None,
    )
}

#[derive(Deserialize)]
struct RegisterPost {
    username: String,
    password: String,
}

fn register_error(state: homepage_views::RegisterState) -> axum::response::Response {
    views::page("Register", homepage_views::register(state)).into_response()
}

async fn register_post(
    State(state): State<AppState>,
    Form(body): Form<RegisterPost>,
) -> Result<axum::response::Response, AppError> {
    use homepage_views::RegisterState;

    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return Ok(register_error(RegisterState::EmptyFields));
    }
    if body.password.len() < names::MIN_PASSWORD_LEN {
        return Ok(register_error(RegisterState::WeakPassword));
    }
    if state
        .db
        .username_exists(username)
        .await
        .reject("could not check username")?
    {
        return Ok(register_error(RegisterState::UsernameTaken));
    }

    // The UNIQUE constraint still backstops a register race; recover the
    // same way as the up-front check.
    let user_id = match state.db.create_user(username, &body.password).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("user creation failed for {username}: {e}");
            return Ok(register_error(RegisterState::UsernameTaken));
        }
    };

    let session = state
        .db
        .create_user_session(user_id)
        .await
        .reject("could not create session")?;

    logged_in_response(&session, state.secure_cookies)
}

async fn login_page(IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Log In",
        homepage_views::login(homepage_views::LoginState::NoError),
        None,
    )
}

#[derive(Deserialize)]
struct LoginPost {
    username: String,
    password: String,
}

async fn login_post(
    State(state): State<AppState>,
    Form(body): Form<LoginPost>,
) -> Result<axum::response::Response, AppError> {
    let valid = state
        .db
        .verify_user_password(&body.username, &body.password)
        .await
        .reject("could not verify password")?;

    if !valid {
        return Ok(views::page(
            "Log In",
            homepage_views::login(homepage_views::LoginState::InvalidCredentials),
        )
        .into_response());
    }

    let user = state
        .db
        .find_user_by_username(&body.username)
        .await
        .reject("could not look up user")?
        .ok_or(AppError::Unauthorized)?;

    let session = state
        .db
        .create_user_session(user.id)
        .await
        .reject("could not create session")?;

    logged_in_response(&session, state.secure_cookies)
}

fn logged_in_response(
    session: &str,
    secure_cookies: bool,
) -> Result<axum::response::Response, AppError> {
    let cookie = utils::cookie(names::USER_SESSION_COOKIE_NAME, session, secure_cookies);
    let cookie = HeaderValue::from_str(&cookie).reject("could not build session cookie")?;

    Ok((
        StatusCode::SEE_OTHER,
        [(SET_COOKIE, cookie), (LOCATION, HeaderValue::from_static("/"))],
        "",
    )
        .into_response())
}

async fn logout_post(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<axum::response::Response, AppError> {
    if let Some(session_id) = jar
        .get(names::USER_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        state
            .db
            .delete_user_session(&session_id)
            .await
            .reject("could not delete session")?;
    }

    let cookie = utils::clear_cookie(names::USER_SESSION_COOKIE_NAME);
    let cookie = HeaderValue::from_str(&cookie).reject("could not build session cookie")?;

    Ok((
        StatusCode::SEE_OTHER,
        [
            (SET_COOKIE, cookie),
            (LOCATION, HeaderValue::from_static(names::LOGIN_URL)),
        ],
        "",
    )
        .into_response())
}

async fn delete_profile_page(AuthGuard(user): AuthGuard, IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Delete Profile",
        homepage_views::delete_profile_page(),
        Some(&user.username),
    )
}

async fn delete_profile_post(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<axum::response::Response, AppError> {
    state
        .db
        .delete_user(user.id)
        .await
        .reject("could not delete user")?;

    let cookie = utils::clear_cookie(names::USER_SESSION_COOKIE_NAME);
    let cookie = HeaderValue::from_str(&cookie).reject("could not build session cookie")?;

    Ok((
        StatusCode::SEE_OTHER,
        [
            (SET_COOKIE, cookie),
            (LOCATION, HeaderValue::from_static(names::REGISTER_URL)),
        ],
        "",
    )
        .into_response())
}
