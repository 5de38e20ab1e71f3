pub mod assembly;
pub mod db;
pub mod difficulty;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod trivia;
pub mod utils;
pub mod views;

use axum::{middleware, Router};

use trivia::TriviaClient;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub trivia: TriviaClient,
    pub secure_cookies: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::homepage::routes())
        .merge(handlers::quiz::routes())
        .merge(handlers::question::routes())
        .layer(middleware::from_fn(csrf_check))
        .with_state(state)
}

/// Form posts come from our own pages, which always submit through htmx.
/// Requests missing the HX-Request marker are rejected.
async fn csrf_check(
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;

    let state_changing = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

    if state_changing.contains(req.method()) {
        let has_hx_request = req
            .headers()
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "true");

        if !has_hx_request {
            return (StatusCode::FORBIDDEN, "CSRF check failed").into_response();
        }
    }

    next.run(req).await
}
