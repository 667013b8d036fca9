//! Router assembly: the quiz API, static pages, CORS, caching headers,
//! and HTTP tracing.

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::{any, get, get_service, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::AppState;

pub mod http;

/// Build the application router with:
/// - the quiz API under `/api/...` (play endpoints public, authoring
///   endpoints behind the admin token)
/// - the play page at `/quiz/:id` plus static assets from `./static`
/// - CORS (allow any origin/method/headers) and per-request tracing
pub fn build_router(state: AppState) -> Router {
    let static_service = ServeDir::new("./static").append_index_html_on_directories(true);

    Router::new()
        .route("/api/health", get(http::http_health))
        .route(
            "/api/quizzes",
            get(http::list_quizzes).post(http::create_quiz),
        )
        .route(
            "/api/quizzes/:id",
            get(http::get_quiz)
                .put(http::update_quiz)
                .delete(http::delete_quiz),
        )
        .route("/api/quizzes/:id/log", post(http::record_play_log))
        .route("/api/quizzes/:id/logs", get(http::list_play_logs))
        // Anything else under /api answers JSON, not the SPA fallback.
        .route("/api/*rest", any(http::api_not_found))
        // The play page is one static document; the quiz id is resolved
        // client-side from the path.
        .route("/quiz/:id", get_service(ServeFile::new("./static/quiz.html")))
        .route("/admin", get_service(ServeFile::new("./static/admin.html")))
        .with_state(state)
        .layer(middleware::from_fn(no_store))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .fallback_service(static_service)
}

/// Quiz content changes under authors' hands; never let a stale cached
/// copy reach a learner mid-edit.
async fn no_store(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    res
}
