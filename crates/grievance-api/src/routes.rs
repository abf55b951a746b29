use axum::{Router, extract::DefaultBodyLimit, middleware, routing::get};
use tower_http::services::ServeDir;

use crate::auth::{self, AppState};
use crate::middleware::require_session;
use crate::{complaints, pages};

/// Public path prefix for stored attachments.
pub const UPLOADS_PREFIX: &str = "/uploads";

pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/admin", get(complaints::admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/", get(complaints::home).post(complaints::submit))
        .route("/signup", get(pages::signup_form).post(auth::signup))
        .route("/login", get(pages::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .merge(protected_routes)
        .nest_service(UPLOADS_PREFIX, ServeDir::new(&state.upload_dir))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .with_state(state)
}
