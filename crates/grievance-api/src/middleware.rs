use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use grievance_types::api::Claims;

use crate::auth::{self, AppState, AppStateInner};

/// Cookie holding the signed session token.
pub const AUTH_COOKIE: &str = "auth_token";

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Removal cookie; path must match the one used by [`session_cookie`].
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE).path("/").build()
}

/// Claims from a valid `auth_token` cookie, if any. Never rejects the request.
pub fn session_claims(state: &AppStateInner, jar: &CookieJar) -> Option<Claims> {
    let token = jar.get(AUTH_COOKIE)?.value();
    match auth::verify_token(&state.jwt_secret, token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!("Ignoring invalid session cookie: {}", e);
            None
        }
    }
}

/// Gate for sensitive pages. Valid sessions get their `Claims` inserted into
/// request extensions; everyone else is sent to the login form.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match session_claims(&state, &jar) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => {
            warn!("Unauthenticated request to {}", req.uri().path());
            Redirect::to("/login").into_response()
        }
    }
}
