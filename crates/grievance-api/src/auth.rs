use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{info, warn};

use grievance_db::{Database, DbError};
use grievance_types::api::{Claims, LoginForm, SignupForm};

use crate::error::AppError;
use crate::middleware::{AUTH_COOKIE, clear_session_cookie, session_cookie};
use crate::{pages, with_db};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub session_ttl: chrono::Duration,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

const SIGNUP_FAILED: &str = "There was an error!";
const LOGIN_FAILED: &str = "Error during login";

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect, AppError> {
    if !form.passwords_match() {
        return Err(AppError::PasswordMismatch);
    }

    let password_hash = hash_password(&form.user_pwd1).map_err(AppError::internal(SIGNUP_FAILED))?;

    let email = form.user_email.clone();
    match with_db(&state, move |db| db.create_user(&email, &password_hash)).await {
        Ok(user_id) => {
            info!("Created user {} ({})", form.user_email, user_id);
            Ok(Redirect::to("/"))
        }
        Err(e) if matches!(e.downcast_ref::<DbError>(), Some(DbError::DuplicateUser)) => {
            warn!("Signup rejected, user already exists: {}", form.user_email);
            Err(AppError::UserExists)
        }
        Err(e) => Err(AppError::internal(SIGNUP_FAILED)(e)),
    }
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Html<String>), AppError> {
    info!("Attempting to log in user with email: {}", form.user_email);

    let email = form.user_email.clone();
    let user = with_db(&state, move |db| db.find_user_by_email(&email))
        .await
        .map_err(AppError::internal(LOGIN_FAILED))?
        .ok_or_else(|| {
            warn!("User not found: {}", form.user_email);
            AppError::UserNotFound
        })?;

    if !verify_password(&form.user_pwd, &user.password).map_err(AppError::internal(LOGIN_FAILED))? {
        warn!("Invalid password for user: {}", form.user_email);
        return Err(AppError::InvalidPassword);
    }

    let token = issue_token(&state.jwt_secret, &user.email, state.session_ttl)
        .map_err(AppError::internal(LOGIN_FAILED))?;

    info!("User {} logged in", user.email);
    Ok((jar.add(session_cookie(token)), Html(pages::home(true))))
}

/// GET /logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    if jar.get(AUTH_COOKIE).is_some() {
        info!("Session cleared");
    }
    (jar.remove(clear_session_cookie()), Redirect::to("/login"))
}

// -- Password hashing --

/// Hash with Argon2id using the library's fixed default cost and a fresh salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash can't be used.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("stored hash is malformed: {}", e))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("password verification failed: {}", e)),
    }
}

// -- Session tokens --

pub fn issue_token(secret: &str, email: &str, ttl: chrono::Duration) -> anyhow::Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Check signature and expiry.
pub fn verify_token(secret: &str, token: &str) -> anyhow::Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verify_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("pw").unwrap();
        let b = hash_password("pw").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("pw", &a).unwrap());
        assert!(verify_password("pw", &b).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-phc-string").is_err());
    }

    #[test]
    fn token_carries_email_and_expiry() {
        let token = issue_token("secret", "a@b.com", chrono::Duration::hours(1)).unwrap();
        let claims = verify_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "a@b.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = issue_token("secret", "a@b.com", chrono::Duration::hours(1)).unwrap();
        assert!(verify_token("other", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token("secret", "a@b.com", chrono::Duration::hours(-2)).unwrap();
        assert!(verify_token("secret", &token).is_err());
    }
}
