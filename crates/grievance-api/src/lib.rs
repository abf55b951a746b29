pub mod auth;
pub mod complaints;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod routes;
pub mod uploads;

use grievance_db::Database;

use crate::auth::AppState;

/// Run a blocking store call off the async runtime.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&Database) -> grievance_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || f(&state.db)).await?;
    Ok(result?)
}
