use axum::{
    Extension,
    extract::{Multipart, State},
    response::{Html, Redirect},
};
use axum_extra::extract::CookieJar;
use tracing::{debug, info};

use grievance_types::api::{Claims, ComplaintSubmission, complaint_fields};

use crate::auth::AppState;
use crate::error::AppError;
use crate::middleware::session_claims;
use crate::uploads::{self, StoredUpload};
use crate::{pages, with_db};

const SAVE_FAILED: &str = "Error saving complaint";
const FETCH_FAILED: &str = "Error fetching complaints";

/// GET /
pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    let is_authenticated = session_claims(&state, &jar).is_some();
    Html(pages::home(is_authenticated))
}

/// GET /admin — behind `require_session`.
pub async fn admin(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Html<String>, AppError> {
    let complaints = with_db(&state, |db| db.list_complaints())
        .await
        .map_err(AppError::internal(FETCH_FAILED))?;

    debug!("{} viewed {} complaints", claims.sub, complaints.len());
    Ok(Html(pages::admin(&claims.sub, &complaints)))
}

/// POST / — multipart complaint form with an optional attachment.
pub async fn submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut submission = ComplaintSubmission::default();
    let mut attachment: Option<StoredUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(AppError::internal(SAVE_FAILED))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == complaint_fields::ATTACHMENT {
            // only the first file field counts
            if attachment.is_none() {
                attachment = uploads::store_upload(&state.upload_dir, field)
                    .await
                    .map_err(AppError::internal(SAVE_FAILED))?;
            }
            continue;
        }

        let value = field.text().await.map_err(AppError::internal(SAVE_FAILED))?;
        if !submission.set_field(&name, value) {
            debug!("Ignoring unknown complaint field {:?}", name);
        }
    }

    let attachment_path = attachment
        .as_ref()
        .map(|a| a.path.to_string_lossy().into_owned());

    let record = submission.clone();
    let id = with_db(&state, move |db| {
        db.insert_complaint(
            &record.email,
            &record.name,
            &record.location,
            &record.message,
            attachment_path.as_deref(),
        )
    })
    .await
    .map_err(AppError::internal(SAVE_FAILED))?;

    info!(
        "Complaint {} saved from {} (attachment: {})",
        id,
        submission.email,
        attachment.as_ref().map_or("none", |a| a.file_name.as_str()),
    );
    Ok(Redirect::to("/"))
}
