use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use rand::Rng;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Upper bound (exclusive) of the random component in stored file names.
const NAME_NONCE_RANGE: u32 = 1_000_000_000;

/// Attachment written to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub path: PathBuf,
    pub file_name: String,
}

/// `<unix millis>-<random 0..1e9>-<original name>`.
pub fn generate_file_name(original: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let nonce = rand::rng().random_range(0..NAME_NONCE_RANGE);
    format!("{}-{}-{}", millis, nonce, sanitize_file_name(original))
}

/// Characters that would end or re-interpret the `/uploads/<name>` URL path.
const URL_RESERVED: &[char] = &['?', '#', '%'];

/// Keep only the last path component of a client-supplied name so it can't
/// point outside the upload directory, and drop characters that would break
/// the attachment's public URL.
pub fn sanitize_file_name(original: &str) -> String {
    let last = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .filter(|c| !c.is_control() && !URL_RESERVED.contains(c))
        .collect();

    match cleaned.trim() {
        "" | "." | ".." => "upload".to_string(),
        name => name.to_string(),
    }
}

/// Stream a multipart file field to `dir`. Returns `None` when the form had
/// no file selected (browsers send an empty filename in that case).
pub async fn store_upload(dir: &Path, mut field: Field<'_>) -> anyhow::Result<Option<StoredUpload>> {
    let original = match field.file_name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Ok(None),
    };

    fs::create_dir_all(dir).await?;

    let file_name = generate_file_name(&original);
    let path = dir.join(&file_name);
    let mut file = fs::File::create(&path).await?;

    let mut size = 0u64;
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                discard(&path).await;
                return Err(e.into());
            }
        };
        if let Err(e) = file.write_all(&chunk).await {
            discard(&path).await;
            return Err(e.into());
        }
        size += chunk.len() as u64;
    }
    file.flush().await?;

    info!("Stored attachment {} ({} bytes)", path.display(), size);
    Ok(Some(StoredUpload {
        path,
        file_name,
    }))
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!("Failed to remove partial upload {}: {}", path.display(), e);
    }
}
