//! # Temp-file upload guard
//!
//! Uploaded parts are persisted to the OS temp directory for the duration
//! of one request. `TempUpload` owns that file and removes it when dropped,
//! which makes cleanup run on every exit path, including early returns from
//! failed pipeline stages. A failed removal is logged and never masks the
//! request outcome.

use shelfscan::ImageInput;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// A persisted upload with drop-based cleanup.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    mime_type: String,
}

impl TempUpload {
    /// Writes the uploaded bytes to a fresh file in the OS temp directory.
    ///
    /// The mime type is taken from the multipart content type when present,
    /// otherwise guessed from the original filename's extension, defaulting
    /// to `image/jpeg` as the original service always assumed.
    pub async fn persist(
        bytes: &[u8],
        original_filename: Option<&str>,
        content_type: Option<&str>,
    ) -> std::io::Result<Self> {
        let extension = original_filename
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let path = std::env::temp_dir().join(format!("shelfscan-{}{extension}", Uuid::new_v4()));

        tokio::fs::write(&path, bytes).await?;

        let mime_type = content_type
            .filter(|value| value.starts_with("image/"))
            .map(ToString::to_string)
            .unwrap_or_else(|| guess_mime_type(original_filename));

        Ok(Self { path, mime_type })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// A borrowed view of this upload for the pipeline.
    pub fn image_input(&self) -> ImageInput {
        ImageInput::new(self.path.clone(), self.mime_type.clone())
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), %error, "Failed to remove uploaded temp file");
        }
    }
}

fn guess_mime_type(original_filename: Option<&str>) -> String {
    let extension = original_filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
    .to_string()
}
