//! Upload intake
//!
//! Reads the single file field of a multipart form, validates its type and
//! size, and stages the bytes in a temporary file. The staged file is
//! deleted when [`StagedUpload`] is dropped, so every return path of a
//! request handler releases it.

use std::path::Path;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// Largest accepted document (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Transport-level body limit. Leaves room for multipart framing so an
/// oversized file is reported as [`UploadError::TooLarge`] rather than a
/// bare 413 from the framework.
pub const MAX_REQUEST_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Accepted document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Jpeg,
    Png,
}

impl DocumentKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Jpeg => "image/jpeg",
            DocumentKind::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => ".pdf",
            DocumentKind::Jpeg => ".jpg",
            DocumentKind::Png => ".png",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(DocumentKind::Pdf),
            "image/jpeg" | "image/jpg" => Some(DocumentKind::Jpeg),
            "image/png" => Some(DocumentKind::Png),
            _ => None,
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "jpg" | "jpeg" => Some(DocumentKind::Jpeg),
            "png" => Some(DocumentKind::Png),
            _ => None,
        }
    }

    /// Declared content type wins; the file extension is only consulted
    /// when the client sent no type or a generic binary one.
    pub fn resolve(content_type: Option<&str>, file_name: &str) -> Option<Self> {
        match content_type {
            Some(mime) if !mime.trim().is_empty() && !mime.starts_with("application/octet-stream") => {
                Self::from_mime_type(mime)
            }
            _ => Self::from_file_name(file_name),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file uploaded. Please choose a PDF, JPEG, or PNG document.")]
    MissingFile,
    #[error("The uploaded file is empty.")]
    EmptyFile,
    #[error("Invalid file type ({0}). Only PDF, JPEG, and PNG files are allowed.")]
    UnsupportedType(String),
    #[error("File too large. Maximum size is {} MB.", MAX_UPLOAD_BYTES / (1024 * 1024))]
    TooLarge,
    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Could not stage upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::MissingFile
            | UploadError::EmptyFile
            | UploadError::UnsupportedType(_)
            | UploadError::TooLarge => StatusCode::BAD_REQUEST,
            UploadError::Multipart(e) => e.status(),
            UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A validated upload held in a temporary file.
#[derive(Debug)]
pub struct StagedUpload {
    pub file_name: String,
    pub kind: DocumentKind,
    pub size: usize,
    file: NamedTempFile,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub async fn read_bytes(&self) -> Result<Vec<u8>, UploadError> {
        Ok(tokio::fs::read(self.path()).await?)
    }
}

/// Stage the first file field of `multipart` into `upload_dir`.
///
/// Non-file fields are skipped, as is a file field with an empty file name
/// (what browsers send for an untouched file input). The size limit is enforced while streaming,
/// so an oversized upload is never fully buffered.
pub async fn receive_upload(multipart: &mut Multipart, upload_dir: &Path) -> Result<StagedUpload, UploadError> {
    while let Some(mut field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().filter(|name| !name.is_empty()).map(str::to_string) else {
            continue;
        };

        let kind = DocumentKind::resolve(field.content_type(), &file_name).ok_or_else(|| {
            UploadError::UnsupportedType(field.content_type().unwrap_or("unknown").to_string())
        })?;

        tokio::fs::create_dir_all(upload_dir).await?;
        let staged = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(kind.extension())
            .tempfile_in(upload_dir)?;
        let mut writer = tokio::fs::File::from_std(staged.reopen()?);

        let mut size = 0usize;
        while let Some(chunk) = field.chunk().await? {
            size += chunk.len();
            if size > MAX_UPLOAD_BYTES {
                return Err(UploadError::TooLarge);
            }
            writer.write_all(&chunk).await?;
        }
        writer.flush().await?;

        if size == 0 {
            return Err(UploadError::EmptyFile);
        }

        let upload = StagedUpload {
            file_name,
            kind,
            size,
            file: staged,
        };
        tracing::debug!("Staged {} ({} bytes) at {}", upload.file_name, upload.size, upload.path().display());
        return Ok(upload);
    }

    Err(UploadError::MissingFile)
}
