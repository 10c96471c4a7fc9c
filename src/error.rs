//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level error enum aggregating the hard failures of the
//!   ingestion pipeline
//! - Module-specific errors ([`TagError`], [`StageError`], [`CatalogError`],
//!   [`UploadError`]) for detailed handling
//!
//! Soft absences (no tag header, no artwork, no lyrics) are never errors;
//! they are `Option::None` at the call site.
//!
//! [`TagError`]: crate::metadata::TagError
//! [`StageError`]: crate::staging::StageError
//! [`CatalogError`]: crate::catalog::CatalogError
//! [`UploadError`]: crate::upload::UploadError

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Staging an artifact into the content store failed
    #[error("Staging error: {0}")]
    Stage(#[from] crate::staging::StageError),

    /// Remote catalog call failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),

    /// Album or singles upload aborted
    #[error("Upload error: {0}")]
    Upload(#[from] crate::upload::UploadError),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Expected a regular file
    #[error("Not a file: {0}")]
    NotAFile(PathBuf),

    /// Expected a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Extension outside the supported containers
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an unsupported format error.
    pub fn unsupported(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFormat(path.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, crate::upload::UploadError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Upload(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("/path/to/file.mp3");
        assert!(err.to_string().contains("/path/to/file.mp3"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::unsupported("/music/cover.flac").context("while showing metadata");
        let msg = err.to_string();
        assert!(msg.contains("while showing metadata"));
        assert!(msg.contains("cover.flac"));
    }

    #[test]
    fn test_upload_error_converts() {
        let err: Error = crate::upload::UploadError::NoAudioFiles(PathBuf::from("/albums/x")).into();
        assert!(err.to_string().contains("/albums/x"));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk full"));
        let with_ctx = result.with_context("staging audio");
        let msg = with_ctx.unwrap_err().to_string();
        assert!(msg.contains("staging audio"));
        assert!(msg.contains("disk full"));
    }
}
