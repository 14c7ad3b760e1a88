//! Application-wide error types.
//!
//! Library modules use specific variants via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: top-level application error enum
//! - Every pipeline stage failure maps onto one variant so the driver
//!   can report a single descriptive message per row

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all pipeline stages for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest parsing error
    #[error("Manifest error: {0}")]
    Manifest(#[from] csv::Error),

    /// A manifest row that cannot be processed
    #[error("Invalid manifest row: {0}")]
    InvalidRow(String),

    /// Malformed or non-positive-duration time range string
    #[error("Invalid time range {input:?}: {message}")]
    InvalidTimeRange { input: String, message: String },

    /// Expected audio or thumbnail absent after a successful download
    #[error("Missing artifact after download: {0}")]
    MissingArtifact(PathBuf),

    /// Non-zero exit (or failure to launch) from the download tool
    #[error("Download tool failed: {0}")]
    ExternalTool(String),

    /// The file could not be probed or parsed for metadata access
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// The underlying container rejected a tag or picture write
    #[error("Metadata write failed for {path}: {message}")]
    MetadataWrite { path: PathBuf, message: String },

    /// Image decode/encode error while cropping the thumbnail
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// File organization error
    #[error("Organization error: {0}")]
    Organization(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid time range error.
    pub fn invalid_time_range(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTimeRange {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create an invalid row error.
    pub fn invalid_row(message: impl Into<String>) -> Self {
        Self::InvalidRow(message.into())
    }

    /// Create a missing artifact error.
    pub fn missing_artifact(path: impl Into<PathBuf>) -> Self {
        Self::MissingArtifact(path.into())
    }

    /// Create an external tool error.
    pub fn external_tool(message: impl Into<String>) -> Self {
        Self::ExternalTool(message.into())
    }

    /// Create a metadata access error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a metadata write error.
    pub fn metadata_write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MetadataWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an organization error.
    pub fn organization(message: impl Into<String>) -> Self {
        Self::Organization(message.into())
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

impl<T> ResultExt<T> for std::result::Result<T, csv::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Manifest(e).context(ctx))
    }
}
