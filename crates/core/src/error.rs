//! Error types shared across the core crate.

/// Failures the core operations can produce.
///
/// One variant per failure site; the API layer decides which of these are
/// surfaced to callers and which are only logged.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),
    #[error("database request failed: {0}")]
    DatabaseRequest(reqwest::Error),
    #[error("database returned {status}: {message}")]
    DatabaseStatus { status: u16, message: String },
    #[error("failed to decode database response: {0}")]
    DatabaseDecode(reqwest::Error),
    #[error("database count response was malformed: {0:?}")]
    MalformedCount(String),
    #[error("generation request failed: {0}")]
    GenerationRequest(reqwest::Error),
    #[error("generation service returned {status}: {message}")]
    GenerationStatus { status: u16, message: String },
    #[error("invalid slug: {0}")]
    Slug(#[from] media_types::SlugError),
    #[error("unknown ranking period: {0:?}")]
    UnknownPeriod(String),
}

pub type MediaResult<T> = std::result::Result<T, MediaError>;
