//! Environment-driven configuration.

use crate::error::{MediaError, MediaResult};

/// Model used for drafting when none is configured.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Configuration shared by the server and the CLI.
///
/// The database pair is always required; the generation key is only needed
/// by the drafting endpoint and stays optional so the read-only tools run
/// without it.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Base URL of the hosted database service.
    pub database_url: String,
    /// Service-role key for the hosted database (server-side only).
    pub database_service_key: String,
    /// Key for the text-generation API.
    pub openai_api_key: Option<String>,
    /// Model requested for drafting.
    pub openai_model: String,
    /// Shared key gating the admin endpoints.
    pub admin_api_key: Option<String>,
}

impl CoreConfig {
    /// Reads configuration from the environment.
    ///
    /// # Environment Variables
    /// - `MEDIA_DATABASE_URL`: base URL of the hosted database (required)
    /// - `MEDIA_DATABASE_SERVICE_KEY`: service-role key (required)
    /// - `OPENAI_API_KEY`: generation API key (optional)
    /// - `MEDIA_OPENAI_MODEL`: model name (default: `gpt-4o-mini`)
    /// - `MEDIA_ADMIN_API_KEY`: admin endpoint key (optional)
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::MissingConfig`] naming the first required
    /// variable that is absent.
    pub fn from_env() -> MediaResult<Self> {
        Ok(Self {
            database_url: require("MEDIA_DATABASE_URL")?,
            database_service_key: require("MEDIA_DATABASE_SERVICE_KEY")?,
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_model: std::env::var("MEDIA_OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.into()),
            admin_api_key: std::env::var("MEDIA_ADMIN_API_KEY").ok(),
        })
    }
}

fn require(name: &'static str) -> MediaResult<String> {
    std::env::var(name).map_err(|_| MediaError::MissingConfig(name))
}
