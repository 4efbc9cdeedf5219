//! Error types.

/// Error enumerates the possible zonecrab error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when a required credential is neither in the config file nor in the
    /// environment.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// Returned when an outbound HTTP request to Telegram or Cloudflare fails at the
    /// transport level, or its response body can't be decoded.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Returned when the Telegram Bot API answers a method call with `ok: false`.
    #[error("Telegram API error ({method}): {description}")]
    Telegram {
        method: &'static str,
        description: String,
    },

    /// Returned when a Cloudflare API call answers with a non-success status or with
    /// `success: false`.
    #[error("Cloudflare API error ({operation}): {status}")]
    Provider {
        operation: &'static str,
        status: reqwest::StatusCode,
    },

    /// Returned when Cloudflare refuses to create a DNS record. Carries the provider's
    /// error list joined into a single human readable string.
    #[error("failed to add record: {0}")]
    RecordRejected(String),

    /// Returned when a timestamp for an analytics query can't be formatted.
    #[error("invalid timestamp")]
    TimeFormat(#[from] time::error::Format),

    /// Returned when an inline keyboard callback payload can't be decoded into a
    /// [`NavToken`][crate::bot::NavToken].
    #[error("invalid navigation token: \"{0}\"")]
    InvalidNavToken(String),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when [trying to load a `Config`][crate::config::Config::try_from_file] or
    /// reading a webhook body fails due to invalid JSON content.
    #[error("invalid JSON: {0}")]
    InvalidJSON(#[from] serde_json::Error),
}
