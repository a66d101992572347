//! Notifier error types with log-friendly error codes.
//!
//! [`NotifierError`] is the central error type for the crate. Each variant
//! maps to a numeric code so that failures can be grouped in structured logs
//! without string matching.

use reqwest::StatusCode;

/// Crate-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category      | Cycle impact                          |
/// |-----------|---------------|---------------------------------------|
/// | 1000–1999 | Configuration | Fatal at startup                      |
/// | 2000–2999 | Upstream      | Board: abort cycle. Card: skip card   |
/// | 3000–3999 | Render        | Skip the activity                     |
/// | 4000–4999 | Delivery      | Skip the activity                     |
/// | 5000–5999 | Persistence   | Cycle fails, process keeps polling    |
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    /// A required environment variable is absent or blank.
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// A configuration value is present but cannot be parsed.
    #[error("invalid configuration value for {key}: {value:?}")]
    InvalidConfig {
        /// Environment variable name.
        key: &'static str,
        /// Raw value that failed to parse.
        value: String,
    },

    /// Upstream answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Status returned by the upstream service.
        status: StatusCode,
        /// Requested URL (without credentials).
        url: String,
    },

    /// Transport, timeout or body decoding failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// An activity object could not be decoded.
    #[error("malformed activity: {0}")]
    MalformedActivity(String),

    /// A known activity type is missing the payload field its template needs.
    #[error("activity `{activity_type}` is missing field `{field}`")]
    MissingField {
        /// Activity type tag.
        activity_type: String,
        /// Dotted path of the missing field.
        field: &'static str,
    },

    /// The message sink rejected the notification.
    #[error("delivery rejected: {0}")]
    Delivery(String),

    /// Watermark storage failure.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl NotifierError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MissingConfig(_) => 1001,
            Self::InvalidConfig { .. } => 1002,
            Self::HttpStatus { .. } => 2001,
            Self::Request(_) => 2002,
            Self::MalformedActivity(_) => 3001,
            Self::MissingField { .. } => 3002,
            Self::Delivery(_) => 4001,
            Self::Persistence(_) => 5001,
        }
    }
}

impl From<std::io::Error> for NotifierError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
