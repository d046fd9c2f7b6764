//! Error types for the sticker picker.
//!
//! This module defines the centralized error type [`PickerError`] and a type alias
//! [`Result`] used throughout the crate. Load-cycle failures (bad HTTP status,
//! transport failure, malformed documents) share the enum with storage and
//! configuration failures so every fallible path can propagate with `?`.

use thiserror::Error;

/// The main error type for sticker picker operations.
///
/// # Examples
///
/// ```
/// use stickerpicker::PickerError;
///
/// let err = PickerError::HttpStatus {
///     location: "https://example.org/packs/index.json".to_string(),
///     status: 500,
///     status_text: "Internal Server Error".to_string(),
/// };
/// assert!(err.to_string().contains("Internal Server Error"));
/// ```
#[derive(Debug, Error)]
pub enum PickerError {
    /// Storage operation failed.
    ///
    /// Occurs when reading from or writing to the durable store fails, or when
    /// a stored value does not match its key's schema.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme palette could not be parsed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the persistence worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A remote document answered with an error status.
    ///
    /// The display form leads with the status text since that is what the
    /// error screen shows to the user.
    #[error("{status_text} ({status}) while fetching {location}")]
    HttpStatus {
        /// Resolved location that was fetched.
        location: String,
        /// HTTP status code.
        status: u16,
        /// Human-readable reason phrase.
        status_text: String,
    },

    /// The request never produced an HTTP response.
    #[error("Failed to fetch {location}: {message}")]
    Transport {
        /// Resolved location that was fetched.
        location: String,
        /// Host-provided failure description.
        message: String,
    },

    /// A fetched document was not valid JSON of the expected shape.
    #[error("Malformed document at {location}: {reason}")]
    MalformedDocument {
        /// Resolved location that was fetched.
        location: String,
        /// Parser error message.
        reason: String,
    },

    /// A pack or index location could not be turned into a URL.
    #[error("Invalid location {location}: {reason}")]
    InvalidLocation {
        /// Location as written in the index or configuration.
        location: String,
        /// URL parser error message.
        reason: String,
    },

    /// An item was registered after its load cycle completed.
    #[error("Registry is frozen, cannot register item {id}")]
    RegistryFrozen {
        /// Identifier of the rejected item.
        id: String,
    },
}

/// A specialized `Result` type for sticker picker operations.
pub type Result<T> = std::result::Result<T, PickerError>;

/// Returns the canonical reason phrase for an HTTP status code.
///
/// The host's web-request facility only hands back the numeric status, while
/// the error screen shows the textual reason the way a browser would.
#[must_use]
pub fn status_text(status: u16) -> String {
    let text = match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        410 => "Gone",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => return format!("HTTP {status}"),
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_have_reason_phrases() {
        assert_eq!(status_text(500), "Internal Server Error");
        assert_eq!(status_text(404), "Not Found");
    }

    #[test]
    fn unknown_status_falls_back_to_code() {
        assert_eq!(status_text(418), "HTTP 418");
    }

    #[test]
    fn http_status_display_leads_with_reason() {
        let err = PickerError::HttpStatus {
            location: "https://example.org/index.json".into(),
            status: 503,
            status_text: status_text(503),
        };
        assert!(err.to_string().starts_with("Service Unavailable"));
    }
}
