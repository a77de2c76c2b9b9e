//! Error types for the image-editing toolbox.

/// Errors that can occur while validating or dispatching a generation request.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// API key missing or rejected by the service.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Rate limited by the service.
    #[error("rate limited, retry later")]
    RateLimited,

    /// Content was blocked by the service's safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Input rejected before dispatch (missing image, empty prompt, oversized
    /// upload, unknown tool, unsupported media type).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A generation is already in flight for this session.
    #[error("generation already in progress")]
    Busy,

    /// The service responded without any inline image part.
    #[error("no image generated")]
    NoImage,

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 image data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (e.g., saving a result image).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// Returns true if the error was raised before any network attempt,
    /// i.e. the request never reached the service.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Busy)
    }
}

/// Trims an upstream error body down to something fit for display.
///
/// Service error bodies can be multi-kilobyte JSON blobs with embedded
/// newlines; logs and per-form error messages only need the head.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    const MAX_LEN: usize = 300;
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let trimmed = flat.trim();
    if trimmed.len() <= MAX_LEN {
        return trimmed.to_string();
    }
    let mut cut = MAX_LEN;
    while !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &trimmed[..cut])
}

/// Result type alias for toolbox operations.
pub type Result<T> = std::result::Result<T, StudioError>;
