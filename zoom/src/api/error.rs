use thiserror::Error;

/// Zoom application error code for a missing or already-deleted entity
pub const CODE_NOT_FOUND: i64 = 300;
/// Zoom application error code some endpoints use for an absent sub-entity
pub const CODE_ABSENT: i64 = 404;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error(
        "API returned error (HTTP {status}{}): {message}",
        .code.map(|c| format!(", code {}", c)).unwrap_or_default()
    )]
    ApiError {
        status: u16,
        /// Application error code from the `{"code", "message"}` body
        code: Option<i64>,
        message: String,
    },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Failed to obtain OAuth access token: {0}")]
    TokenError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Too many requests, rate limited")]
    RateLimited,

    #[error("Service unavailable, retry later")]
    ServiceUnavailable,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ApiError { status, .. } => Some(*status),
            ApiError::AuthError => Some(401),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::ApiError { code, .. } => *code,
            _ => None,
        }
    }

    /// HTTP 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// HTTP 400 with any application code
    pub fn is_bad_request(&self) -> bool {
        self.status() == Some(400)
    }

    /// HTTP 400 carrying the given application code
    pub fn is_bad_request_with(&self, code: i64) -> bool {
        self.is_bad_request() && self.code() == Some(code)
    }

    /// The parent entity is gone; a read should drop the resource from state
    pub fn is_deleted_on_read(&self) -> bool {
        self.is_bad_request_with(CODE_NOT_FOUND)
    }
}
