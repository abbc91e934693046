use thiserror::Error;

/// Classified errors from the remote catalog.
///
/// Every failure the UI can see is one of these classes; raw transport
/// errors never cross this boundary. [`user_message`] is the single
/// human-readable string per class.
///
/// [`user_message`]: ApiError::user_message
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request (status {0})")]
    InvalidRequest(u16),

    #[error("not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,

    #[error("server error (status {0})")]
    ServerError(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Classify an HTTP status code from the catalog.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            429 => Self::RateLimited,
            400..=499 => Self::InvalidRequest(status),
            500..=599 => Self::ServerError(status),
            _ => Self::Unknown(format!("unexpected status {status}")),
        }
    }

    /// The message shown to the user for this class. Technical detail
    /// stays in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "Invalid request. Please check your search parameters.",
            Self::NotFound => "Anime not found.",
            Self::RateLimited => "Too many requests. Please wait a moment.",
            Self::ServerError(_) => "Server error. Please try again later.",
            Self::Network(_) => "Network error. Please check your connection.",
            Self::Unknown(_) => "An unexpected error occurred. Please try again later.",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() || e.is_request() {
            Self::Network(e.to_string())
        } else {
            Self::Unknown(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(ApiError::from_status(400), ApiError::InvalidRequest(400)));
        assert!(matches!(ApiError::from_status(422), ApiError::InvalidRequest(422)));
        assert!(matches!(ApiError::from_status(404), ApiError::NotFound));
        assert!(matches!(ApiError::from_status(429), ApiError::RateLimited));
        assert!(matches!(ApiError::from_status(500), ApiError::ServerError(500)));
        assert!(matches!(ApiError::from_status(503), ApiError::ServerError(503)));
        assert!(matches!(ApiError::from_status(302), ApiError::Unknown(_)));
    }

    #[test]
    fn test_user_messages_are_not_transport_errors() {
        let classes = [
            ApiError::InvalidRequest(400),
            ApiError::NotFound,
            ApiError::RateLimited,
            ApiError::ServerError(502),
            ApiError::Network("connection refused".into()),
            ApiError::Unknown("boom".into()),
        ];
        for class in classes {
            let msg = class.user_message();
            assert!(!msg.is_empty());
            // No status codes or internals leak into the user string.
            assert!(!msg.contains("status"));
            assert!(!msg.contains("boom"));
        }
    }
}
