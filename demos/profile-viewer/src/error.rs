//! Error types for the profile fetcher

use thiserror::Error;

/// Errors that can occur when fetching a profile
///
/// The display text is what the failure presentation shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No user with that login
    #[error("Not Found")]
    NotFound,

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - bad credentials
    #[error("Unauthorized - bad credentials")]
    Unauthorized,

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// HTTP request failed
    #[error("Request failed: {0}")]
    Request(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The request did not complete in time
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_plainly() {
        assert_eq!(FetchError::NotFound.to_string(), "Not Found");
    }

    #[test]
    fn api_error_includes_status() {
        let error = FetchError::Api {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(error.to_string(), "API error (status 502): Bad Gateway");
    }
}
