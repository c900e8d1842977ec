use thiserror::Error;

/// Errors raised while answering a single advisory request.
///
/// None of these escape the pipeline: every variant is turned into a
/// user-facing message at the request boundary.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The provider does not know the requested place. Triggers the
    /// approximate resolver.
    #[error("Location not found: {0}")]
    NotFound(String),

    /// The provider answered, but not with something usable.
    #[error("Upstream provider error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid weather reading: {0}")]
    InvalidReading(String),

    #[error("Geocoding failed: {0}")]
    Geocode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AdvisorError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            AdvisorError::Timeout => true,
            AdvisorError::Network(e) => e.is_timeout() || e.is_connect(),
            AdvisorError::Upstream { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AdvisorError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: u16) -> AdvisorError {
        AdvisorError::Upstream { status, message: String::new() }
    }

    #[test]
    fn server_errors_and_rate_limits_are_transient() {
        assert!(upstream(500).is_transient());
        assert!(upstream(503).is_transient());
        assert!(upstream(429).is_transient());
        assert!(upstream(408).is_transient());
        assert!(AdvisorError::Timeout.is_transient());
    }

    #[test]
    fn client_errors_are_permanent() {
        assert!(!upstream(400).is_transient());
        assert!(!upstream(401).is_transient());
        assert!(!AdvisorError::NotFound("Atlantis".into()).is_transient());
        assert!(!AdvisorError::InvalidReading("temp".into()).is_transient());
    }

    #[test]
    fn not_found_is_recognised() {
        assert!(AdvisorError::NotFound("x".into()).is_not_found());
        assert!(!AdvisorError::Timeout.is_not_found());
    }
}
