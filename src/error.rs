use thiserror::Error;

/// Coarse classification of vendor failures, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    RateLimit,
    Auth,
    Network,
    Vendor,
    Parse,
    Empty,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Vendor => write!(f, "VENDOR"),
            Self::Parse => write!(f, "PARSE"),
            Self::Empty => write!(f, "EMPTY"),
        }
    }
}

/// Errors raised by a completion client
///
/// These never leave `AiService`: every operation converts them into its
/// documented fallback value.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} rate limit exceeded: {body}")]
    RateLimited { provider: &'static str, body: String },

    #[error("{provider} rejected the credentials ({status}): {body}")]
    Auth {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} API error ({status}): {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {provider} response: {message}")]
    MalformedResponse {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned no text content")]
    EmptyResponse { provider: &'static str },

    #[error("{provider} blocked the response ({reason})")]
    Blocked {
        provider: &'static str,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ProviderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Auth { .. } => ErrorCategory::Auth,
            Self::Status { .. } | Self::Blocked { .. } => ErrorCategory::Vendor,
            Self::Transport { .. } | Self::Client(_) => ErrorCategory::Network,
            Self::MalformedResponse { .. } => ErrorCategory::Parse,
            Self::EmptyResponse { .. } => ErrorCategory::Empty,
        }
    }

    /// Classify a non-success HTTP status
    pub fn from_status(provider: &'static str, status: u16, body: String) -> Self {
        match status {
            429 => Self::RateLimited { provider, body },
            401 | 403 => Self::Auth {
                provider,
                status,
                body,
            },
            _ => Self::Status {
                provider,
                status,
                body,
            },
        }
    }
}

/// Errors raised when bridging async work into a synchronous caller
#[derive(Debug, Error)]
pub enum SyncBridgeError {
    #[error("cannot block inside a current-thread runtime; await the future instead")]
    CurrentThreadRuntime,

    #[error("failed to build a runtime: {0}")]
    Build(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        let err = ProviderError::from_status("claude", 429, "slow down".to_string());
        assert_eq!(err.category(), ErrorCategory::RateLimit);

        let err = ProviderError::from_status("gemini", 403, String::new());
        assert_eq!(err.category(), ErrorCategory::Auth);

        let err = ProviderError::from_status("claude", 529, "overloaded".to_string());
        assert_eq!(err.category(), ErrorCategory::Vendor);
        assert_eq!(err.to_string(), "claude API error (529): overloaded");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Parse.to_string(), "PARSE");
    }
}
