use thiserror::Error;

/// Coarse classification of a [`MelodyScopeError`].
///
/// Every failure the crate produces is a single error type; callers that need to
/// branch on the category (for example to tell a typo in user input apart from an
/// outage) match on this instead of on the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Transport,
    Http,
    ApiEnvelope,
    Parse,
    Storage,
}

/// Error types for Melody Scope operations.
///
/// This enum covers everything that can go wrong while talking to the Last.fm
/// JSON API or while persisting favourites.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use melody_scope::{ClientConfig, MelodyScopeApi, MelodyScopeClient, MelodyScopeError};
///
/// #[tokio::main]
/// async fn main() {
///     let http_client = http_client::native::NativeClient::new();
///     let client = MelodyScopeClient::new(Box::new(http_client), ClientConfig::from_env());
///
///     match client.fetch_artist_top_albums("The Beatles").await {
///         Ok(albums) => println!("{} albums", albums.len()),
///         Err(MelodyScopeError::Http { status }) => eprintln!("Last.fm answered {status}"),
///         Err(MelodyScopeError::Api { message, .. }) => eprintln!("Last.fm refused: {message}"),
///         Err(e) => eprintln!("Other error: {e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum MelodyScopeError {
    /// The client is missing required configuration, usually the API key.
    ///
    /// Returned before any network call is attempted.
    #[error("{0}")]
    Config(String),

    /// A required argument was blank.
    ///
    /// Returned before any network call is attempted.
    #[error("{0}")]
    Validation(String),

    /// Connection failures, DNS errors and request timeouts.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server answered with a non-success HTTP status.
    #[error("Last.fm request failed with status {status}")]
    Http { status: u16 },

    /// The server answered 2xx but the decoded body carries an `error` field.
    ///
    /// Last.fm reports things like invalid API keys and unknown artists this way.
    #[error("Last.fm API error: {message}")]
    Api {
        /// Numeric Last.fm error code, if the body had one
        code: Option<i64>,
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Persisted state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// File system I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MelodyScopeError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Http { .. } => ErrorKind::Http,
            Self::Api { .. } => ErrorKind::ApiEnvelope,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Storage(_) | Self::Io(_) => ErrorKind::Storage,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to a user as-is.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "An unexpected error occurred. Please try again later.".to_string()
        } else {
            message
        }
    }
}

impl From<serde_json::Error> for MelodyScopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_status() {
        let err = MelodyScopeError::Http { status: 503 };
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.to_string(), "Last.fm request failed with status 503");
    }

    #[test]
    fn test_other_errors_have_no_status() {
        let errors = [
            MelodyScopeError::Config("Last.fm API key is not configured".to_string()),
            MelodyScopeError::Validation("Artist name cannot be empty".to_string()),
            MelodyScopeError::transport("timed out"),
            MelodyScopeError::Api {
                code: Some(10),
                message: "Invalid API key".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(err.status_code(), None, "{err:?}");
        }
    }

    #[test]
    fn test_transport_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = MelodyScopeError::transport_with_source("connection failed", io);
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_api_error_message() {
        let err = MelodyScopeError::Api {
            code: Some(6),
            message: "Artist not found".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ApiEnvelope);
        assert_eq!(err.user_message(), "Last.fm API error: Artist not found");
    }

    #[test]
    fn test_blank_message_falls_back() {
        let err = MelodyScopeError::Validation(String::new());
        assert_eq!(
            err.user_message(),
            "An unexpected error occurred. Please try again later."
        );
    }
}
