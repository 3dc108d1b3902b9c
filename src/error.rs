//! Error types for the AutoML client.
//!
//! Provides [`Error`], the single error enum returned by every fallible
//! operation in this crate, and [`ErrorPolicy`], which decides whether an
//! error is reported to the operator before it is handed back to the caller.
//!
//! # Examples
//!
//! ```
//! use automl::{Error, ServerError};
//!
//! let err = Error::from_status(404, Some("source abc not found".to_string()));
//! assert!(matches!(err, Error::Server(ServerError::NotFound { .. })));
//! assert!(err.to_string().contains("source abc not found"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or completed.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The request exceeded the configured per-request timeout.
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// The service answered with a non-2xx status.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// A payload did not match the expected shape or enumeration.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// A payload decoded fine but contradicts what the caller asked for.
    #[error("Consistency error: {message}")]
    Consistency { message: String },

    /// The push channel could not be opened, failed, or closed early.
    #[error("Channel error: {message}")]
    Channel { message: String },

    /// A bounded watch gave up before the task finished.
    #[error("Task did not finish within {waited:?}")]
    WatchTimeout { waited: Duration },

    /// Local configuration is missing or malformed.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Local file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-2xx responses, specialised by status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServerError {
    /// HTTP 401.
    #[error("Unauthorized (401)")]
    Unauthorized,

    /// HTTP 404, with the server-provided message when there is one.
    #[error("Not found (404){}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    NotFound { message: Option<String> },

    /// HTTP 405.
    #[error("Method not allowed (405)")]
    MethodNotAllowed,

    /// Any other non-2xx status.
    #[error("Server error ({status}): {message}")]
    Other { status: u16, message: String },
}

impl ServerError {
    /// The HTTP status this error was built from.
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::NotFound { .. } => 404,
            Self::MethodNotAllowed => 405,
            Self::Other { status, .. } => *status,
        }
    }
}

impl Error {
    /// Build the [`Error::Server`] variant matching an HTTP status code.
    ///
    /// `message` is the server-provided explanation, if any.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let server = match status {
            401 => ServerError::Unauthorized,
            404 => ServerError::NotFound { message },
            405 => ServerError::MethodNotAllowed,
            _ => ServerError::Other {
                status,
                message: message.unwrap_or_default(),
            },
        };
        Self::Server(server)
    }

    /// Classify a [`reqwest::Error`] into a transport error.
    pub fn classify_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub(crate) fn consistency(message: impl Into<String>) -> Self {
        Self::Consistency {
            message: message.into(),
        }
    }

    pub(crate) fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Short operator-facing hint for resolving this error, when one exists.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Server(ServerError::Unauthorized) => Some(
                "Check that the token of the active profile is valid, or rotate it with `automl config set-profile`.",
            ),
            Self::Server(ServerError::NotFound { .. }) => {
                Some("Check the identifier; the entity may have been deleted.")
            },
            Self::Server(ServerError::MethodNotAllowed) => {
                Some("The service does not support this operation on this entity.")
            },
            Self::Timeout { .. } => {
                Some("Raise the request timeout with `automl config set timeout <seconds>`.")
            },
            Self::Decode { .. } => {
                Some("The service answered with an unexpected payload; the client may be outdated.")
            },
            Self::Config { .. } => {
                Some("Create a profile with `automl config set-profile <name> ...`.")
            },
            Self::Channel { .. } => Some("Check the websocket_url of the active profile."),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config {
            message: format!("YAML error: {err}"),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Config {
            message: format!("invalid URL: {err}"),
        }
    }
}

/// What happens to an error right before it leaves client control.
///
/// Either way the error is returned to the caller; `Print` additionally
/// writes the message and resolution hint to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Print a formatted message and hint, then return the error.
    #[default]
    Print,
    /// Return the error without printing.
    Silent,
}

impl ErrorPolicy {
    /// Apply the policy to `err` and hand it back.
    pub fn surface(self, err: Error) -> Error {
        if self == Self::Print {
            eprintln!("{}", render_error(&err));
        }
        err
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Print => write!(f, "print"),
            Self::Silent => write!(f, "silent"),
        }
    }
}

impl std::str::FromStr for ErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "print" => Ok(Self::Print),
            "silent" => Ok(Self::Silent),
            other => Err(Error::config(format!(
                "unknown error policy '{other}' (expected print or silent)"
            ))),
        }
    }
}

/// Format an error and its hint the way [`ErrorPolicy::Print`] shows it.
pub fn render_error(err: &Error) -> String {
    match err.hint() {
        Some(hint) => format!("error: {err}\n  hint: {hint}"),
        None => format!("error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_specialisation() {
        assert!(matches!(
            Error::from_status(401, None),
            Error::Server(ServerError::Unauthorized)
        ));
        assert!(matches!(
            Error::from_status(405, Some("nope".into())),
            Error::Server(ServerError::MethodNotAllowed)
        ));
        match Error::from_status(503, Some("maintenance".into())) {
            Error::Server(ServerError::Other { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::from_status(404, Some("dataset d1 not found".into()));
        assert_eq!(err.to_string(), "Not found (404): dataset d1 not found");

        let err = Error::from_status(404, None);
        assert_eq!(err.to_string(), "Not found (404)");
    }

    #[test]
    fn test_server_error_status_roundtrip() {
        for status in [401u16, 404, 405, 500, 502] {
            match Error::from_status(status, None) {
                Error::Server(server) => assert_eq!(server.status(), status),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_hints() {
        assert!(Error::from_status(401, None)
            .hint()
            .is_some_and(|h| h.contains("token")));
        assert!(Error::Io(std::io::Error::other("x")).hint().is_none());
    }

    #[test]
    fn test_error_policy_always_returns_error() {
        let err = ErrorPolicy::Silent.surface(Error::decode("bad status"));
        assert!(matches!(err, Error::Decode { .. }));

        let err = ErrorPolicy::Print.surface(Error::from_status(401, None));
        assert!(matches!(err, Error::Server(ServerError::Unauthorized)));
    }

    #[test]
    fn test_error_policy_parse() {
        assert_eq!("print".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Print);
        assert_eq!("silent".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Silent);
        assert!("loud".parse::<ErrorPolicy>().is_err());
    }

    #[test]
    fn test_render_error_includes_hint() {
        let text = render_error(&Error::from_status(401, None));
        assert!(text.starts_with("error: Unauthorized (401)"));
        assert!(text.contains("hint:"));
    }
}
