//! Error types for the Kayako client.
//!
//! This module defines `KayakoError`, the unified error type returned by
//! every public operation, and `TransportError`, the network-level failure
//! reported by a [`Transport`](crate::transport::Transport).
//!
//! # Classification
//!
//! Callers are expected to handle `Client` and `Server` distinctly:
//! a client error means the remote system rejected the request and the
//! caller can fix it, a server error means the remote system failed or
//! could not be reached at all.
//!
//! # Security
//!
//! Error messages never carry the secret key. Use `sanitize_message()` when
//! building messages from text the remote side or the HTTP stack produced.

use thiserror::Error;

use crate::xml::XmlDiagnostic;

/// Maximum number of bytes of a response body kept in an error value.
pub const MAX_ERROR_BODY_LEN: usize = 500;

/// A network-level failure: DNS, refused connection, timeout, TLS, or a
/// body that could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    /// The message of the underlying HTTP client error.
    pub message: String,
    /// Whether the failure was a timeout.
    pub timeout: bool,
}

impl TransportError {
    /// Creates a transport error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: false,
        }
    }

    /// Creates a transport error that represents a timeout.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: true,
        }
    }

    /// Returns true if the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.timeout
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else {
            Self::new(err.to_string())
        }
    }
}

/// Unified error type for all Kayako operations.
#[derive(Error, Debug)]
pub enum KayakoError {
    /// Configuration error - missing or invalid environment variables.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Network-level failure before a response was received.
    ///
    /// Services never return this variant; they surface it as `Server`.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The remote system rejected the request (HTTP 4xx).
    #[error("Kayako responded with error ({status} - {reason}).\n{body}")]
    Client {
        /// The HTTP status code.
        status: u16,
        /// The reason phrase of the status line.
        reason: String,
        /// The response body, truncated.
        body: String,
    },

    /// The remote system failed (HTTP 5xx) or could not be reached.
    #[error("{message}")]
    Server {
        /// Full diagnostic message.
        message: String,
        /// The HTTP status code, absent when the remote was unreachable.
        status: Option<u16>,
    },

    /// The response body was not usable XML.
    #[error("XML parse error: {message}")]
    Parse {
        /// Summary of the failure.
        message: String,
        /// Well-formedness problems collected while scanning the document.
        diagnostics: Vec<XmlDiagnostic>,
    },

    /// The registry has no service with the requested name.
    #[error("The service \"{0}\" is not available.")]
    UnknownService(String),

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),
}

impl KayakoError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        KayakoError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        KayakoError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        KayakoError::Validation(message.into())
    }

    /// Creates a parse error without diagnostics.
    pub fn parse(message: impl Into<String>) -> Self {
        KayakoError::Parse {
            message: message.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Creates a server error for a remote that could not be reached.
    pub fn unreachable(message: impl Into<String>) -> Self {
        KayakoError::Server {
            message: message.into(),
            status: None,
        }
    }

    /// Returns true for errors the caller can fix by changing the request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, KayakoError::Client { .. })
    }

    /// Returns true for errors caused by the remote system or the network.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, KayakoError::Server { .. })
    }

    /// Returns the HTTP status code carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            KayakoError::Client { status, .. } => Some(*status),
            KayakoError::Server { status, .. } => *status,
            _ => None,
        }
    }

    /// Replaces every occurrence of each secret with `[REDACTED]`.
    ///
    /// Empty secrets are skipped so that they don't match everywhere.
    #[must_use]
    pub fn sanitize_message(message: &str, secrets: &[&str]) -> String {
        secrets
            .iter()
            .filter(|secret| !secret.is_empty())
            .fold(message.to_string(), |acc, secret| {
                acc.replace(secret, "[REDACTED]")
            })
    }

    /// Truncates a response body to [`MAX_ERROR_BODY_LEN`] bytes, respecting
    /// UTF-8 boundaries.
    #[must_use]
    pub fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LEN {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_error() {
        let err = KayakoError::missing_env("KAYAKO_SECRET_KEY");
        assert!(err.to_string().contains("KAYAKO_SECRET_KEY"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_client_error_message_shape() {
        let err = KayakoError::Client {
            status: 404,
            reason: "Not Found".to_string(),
            body: "<error>no ticket</error>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Kayako responded with error (404 - Not Found).\n<error>no ticket</error>"
        );
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_unreachable_is_server_error_without_status() {
        let err = KayakoError::unreachable("connection refused");
        assert!(err.is_server_error());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_unknown_service_message() {
        let err = KayakoError::UnknownService("bogus".to_string());
        assert_eq!(err.to_string(), "The service \"bogus\" is not available.");
    }

    #[test]
    fn test_transport_error_from_timeout_flag() {
        let err = TransportError::timeout("operation timed out");
        assert!(err.is_timeout());
        assert!(!TransportError::new("refused").is_timeout());
    }

    #[test]
    fn test_sanitize_message_removes_all_secrets() {
        let sanitized =
            KayakoError::sanitize_message("key=abc secret=s3cr3t", &["abc", "s3cr3t"]);
        assert_eq!(sanitized, "key=[REDACTED] secret=[REDACTED]");
    }

    #[test]
    fn test_sanitize_message_skips_empty_secret() {
        let sanitized = KayakoError::sanitize_message("plain text", &[""]);
        assert_eq!(sanitized, "plain text");
    }

    #[test]
    fn test_truncate_body_keeps_short_bodies() {
        assert_eq!(KayakoError::truncate_body("short"), "short");
    }

    #[test]
    fn test_truncate_body_respects_char_boundary() {
        let body = "é".repeat(MAX_ERROR_BODY_LEN);
        let truncated = KayakoError::truncate_body(&body);
        assert!(truncated.ends_with("...[truncated]"));
        assert!(truncated.len() <= MAX_ERROR_BODY_LEN + "...[truncated]".len());
    }
}
