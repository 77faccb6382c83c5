//! Error types for the Suitudy SDK.
//!
//! This module provides a unified error type [`SuitudyError`] covering
//! transaction construction, ledger queries and transaction execution.

use crate::execution::ExecutionPath;
use std::fmt;
use thiserror::Error;

/// A specialized Result type for Suitudy SDK operations.
pub type SuitudyResult<T> = Result<T, SuitudyError>;

/// HTTP status codes treated as transient by default.
pub const RETRYABLE_STATUS_CODES: &[u16] = &[408, 429, 500, 502, 503, 504];

/// The main error type for the Suitudy SDK.
#[derive(Error, Debug)]
pub enum SuitudyError {
    /// Error occurred during HTTP communication
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error occurred during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error occurred during BCS serialization
    #[error("BCS error: {0}")]
    Bcs(String),

    /// Error occurred during URL parsing
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// No coin holdings were supplied for a payment.
    #[error("Insufficient funds: no {coin_type} coins available")]
    InsufficientFunds {
        /// Human-readable name of the coin that was missing
        coin_type: String,
    },

    /// A caller-supplied value was missing or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The network, the signer or the ledger program rejected a submission.
    #[error("Execution failed via {path}: {cause:#}")]
    ExecutionFailed {
        /// The signing path that was attempted
        path: ExecutionPath,
        /// The underlying failure, passed through unchanged
        #[source]
        cause: anyhow::Error,
    },

    /// The JSON-RPC endpoint returned an error object
    #[error("RPC error ({code}): {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the endpoint
        message: String,
    },

    /// The endpoint answered with a non-success HTTP status
    #[error("API error ({status_code}): {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Response body or error message
        message: String,
    },

    /// No account is connected
    #[error("No account connected")]
    NotConnected,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal SDK error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Maximum length for error messages to prevent excessive memory usage in logs.
const MAX_ERROR_MESSAGE_LENGTH: usize = 1000;

/// Patterns that might indicate sensitive information in error messages.
const SENSITIVE_PATTERNS: &[&str] = &[
    "private_key",
    "secret",
    "password",
    "mnemonic",
    "seed",
    "bearer",
    "authorization",
    "jwt",
];

impl SuitudyError {
    /// Creates a new BCS error
    pub fn bcs<E: fmt::Display>(err: E) -> Self {
        Self::Bcs(err.to_string())
    }

    /// Creates a new invalid-input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a new API error from response details
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Wraps a failure from one of the execution paths.
    pub fn execution_failed(path: ExecutionPath, cause: impl Into<anyhow::Error>) -> Self {
        Self::ExecutionFailed {
            path,
            cause: cause.into(),
        }
    }

    /// Returns true if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Api {
                    status_code: 404,
                    ..
                }
        )
    }

    /// Returns true if this is a transient error that might succeed on retry.
    ///
    /// Status codes are checked against [`RETRYABLE_STATUS_CODES`];
    /// [`RetryConfig`](crate::retry::RetryConfig) can override that list.
    /// Execution failures are never reported as retryable: a transaction that
    /// consumed coin objects has to be rebuilt before it can be sent again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status_code, .. } => RETRYABLE_STATUS_CODES.contains(status_code),
            _ => false,
        }
    }

    /// Returns a sanitized version of the error message safe for logging.
    ///
    /// Control characters are stripped, long messages are truncated and
    /// messages that look like they carry credentials are redacted.
    pub fn sanitized_message(&self) -> String {
        Self::sanitize_string(&self.to_string())
    }

    fn sanitize_string(s: &str) -> String {
        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect();

        let lower = cleaned.to_lowercase();
        for pattern in SENSITIVE_PATTERNS {
            if lower.contains(pattern) {
                return format!("[REDACTED: message contained sensitive pattern '{pattern}']");
            }
        }

        if cleaned.len() > MAX_ERROR_MESSAGE_LENGTH {
            let mut end = MAX_ERROR_MESSAGE_LENGTH;
            while !cleaned.is_char_boundary(end) {
                end -= 1;
            }
            format!(
                "{}... [truncated, total length: {}]",
                &cleaned[..end],
                cleaned.len()
            )
        } else {
            cleaned
        }
    }

    /// Returns the error message suitable for display to end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Http(_) => "Network error occurred",
            Self::Json(_) => "Failed to process response",
            Self::Bcs(_) => "Failed to encode transaction",
            Self::Url(_) => "Invalid URL",
            Self::InsufficientFunds { .. } => "You don't have any SUITUDY tokens",
            Self::InvalidInput(_) => "Please check the values you entered",
            Self::ExecutionFailed { .. } => "Transaction failed",
            Self::NotFound(_)
            | Self::Api {
                status_code: 404, ..
            } => "Resource not found",
            Self::Api {
                status_code: 429, ..
            } => "Rate limit exceeded",
            Self::Api { status_code, .. } if *status_code >= 500 => "Server error",
            Self::Api { .. } | Self::Rpc { .. } => "Network request failed",
            Self::NotConnected => "Please connect your wallet first",
            Self::Config(_) => "Configuration error",
            Self::Internal(_) => "Internal error",
        }
    }
}
