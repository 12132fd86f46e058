// --- File: crates/meetslot_common/src/error.rs ---
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The error type surfaced at the HTTP and CLI boundaries.
///
/// Crate-specific errors convert into this with `From` so handlers can use `?`.
#[derive(Error, Debug)]
pub enum MeetslotError {
    /// Invalid suggestion input (window, duration, business hours). Caller's fault.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Malformed booking payload or query parameter. Caller's fault.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Credential or token failure against the calendar provider.
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Calendar provider unreachable, timed out or rate limited. May be retried by the caller.
    #[error("Calendar service unavailable: {0}")]
    TransientNetworkError(String),

    /// The server itself is misconfigured (bad time zone, missing credentials path).
    #[error("Server configuration error: {0}")]
    ServerConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Stable machine-readable tag for each error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Validation,
    Auth,
    TransientNetwork,
    ServerConfig,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Validation => "validation",
            ErrorKind::Auth => "auth",
            ErrorKind::TransientNetwork => "transient_network",
            ErrorKind::ServerConfig => "server_config",
            ErrorKind::Internal => "internal",
        };
        f.write_str(s)
    }
}

impl MeetslotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeetslotError::ConfigurationError(_) => ErrorKind::Configuration,
            MeetslotError::ValidationError(_) => ErrorKind::Validation,
            MeetslotError::AuthError(_) => ErrorKind::Auth,
            MeetslotError::TransientNetworkError(_) => ErrorKind::TransientNetwork,
            MeetslotError::ServerConfigError(_) => ErrorKind::ServerConfig,
            MeetslotError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Whether the caller layer may retry with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MeetslotError::TransientNetworkError(_))
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for MeetslotError {
    fn status_code(&self) -> u16 {
        match self {
            MeetslotError::ConfigurationError(_) => 400,
            MeetslotError::ValidationError(_) => 400,
            MeetslotError::AuthError(_) => 502,
            MeetslotError::TransientNetworkError(_) => 503,
            MeetslotError::ServerConfigError(_) => 500,
            MeetslotError::InternalError(_) => 500,
        }
    }
}

impl From<std::io::Error> for MeetslotError {
    fn from(err: std::io::Error) -> Self {
        MeetslotError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn configuration_error<T: fmt::Display>(message: T) -> MeetslotError {
    MeetslotError::ConfigurationError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> MeetslotError {
    MeetslotError::ValidationError(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> MeetslotError {
    MeetslotError::AuthError(message.to_string())
}

pub fn transient_error<T: fmt::Display>(message: T) -> MeetslotError {
    MeetslotError::TransientNetworkError(message.to_string())
}

pub fn server_config_error<T: fmt::Display>(message: T) -> MeetslotError {
    MeetslotError::ServerConfigError(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> MeetslotError {
    MeetslotError::InternalError(message.to_string())
}
