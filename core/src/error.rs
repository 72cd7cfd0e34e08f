//! Error types for request planning, transport and response decoding.
//!
//! # Design
//! Nothing is retried internally; every failure surfaces to the caller as one
//! of these variants. A non-2xx status is not an error by itself. Callers that
//! want it as one opt in through `ResponseHandle::error_for_status`.

use std::fmt;

/// Errors returned by request building, `send`, and response reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Connection, DNS or TLS failure reported by the transport.
    Transport(String),

    /// The server answered with a non-2xx status and the caller asked for it
    /// to be treated as an error.
    HttpStatus { status: u16 },

    /// Response text is not valid UTF-8.
    Encoding(String),

    /// The request spec cannot be turned into an HTTP request.
    InvalidRequest(String),

    /// The single-use response body was already read.
    BodyConsumed,

    /// Reading the response body stream failed part way.
    Io(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Transport(msg) => write!(f, "transport failed: {msg}"),
            RequestError::HttpStatus { status } => write!(f, "HTTP status {status}"),
            RequestError::Encoding(msg) => write!(f, "encoding failed: {msg}"),
            RequestError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            RequestError::BodyConsumed => write!(f, "response body already consumed"),
            RequestError::Io(msg) => write!(f, "reading response body failed: {msg}"),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<std::io::Error> for RequestError {
    fn from(e: std::io::Error) -> Self {
        RequestError::Io(e.to_string())
    }
}

impl From<std::string::FromUtf8Error> for RequestError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        RequestError::Encoding(e.to_string())
    }
}
