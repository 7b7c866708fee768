use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// What we show the user when the server didn't tell us anything useful.
pub const FALLBACK_MESSAGE: &str = "Login failed. Try again.";

/// Errors that can happen while logging in
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't parse a URL, for example if the base URL was invalid.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// We couldn't talk to the server at all, or it sent back a success
    /// response we couldn't make sense of.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server turned us down. It may or may not have said why.
    #[error("server rejected the request with {status}")]
    Rejected {
        /// The status the server responded with
        status: StatusCode,

        /// The `message` field of the response body, if it was a non-empty
        /// string.
        message: Option<String>,
    },
}

impl Error {
    /// The one line we show in the UI for this error. All kinds of failure
    /// end up here: the server's own message if it sent one, the fallback
    /// otherwise.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => message,
            _ => FALLBACK_MESSAGE,
        }
    }
}

/// The shape of an error response. Every part of it is optional: the server
/// may send no body, a body that isn't JSON, or a `message` that isn't a
/// string.
#[derive(Debug, Deserialize)]
pub struct ErrorResp {
    /// Human-readable explanation of what went wrong
    #[serde(default)]
    pub message: Option<Value>,
}

impl ErrorResp {
    /// Pull a displayable message out of a raw response body.
    pub fn message_from_body(body: &[u8]) -> Option<String> {
        let resp: Self = serde_json::from_slice(body).ok()?;

        match resp.message? {
            Value::String(message) if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}
