use reqwest::StatusCode;
use serde_json::Value;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a call into the API can produce.
///
/// None of these are retried internally; the first error encountered is returned
/// and the caller decides what to do next.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP request never produced a response (network, DNS, TLS, timeout).
    #[error("could not reach the API: {0}")]
    Transport(#[from] reqwest::Error),

    /// `POST /login` answered with a non-2xx status.
    #[error("login failed (HTTP {status})")]
    Auth { status: u16 },

    /// An authenticated call answered with status >= 400.
    #[error("API request failed: HTTP {status} :: {message} {detail}")]
    Api {
        status: u16,
        message: String,
        detail: String,
    },

    /// The body was not JSON, or not the JSON shape the call expects.
    #[error("failed to decode API response: {0}")]
    Decode(String),

    /// A required field was missing or had the wrong JSON type, or an update
    /// parameter could not be converted to the field's type.
    #[error("invalid {record} field `{field}`: expected {expected}")]
    Validation {
        record: &'static str,
        field: String,
        expected: &'static str,
    },

    /// A purge reply decoded fine but its `status` was not `"ok"`.
    #[error("purge of {target} was not ok; reply was {body}")]
    Purge { target: String, body: Value },

    /// Session configuration could not be resolved.
    #[error("{0}")]
    Config(String),
}

impl Error {
    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status } | Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the API reported that the addressed object does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    pub(crate) fn validation(record: &'static str, field: &str, expected: &'static str) -> Self {
        Error::Validation {
            record,
            field: field.to_string(),
            expected,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub(crate) msg: Option<String>,
    #[serde(default)]
    pub(crate) detail: Option<String>,
}

/// Builds the error for a response with status >= 400.
///
/// A body that is not a JSON object still yields an `Api` error; its raw text is
/// kept as the detail.
pub(crate) fn api_error(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(e) => Error::Api {
            status: status.as_u16(),
            message: e.msg.unwrap_or_default(),
            detail: e.detail.unwrap_or_default(),
        },
        Err(_) => Error::Api {
            status: status.as_u16(),
            message: String::new(),
            detail: body.trim().to_string(),
        },
    }
}
