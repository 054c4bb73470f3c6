//! Error types for the WordPress REST client.
//!
//! # Design
//! Configuration problems, transport failures, API errors and decode errors
//! stay distinct so callers can tell a misconfigured client from a remote
//! refusal. Whenever the server answered, the envelope travels with the
//! error (see [`Error::response`]).

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::response::Response;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by client operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request never produced a response. The message holds a sanitized URL.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// The server answered outside the success range with a well-formed error body.
    #[error(transparent)]
    Api(Box<ApiError>),

    /// The server answered outside the success range and the body was not an error payload.
    #[error("{} {}: {} (unreadable error body: {source})", .response.method, .response.url, .response.status)]
    ErrorBody {
        response: Box<Response>,
        #[source]
        source: serde_json::Error,
    },

    #[error("decoding response body failed: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("encoding request body failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    #[error("writing response body failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("api discovery failed: {0}")]
    Discovery(String),

    /// The entity was built by hand or its client is gone, so it has no collection to talk to.
    #[error("{0} is not attached to a collection")]
    Detached(&'static str),
}

impl Error {
    /// The envelope of the response that caused this error, if the server answered.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Api(api) => Some(&api.response),
            Error::ErrorBody { response, .. } => Some(response),
            _ => None,
        }
    }

    /// The structured API error, if this is one.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }
}

/// Client construction failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base url must have a trailing slash, but {0:?} does not")]
    MissingTrailingSlash(String),

    #[error("base url must not contain /wp/v2: {0:?}")]
    ContainsApiMount(String),

    #[error("invalid utc offset {0:?}, expected +HH:MM")]
    InvalidUtcOffset(String),

    #[error("invalid path {path:?}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("building http transport failed: {0}")]
    Transport(String),

    #[error(transparent)]
    Load(#[from] Box<figment::Error>),
}

/// A timestamp in neither supported layout.
#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("invalid timestamp {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("timestamp {0:?} does not map to a single instant")]
    Ambiguous(String),

    #[error("timestamp is not valid utf-8")]
    NotUtf8,
}

/// Failure reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub timeout: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: true,
        }
    }
}

/// Error payload the API sends with non-success statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub data: ErrorData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorData {
    pub status: u16,
    pub params: HashMap<String, String>,
}

/// A structured API error together with the response that carried it.
#[derive(Debug, Error)]
#[error("{} {}: {} {}", .response.method, .response.url, .response.status, .body.message)]
pub struct ApiError {
    pub body: ErrorPayload,
    pub response: Response,
}

impl ApiError {
    pub fn code(&self) -> &str {
        &self.body.code
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }
}
