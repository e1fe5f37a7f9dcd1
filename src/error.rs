//! Error types for the NLP Cloud client.
//!
//! Every failure a call can produce is a variant of [`NlpCloudError`]. HTTP
//! statuses documented by the API are classified through a constant table
//! into an [`ApiErrorKind`]; anything else becomes
//! [`NlpCloudError::UnexpectedStatus`] with the raw body attached.

use crate::transport::TransportError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Semantic meaning of an error status returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 400: the request was malformed.
    BadRequest,
    /// 401: the token was rejected.
    Unauthorized,
    /// 402: the plan or billing state does not allow the call.
    PaymentRequired,
    /// 403: the plan does not grant access to this model or endpoint.
    Forbidden,
    /// 404: unknown model or endpoint.
    NotFound,
    /// 405: wrong HTTP method for the endpoint.
    MethodNotAllowed,
    /// 406: the requested response format is not supported.
    NotAcceptable,
    /// 413: the input exceeds the endpoint limit.
    PayloadTooLarge,
    /// 422: malformed JSON or missing content type.
    UnprocessableEntity,
    /// 429: rate limited.
    TooManyRequests,
    /// 500: server fault.
    InternalServerError,
    /// 502: the upstream model could not be reached.
    BadGateway,
    /// 503: the model is temporarily down.
    ServiceUnavailable,
    /// 504: the model is overloaded.
    GatewayTimeout,
}

const STATUS_TABLE: [(u16, ApiErrorKind); 14] = [
    (400, ApiErrorKind::BadRequest),
    (401, ApiErrorKind::Unauthorized),
    (402, ApiErrorKind::PaymentRequired),
    (403, ApiErrorKind::Forbidden),
    (404, ApiErrorKind::NotFound),
    (405, ApiErrorKind::MethodNotAllowed),
    (406, ApiErrorKind::NotAcceptable),
    (413, ApiErrorKind::PayloadTooLarge),
    (422, ApiErrorKind::UnprocessableEntity),
    (429, ApiErrorKind::TooManyRequests),
    (500, ApiErrorKind::InternalServerError),
    (502, ApiErrorKind::BadGateway),
    (503, ApiErrorKind::ServiceUnavailable),
    (504, ApiErrorKind::GatewayTimeout),
];

impl ApiErrorKind {
    /// Look up the kind for a status code, if the API documents it.
    pub fn from_status(status: u16) -> Option<Self> {
        STATUS_TABLE
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, kind)| *kind)
    }

    /// The status code this kind is mapped from.
    pub fn status(self) -> u16 {
        STATUS_TABLE
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or(0, |(code, _)| *code)
    }

    /// Whether the condition is usually temporary.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::TooManyRequests
                | Self::BadGateway
                | Self::ServiceUnavailable
                | Self::GatewayTimeout
        )
    }

    fn description(self) -> &'static str {
        match self {
            Self::BadRequest => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::PaymentRequired => "payment required",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::MethodNotAllowed => "method not allowed",
            Self::NotAcceptable => "not acceptable",
            Self::PayloadTooLarge => "payload too large",
            Self::UnprocessableEntity => "unprocessable entity",
            Self::TooManyRequests => "too many requests",
            Self::InternalServerError => "internal server error",
            Self::BadGateway => "bad gateway",
            Self::ServiceUnavailable => "service unavailable",
            Self::GatewayTimeout => "gateway timeout",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Errors that can occur while talking to the API.
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum NlpCloudError {
    /// The client was built without a transport.
    #[error("client is not configured: no HTTP transport was supplied")]
    NotConfigured,

    /// The request never produced a response, or its body could not be read.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The call was cancelled through its cancellation token.
    #[error("request was cancelled")]
    Cancelled,

    /// The per-call deadline elapsed.
    #[error("request timed out after {after:?}")]
    TimedOut {
        /// The deadline that elapsed.
        after: Duration,
    },

    /// The parameters could not be encoded as a JSON body.
    #[error("failed to encode request parameters: {0}")]
    RequestEncode(#[source] serde_json::Error),

    /// The API answered with a documented error status.
    #[error("API error {status} ({kind}): {body}")]
    Api {
        /// Classified meaning of the status.
        kind: ApiErrorKind,
        /// Raw HTTP status.
        status: u16,
        /// Response body, usually a `{"detail": ...}` document.
        body: String,
        /// Delay suggested by a `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// The API answered with a status outside the documented set.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// Raw HTTP status.
        status: u16,
        /// Response body content.
        body: String,
    },

    /// A success response carried a body that did not decode.
    #[error("failed to parse API response: {source}")]
    ResponseParse {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// The body that failed to decode.
        body: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read a configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ConfigFileRead {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for [`crate::ClientConfig`].
    #[error("failed to parse config file: {0}")]
    ConfigParse(#[source] serde_json::Error),
}

impl NlpCloudError {
    /// Build the error for a non-success response.
    pub(crate) fn from_response(status: u16, headers: &HeaderMap, body: &[u8]) -> Self {
        let body = String::from_utf8_lossy(body).into_owned();
        match ApiErrorKind::from_status(status) {
            Some(kind) => Self::Api {
                kind,
                status,
                body,
                retry_after: retry_after(headers),
            },
            None => Self::UnexpectedStatus { status, body },
        }
    }

    /// The classified API error kind, when the API returned a documented status.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The HTTP status of the response that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The response body attached to a status or parse error.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. }
            | Self::UnexpectedStatus { body, .. }
            | Self::ResponseParse { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The server's `Retry-After` hint.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Api { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Whether trying again later may succeed. The client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api { kind, .. } => kind.is_transient(),
            Self::Transport(_) | Self::TimedOut { .. } => true,
            _ => false,
        }
    }
}

/// Parse a `Retry-After` header given as delta-seconds or an HTTP date.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let delta = at.with_timezone(&chrono::Utc) - chrono::Utc::now();
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, NlpCloudError>;
