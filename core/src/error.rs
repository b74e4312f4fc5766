//! Error types for the Trakt client.
//!
//! # Design
//! `ErrorKind` is a closed enumeration: every non-2xx status lands in exactly
//! one variant via [`ErrorKind::from_status`], and unmapped 5xx / other
//! statuses degrade to `UpstreamGatewayError` / `Unhandled` instead of
//! growing new variants. `RateLimited` and `Unhandled` keep the full response
//! so callers can inspect headers. The core never attaches user-facing text
//! beyond `Display`.

use crate::http::HttpResponse;

/// The public error type of every client call.
pub type ApiError = ErrorKind;

/// A network-level failure: no HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    /// Set when the transport gave up waiting rather than failing outright.
    pub timed_out: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }
}

/// Classified failure of a logical API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// 400: the request couldn't be parsed.
    #[error("bad request")]
    BadRequest,

    /// 401: OAuth must be provided, or no access token was configured.
    #[error("unauthorized")]
    Unauthorized,

    /// 403: invalid API key or unapproved app.
    #[error("forbidden")]
    Forbidden,

    /// 404: method exists, but no record found.
    #[error("not found")]
    NotFound,

    /// 405: method doesn't exist.
    #[error("method not found")]
    MethodNotFound,

    /// 409: resource already created.
    #[error("conflict")]
    Conflict,

    /// 420: list count, item count, etc.
    #[error("account limit exceeded")]
    AccountLimitExceeded,

    /// 423
    #[error("account locked")]
    AccountLocked,

    /// 426: user must upgrade to VIP.
    #[error("VIP required")]
    VipRequired,

    /// 429 without a usable `retry-after` header.
    #[error("rate limit exceeded")]
    RateLimited(HttpResponse),

    /// 503 or 504.
    #[error("server overloaded")]
    ServerOverloaded,

    /// Any other 5xx, typically the CDN in front of the API.
    #[error("upstream gateway error")]
    UpstreamGatewayError,

    /// Any status outside 2xx with no dedicated variant.
    #[error("unhandled HTTP status {}", .0.status)]
    Unhandled(HttpResponse),

    #[error("transport error: {0}")]
    Transport(TransportError),

    /// The body did not match the expected shape.
    #[error("decoding failed: {0}")]
    DecodingFailed(String),

    /// A body was expected but none arrived.
    #[error("empty response body")]
    EmptyBody,

    /// The server kept answering 429 past the configured retry budget.
    #[error("gave up after {attempts} rate-limited attempts")]
    RetryLimitExceeded { attempts: u32 },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ErrorKind {
    /// Total mapping from a non-2xx status to its error.
    ///
    /// 429 maps to `RateLimited` here; whether a 429 is retried instead is
    /// decided by the classifier, which looks at `retry-after` first.
    pub fn from_status(response: &HttpResponse) -> ErrorKind {
        match response.status {
            400 => ErrorKind::BadRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            405 => ErrorKind::MethodNotFound,
            409 => ErrorKind::Conflict,
            420 => ErrorKind::AccountLimitExceeded,
            423 => ErrorKind::AccountLocked,
            426 => ErrorKind::VipRequired,
            429 => ErrorKind::RateLimited(response.clone()),
            503 | 504 => ErrorKind::ServerOverloaded,
            500..=599 => ErrorKind::UpstreamGatewayError,
            _ => ErrorKind::Unhandled(response.clone()),
        }
    }

    /// The HTTP status this error was derived from, when it has a single one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ErrorKind::BadRequest => Some(400),
            ErrorKind::Unauthorized => Some(401),
            ErrorKind::Forbidden => Some(403),
            ErrorKind::NotFound => Some(404),
            ErrorKind::MethodNotFound => Some(405),
            ErrorKind::Conflict => Some(409),
            ErrorKind::AccountLimitExceeded => Some(420),
            ErrorKind::AccountLocked => Some(423),
            ErrorKind::VipRequired => Some(426),
            ErrorKind::RateLimited(response) | ErrorKind::Unhandled(response) => {
                Some(response.status)
            }
            ErrorKind::ServerOverloaded
            | ErrorKind::UpstreamGatewayError
            | ErrorKind::Transport(_)
            | ErrorKind::DecodingFailed(_)
            | ErrorKind::EmptyBody
            | ErrorKind::RetryLimitExceeded { .. }
            | ErrorKind::Serialization(_) => None,
        }
    }

    /// Failures that may succeed if the caller tries again later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimited(_)
                | ErrorKind::ServerOverloaded
                | ErrorKind::UpstreamGatewayError
                | ErrorKind::RetryLimitExceeded { .. }
                | ErrorKind::Transport(_)
        )
    }
}

impl From<TransportError> for ErrorKind {
    fn from(err: TransportError) -> Self {
        ErrorKind::Transport(err)
    }
}

impl From<serde_json::Error> for ErrorKind {
    fn from(err: serde_json::Error) -> Self {
        ErrorKind::DecodingFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(status: u16) -> ErrorKind {
        ErrorKind::from_status(&HttpResponse::new(status))
    }

    #[test]
    fn mapped_client_errors() {
        assert_eq!(kind(400), ErrorKind::BadRequest);
        assert_eq!(kind(401), ErrorKind::Unauthorized);
        assert_eq!(kind(403), ErrorKind::Forbidden);
        assert_eq!(kind(404), ErrorKind::NotFound);
        assert_eq!(kind(405), ErrorKind::MethodNotFound);
        assert_eq!(kind(409), ErrorKind::Conflict);
        assert_eq!(kind(420), ErrorKind::AccountLimitExceeded);
        assert_eq!(kind(423), ErrorKind::AccountLocked);
        assert_eq!(kind(426), ErrorKind::VipRequired);
    }

    #[test]
    fn server_errors_degrade_by_range() {
        assert_eq!(kind(503), ErrorKind::ServerOverloaded);
        assert_eq!(kind(504), ErrorKind::ServerOverloaded);
        for status in [500, 502, 520, 521, 522, 599] {
            assert_eq!(kind(status), ErrorKind::UpstreamGatewayError, "{status}");
        }
    }

    #[test]
    fn unmapped_statuses_are_unhandled() {
        for status in [301, 412, 422, 600, 100] {
            assert!(matches!(kind(status), ErrorKind::Unhandled(ref r) if r.status == status));
        }
    }

    #[test]
    fn status_round_trips_for_mapped_kinds() {
        for status in [400, 401, 403, 404, 405, 409, 420, 423, 426, 429, 418] {
            assert_eq!(kind(status).status(), Some(status));
        }
        assert_eq!(ErrorKind::EmptyBody.status(), None);
    }

    #[test]
    fn retryable_kinds() {
        let cases = [
            (kind(429), true),
            (kind(503), true),
            (kind(504), true),
            (kind(500), true),
            (ErrorKind::RetryLimitExceeded { attempts: 3 }, true),
            (ErrorKind::Transport(TransportError::timeout("read timed out")), true),
            (kind(400), false),
            (kind(401), false),
            (kind(404), false),
            (kind(409), false),
            (kind(418), false),
            (ErrorKind::EmptyBody, false),
            (ErrorKind::DecodingFailed("expected array".into()), false),
            (ErrorKind::Serialization("bad body".into()), false),
        ];
        for (err, retryable) in cases {
            assert_eq!(err.is_retryable(), retryable, "{err:?}");
        }
    }

    #[test]
    fn display_mentions_unhandled_status() {
        assert_eq!(kind(418).to_string(), "unhandled HTTP status 418");
    }
}
