//! Turns a completed exchange into success, retry, or a typed failure.

use std::time::Duration;

use crate::error::{ErrorKind, TransportError};
use crate::http::HttpResponse;

pub const RATE_LIMIT_STATUS: u16 = 429;
pub const RETRY_AFTER: &str = "retry-after";

/// One HTTP round-trip: a response, or the transport failure that prevented it.
pub type Exchange = Result<HttpResponse, TransportError>;

/// What the executor should do with an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedOutcome {
    /// 2xx: hand the response to the decoder.
    Success,
    /// 429 with a usable `retry-after`: re-send the same request after the delay.
    RetryAfter(Duration),
    Failure(ErrorKind),
}

pub fn classify(exchange: &Exchange) -> ClassifiedOutcome {
    match exchange {
        Ok(response) => classify_response(response),
        Err(err) => ClassifiedOutcome::Failure(ErrorKind::Transport(err.clone())),
    }
}

pub fn classify_response(response: &HttpResponse) -> ClassifiedOutcome {
    if response.is_success() {
        return ClassifiedOutcome::Success;
    }
    if response.status == RATE_LIMIT_STATUS {
        if let Some(delay) = retry_after(response) {
            return ClassifiedOutcome::RetryAfter(delay);
        }
    }
    ClassifiedOutcome::Failure(ErrorKind::from_status(response))
}

/// Parse `retry-after` as a positive number of seconds.
///
/// HTTP-date values are not accepted; the API only sends seconds.
pub fn retry_after(response: &HttpResponse) -> Option<Duration> {
    let raw = response.header(RETRY_AFTER)?.trim();
    let seconds: f64 = raw.parse().ok()?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(seconds).ok()
}
