//! Decodes success bodies into the caller's chosen shape.
//!
//! Decoding is strict: a body that doesn't match is `DecodingFailed`, never a
//! default value. Date fields go through [`crate::date`] via the models' serde
//! attributes.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::date::parse_date;
use crate::error::ErrorKind;
use crate::http::HttpResponse;
use crate::models::{CheckinResponse, WatchingItem};
use crate::outcome::{Checkin, Page, PaginationMetadata, Watching};

pub const PAGE_HEADER: &str = "x-pagination-page";
pub const PAGE_COUNT_HEADER: &str = "x-pagination-page-count";
pub const LIMIT_HEADER: &str = "x-pagination-limit";
pub const ITEM_COUNT_HEADER: &str = "x-pagination-item-count";

const NO_CONTENT: u16 = 204;

pub fn decode_object<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ErrorKind> {
    if !response.has_body() {
        return Err(ErrorKind::EmptyBody);
    }
    serde_json::from_slice(&response.body).map_err(|e| ErrorKind::DecodingFailed(e.to_string()))
}

/// Decode a JSON array, keeping the server's order.
pub fn decode_list<T: DeserializeOwned>(response: &HttpResponse) -> Result<Vec<T>, ErrorKind> {
    decode_object(response)
}

pub fn decode_page<T: DeserializeOwned>(response: &HttpResponse) -> Result<Page<T>, ErrorKind> {
    Ok(Page {
        items: decode_list(response)?,
        pagination: pagination(response),
    })
}

/// Success with no payload expected; any body is ignored.
pub fn decode_unit(_response: &HttpResponse) -> Result<(), ErrorKind> {
    Ok(())
}

/// Read pagination headers. Absent or malformed values read as 0.
pub fn pagination(response: &HttpResponse) -> PaginationMetadata {
    let read = |name| {
        response
            .header(name)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(0)
    };
    PaginationMetadata {
        current_page: read(PAGE_HEADER),
        page_count: read(PAGE_COUNT_HEADER),
        limit: read(LIMIT_HEADER),
        item_count: read(ITEM_COUNT_HEADER),
    }
}

/// Interpret a checkin reply by its body, whatever the status.
///
/// The success shape is tried first, then an object with a parseable
/// `expires_at` (the 409 "already checked in" reply). `None` means neither
/// matched and the status decides.
pub fn decode_checkin(response: &HttpResponse) -> Option<Checkin> {
    if !response.has_body() {
        return None;
    }
    if let Ok(checkin) = serde_json::from_slice::<CheckinResponse>(&response.body) {
        return Some(Checkin::CheckedIn(checkin));
    }
    let value: Value = serde_json::from_slice(&response.body).ok()?;
    let expires_at = value.as_object()?.get("expires_at")?.as_str()?;
    parse_date(expires_at)
        .ok()
        .map(|expires_at| Checkin::AlreadyCheckedIn { expires_at })
}

pub fn decode_watching(response: &HttpResponse) -> Result<Watching, ErrorKind> {
    if response.status == NO_CONTENT {
        return Ok(Watching::Idle);
    }
    decode_object::<WatchingItem>(response).map(Watching::Active)
}
