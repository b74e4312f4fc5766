//! The outcome shapes a call can resolve to.
//!
//! The caller picks the shape per endpoint; nothing is inferred from the
//! response. Every shape has an error arm carrying the [`ApiError`] that
//! caused it.

use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::models::{CheckinResponse, WatchingItem};

/// Page position read from `x-pagination-*` headers. Missing headers read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PaginationMetadata {
    pub current_page: u32,
    pub page_count: u32,
    pub limit: u32,
    pub item_count: u32,
}

/// One page of a paginated list, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Page<T> {
    pub fn current_page(&self) -> u32 {
        self.pagination.current_page
    }

    pub fn page_count(&self) -> u32 {
        self.pagination.page_count
    }

    pub fn has_next(&self) -> bool {
        self.pagination.current_page < self.pagination.page_count
    }
}

/// Result of `POST checkin`.
#[derive(Debug, Clone, PartialEq)]
pub enum Checkin {
    CheckedIn(CheckinResponse),
    /// A checkin is already in progress; a new one is allowed after `expires_at`.
    AlreadyCheckedIn { expires_at: DateTime<Utc> },
}

/// Result of `users/{id}/watching`.
#[derive(Debug, Clone, PartialEq)]
pub enum Watching {
    Active(WatchingItem),
    /// 204: the user isn't watching anything.
    Idle,
}

pub type ObjectResult<T> = Result<T, ApiError>;
pub type ObjectsResult<T> = Result<Vec<T>, ApiError>;
pub type PaginatedResult<T> = Result<Page<T>, ApiError>;
pub type PlainResult = Result<(), ApiError>;
pub type CheckinResult = Result<Checkin, ApiError>;
pub type WatchingStatus = Result<Watching, ApiError>;
