//! Typed client core for the Trakt REST API.
//!
//! # Overview
//! Turns a logical API call (path, method, auth requirement, query, body)
//! into one strongly-typed outcome or a classified failure. Status codes are
//! mapped to a closed [`ErrorKind`], 429s carrying `retry-after` are retried
//! transparently, pagination headers are read into [`Page`], and the API's
//! three date formats are handled by [`date`].
//!
//! # Design
//! - [`RequestDescriptor`] describes a call; [`Executor`] renders it to an
//!   [`HttpRequest`], sends it through a [`Transport`] and loops on
//!   rate-limit retries.
//! - Classification ([`classify`]) and decoding ([`decode`]) are pure
//!   functions over [`HttpResponse`] values, testable without a network.
//! - [`TraktClient`] picks the outcome shape per endpoint; [`routes`] holds
//!   a small set of endpoints built on it.
//! - Everything is async; [`callback`] adapts it for completion-handler
//!   style consumers.

pub mod callback;
pub mod classify;
pub mod client;
pub mod config;
pub mod date;
pub mod decode;
pub mod error;
pub mod executor;
pub mod http;
pub mod models;
pub mod outcome;
pub mod request;
pub mod routes;
pub mod transport;

pub use classify::{ClassifiedOutcome, Exchange};
pub use client::TraktClient;
pub use config::{ClientConfig, ConfigError, RetryPolicy};
pub use error::{ApiError, ErrorKind, TransportError};
pub use executor::Executor;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use outcome::{
    Checkin, CheckinResult, ObjectResult, ObjectsResult, Page, PaginatedResult, PaginationMetadata, PlainResult,
    Watching, WatchingStatus,
};
pub use request::{ExtendedInfo, Filter, Pagination, RequestDescriptor};
pub use routes::Route;
pub use transport::{ReqwestTransport, Transport};
