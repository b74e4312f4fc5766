//! `TraktClient`: the call surface endpoint wrappers are written against.
//!
//! # Design
//! Each method takes a `RequestDescriptor` and resolves it into one outcome
//! shape. The shape is the caller's choice per endpoint: `object`, `list`,
//! `page`, `plain`, `checkin` or `watching`. All of them share the executor's
//! retry loop and differ only in how a response is interpreted.

use serde::de::DeserializeOwned;

use crate::classify::{classify_response, ClassifiedOutcome};
use crate::config::ClientConfig;
use crate::decode::{decode_checkin, decode_list, decode_object, decode_page, decode_unit, decode_watching};
use crate::error::ApiError;
use crate::executor::{resolve, Executor, Step};
use crate::models::CheckinResponse;
use crate::outcome::{
    Checkin, CheckinResult, ObjectResult, ObjectsResult, PaginatedResult, PlainResult, WatchingStatus,
};
use crate::request::RequestDescriptor;
use crate::transport::{ReqwestTransport, Transport};

/// Typed client for the Trakt API. Cheap to clone; clones share the
/// connection pool and configuration.
#[derive(Debug)]
pub struct TraktClient<T = ReqwestTransport> {
    executor: Executor<T>,
}

impl<T> Clone for TraktClient<T> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
        }
    }
}

impl TraktClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> TraktClient<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self {
            executor: Executor::new(transport, config),
        }
    }

    pub fn executor(&self) -> &Executor<T> {
        &self.executor
    }

    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    pub async fn object<R: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> ObjectResult<R> {
        self.executor
            .run(descriptor, |response| resolve(&response, decode_object))
            .await
    }

    pub async fn list<R: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> ObjectsResult<R> {
        self.executor
            .run(descriptor, |response| resolve(&response, decode_list))
            .await
    }

    pub async fn page<R: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> PaginatedResult<R> {
        self.executor
            .run(descriptor, |response| resolve(&response, decode_page))
            .await
    }

    pub async fn plain(&self, descriptor: &RequestDescriptor) -> PlainResult {
        self.executor
            .run(descriptor, |response| resolve(&response, decode_unit))
            .await
    }

    /// Checkin replies are judged by their body before their status: a 409
    /// carrying `expires_at` is `AlreadyCheckedIn`, not a failure.
    pub async fn checkin_call(&self, descriptor: &RequestDescriptor) -> CheckinResult {
        self.executor
            .run(descriptor, |response| {
                if let Some(checkin) = decode_checkin(&response) {
                    return Step::Done(Ok(checkin));
                }
                match classify_response(&response) {
                    ClassifiedOutcome::Success => Step::Done(
                        decode_object::<CheckinResponse>(&response).map(Checkin::CheckedIn),
                    ),
                    ClassifiedOutcome::RetryAfter(delay) => Step::Retry(delay),
                    ClassifiedOutcome::Failure(kind) => Step::Done(Err(kind)),
                }
            })
            .await
    }

    pub async fn watching_call(&self, descriptor: &RequestDescriptor) -> WatchingStatus {
        self.executor
            .run(descriptor, |response| resolve(&response, decode_watching))
            .await
    }
}
