//! Runs one logical call to completion.
//!
//! # Design
//! A call moves through `Sending → Classifying → {Done | Retrying}`. A 429
//! carrying `retry-after` sends the exact same `HttpRequest` again after the
//! delay; the caller only ever sees the final outcome. Retries are bounded by
//! the configured [`RetryPolicy`](crate::config::RetryPolicy) and run strictly
//! one after another.
//!
//! The loop is a plain future: dropping it cancels the in-flight exchange or
//! the pending retry sleep, and nothing is delivered.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn, Instrument};
use url::Url;
use uuid::Uuid;

use crate::classify::{classify_response, ClassifiedOutcome};
use crate::config::{ClientConfig, API_VERSION};
use crate::error::{ErrorKind, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::request::RequestDescriptor;
use crate::transport::Transport;

/// What to do after looking at one response.
#[derive(Debug)]
pub enum Step<R> {
    Done(Result<R, ErrorKind>),
    Retry(Duration),
}

/// Standard interpretation: classify, then decode 2xx bodies with `decode`.
pub fn resolve<R>(
    response: &HttpResponse,
    decode: impl FnOnce(&HttpResponse) -> Result<R, ErrorKind>,
) -> Step<R> {
    match classify_response(response) {
        ClassifiedOutcome::Success => Step::Done(decode(response)),
        ClassifiedOutcome::RetryAfter(delay) => Step::Retry(delay),
        ClassifiedOutcome::Failure(kind) => Step::Done(Err(kind)),
    }
}

#[derive(Debug)]
pub struct Executor<T> {
    transport: Arc<T>,
    config: Arc<ClientConfig>,
}

impl<T> Clone for Executor<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T: Transport> Executor<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Render a descriptor into the request that goes on the wire.
    ///
    /// Fails with `Unauthorized` when the call needs a token and none is
    /// configured; nothing is sent in that case.
    pub fn build_request(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest, ErrorKind> {
        let raw = format!("{}/{}", self.config.base_url, descriptor.path);
        let mut url = Url::parse(&raw)
            .map_err(|e| ErrorKind::Transport(TransportError::new(format!("invalid url {raw}: {e}"))))?;
        if !descriptor.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&descriptor.query);
        }

        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("trakt-api-version".to_string(), API_VERSION.to_string()),
            ("trakt-api-key".to_string(), self.config.client_id.clone()),
        ];
        if descriptor.requires_authorization {
            let token = self
                .config
                .access_token
                .as_deref()
                .ok_or(ErrorKind::Unauthorized)?;
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        Ok(HttpRequest {
            method: descriptor.method,
            url: url.into(),
            headers,
            body: descriptor.body.as_ref().map(|b| b.to_string()),
        })
    }

    /// Send the call and return the raw 2xx response.
    pub async fn exchange(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, ErrorKind> {
        self.run(descriptor, |response| resolve(&response, |r| Ok(r.clone())))
            .await
    }

    /// Send the call, letting `interpret` decide on each response.
    ///
    /// Transport failures end the call without reaching `interpret`.
    pub async fn run<R, F>(&self, descriptor: &RequestDescriptor, mut interpret: F) -> Result<R, ErrorKind>
    where
        F: FnMut(HttpResponse) -> Step<R>,
    {
        let request = self.build_request(descriptor)?;
        let policy = self.config.retry;
        let span = tracing::debug_span!(
            "trakt_call",
            call_id = %Uuid::new_v4(),
            method = %request.method,
            path = %descriptor.path,
        );

        async move {
            let mut retries = 0u32;
            loop {
                let response = match self.transport.send(&request).await {
                    Ok(response) => response,
                    Err(err) => {
                        debug!(error = %err, timed_out = err.timed_out, "transport failure");
                        return Err(ErrorKind::Transport(err));
                    }
                };
                debug!(status = response.status, bytes = response.body.len(), "exchange completed");

                match interpret(response) {
                    Step::Done(result) => return result,
                    Step::Retry(delay) => {
                        if retries >= policy.max_retries || delay > policy.max_delay {
                            warn!(
                                attempts = retries + 1,
                                delay_ms = delay.as_millis() as u64,
                                "rate limited, retry budget spent"
                            );
                            return Err(ErrorKind::RetryLimitExceeded { attempts: retries + 1 });
                        }
                        retries += 1;
                        warn!(retry = retries, delay_ms = delay.as_millis() as u64, "rate limited, retrying");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}
