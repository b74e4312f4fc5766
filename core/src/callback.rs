//! Completion-callback adapter over the async API.
//!
//! For consumers that want "call me back when it's done" instead of awaiting.
//! The call runs as a tokio task; [`CallHandle::cancel`] aborts it, after
//! which the callback never runs and no retry fires.
//!
//! ```no_run
//! # use trakt_core::{callback::spawn_call, ClientConfig, TraktClient};
//! # async fn demo() -> Result<(), trakt_core::ApiError> {
//! let client = TraktClient::new(ClientConfig::new("client-id", "", ""))?;
//! let handle = spawn_call(
//!     {
//!         let client = client.clone();
//!         async move { client.popular_movies().limit(10).send_page().await }
//!     },
//!     |result| match result {
//!         Ok(page) => println!("{} movies", page.items.len()),
//!         Err(err) => eprintln!("{err}"),
//!     },
//! );
//! handle.join().await;
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use tokio::task::JoinHandle;

/// Handle to a call started with [`spawn_call`].
#[derive(Debug)]
pub struct CallHandle {
    task: JoinHandle<()>,
}

impl CallHandle {
    /// Stop the call. Has no effect once the callback has run.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the call to finish or be cancelled.
    ///
    /// A panic inside the callback is resumed on the joining task.
    pub async fn join(self) {
        if let Err(err) = self.task.await {
            if err.is_panic() {
                std::panic::resume_unwind(err.into_panic());
            }
        }
    }
}

/// Run `call` on the tokio runtime and hand its output to `callback`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_call<Fut, R, F>(call: Fut, callback: F) -> CallHandle
where
    Fut: Future<Output = R> + Send + 'static,
    R: Send + 'static,
    F: FnOnce(R) + Send + 'static,
{
    let task = tokio::spawn(async move {
        let result = call.await;
        callback(result);
    });
    CallHandle { task }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpResponse;
    use crate::models::Movie;
    use crate::transport::testing::MockTransport;
    use crate::TraktClient;

    fn client(responses: Vec<HttpResponse>) -> (TraktClient<Arc<MockTransport>>, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::responding(responses));
        (
            TraktClient::with_transport(Arc::clone(&transport), ClientConfig::new("id", "", "")),
            transport,
        )
    }

    #[tokio::test]
    async fn callback_receives_outcome() {
        let (client, _) = client(vec![HttpResponse::new(200)
            .with_body(r#"[{"title":"Up","ids":{"trakt":3}}]"#)
            .with_header("x-pagination-page", "1")]);
        let (tx, rx) = oneshot::channel();

        let handle = spawn_call(
            async move { client.popular_movies().send_page().await },
            move |result| {
                let _ = tx.send(result);
            },
        );
        handle.join().await;

        let page = rx.await.unwrap().unwrap();
        let titles: Vec<&str> = page.items.iter().map(|m: &Movie| m.title.as_str()).collect();
        assert_eq!(titles, ["Up"]);
        assert_eq!(page.current_page(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_callback_and_retry() {
        let (client, transport) = client(vec![
            HttpResponse::new(429).with_header("retry-after", "5"),
            HttpResponse::new(200).with_body("[]"),
        ]);
        let (tx, mut rx) = oneshot::channel::<()>();

        let handle = spawn_call(
            async move { client.popular_movies().send_list().await },
            move |_| {
                let _ = tx.send(());
            },
        );
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_leaves_other_calls_running() {
        let (client, transport) = client(vec![
            HttpResponse::new(429).with_header("retry-after", "5"),
            HttpResponse::new(429).with_header("retry-after", "5"),
            HttpResponse::new(200).with_body("[]"),
            HttpResponse::new(200).with_body("[]"),
        ]);
        let (cancelled_tx, mut cancelled_rx) = oneshot::channel::<()>();
        let (kept_tx, kept_rx) = oneshot::channel();

        let cancelled = spawn_call(
            {
                let client = client.clone();
                async move { client.popular_movies().send_list().await }
            },
            move |_| {
                let _ = cancelled_tx.send(());
            },
        );
        let kept = spawn_call(
            async move { client.trending_movies().send_list().await },
            move |result| {
                let _ = kept_tx.send(result);
            },
        );
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancelled.cancel();
        kept.join().await;

        assert!(kept_rx.await.unwrap().unwrap().is_empty());
        assert!(cancelled_rx.try_recv().is_err());
        let paths: Vec<String> = transport.sent().into_iter().map(|r| r.url).collect();
        let count = |path: &str| paths.iter().filter(|url| url.ends_with(path)).count();
        assert_eq!(count("movies/popular"), 1);
        assert_eq!(count("movies/trending"), 2);
    }

    #[tokio::test]
    #[should_panic(expected = "callback failed")]
    async fn join_resumes_callback_panic() {
        let handle = spawn_call(async { 1 }, |_| panic!("callback failed"));
        handle.join().await;
    }
}
