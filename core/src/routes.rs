//! A thin slice of the endpoint surface, built on [`TraktClient`].
//!
//! `Route<T>` carries a descriptor plus the item type the endpoint returns,
//! and lets callers add query modifiers before picking how to resolve it.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::client::TraktClient;
use crate::error::ApiError;
use crate::models::{CheckinBody, Movie, ScrobbleBody, ScrobbleResult, Show, TrendingMovie, TrendingShow};
use crate::outcome::{CheckinResult, ObjectResult, ObjectsResult, PaginatedResult, PlainResult, WatchingStatus};
use crate::request::{ExtendedInfo, Filter, Pagination, RequestDescriptor};
use crate::transport::Transport;

#[derive(Debug)]
pub struct Route<'c, T, Tr> {
    client: &'c TraktClient<Tr>,
    descriptor: RequestDescriptor,
    item: PhantomData<fn() -> T>,
}

impl<'c, T: DeserializeOwned, Tr: Transport> Route<'c, T, Tr> {
    pub fn new(client: &'c TraktClient<Tr>, descriptor: RequestDescriptor) -> Self {
        Self {
            client,
            descriptor,
            item: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn extended(self, info: ExtendedInfo) -> Self {
        self.query("extended", info.as_str())
    }

    pub fn page(self, page: u32) -> Self {
        self.query("page", page)
    }

    pub fn limit(self, limit: u32) -> Self {
        self.query("limit", limit)
    }

    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.descriptor = self.descriptor.queries(pagination.pairs());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.descriptor = self.descriptor.queries([filter.pair()]);
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.descriptor = self.descriptor.query(key, value);
        self
    }

    pub async fn send(self) -> ObjectResult<T> {
        self.client.object(&self.descriptor).await
    }

    pub async fn send_list(self) -> ObjectsResult<T> {
        self.client.list(&self.descriptor).await
    }

    pub async fn send_page(self) -> PaginatedResult<T> {
        self.client.page(&self.descriptor).await
    }
}

impl<Tr: Transport> TraktClient<Tr> {
    pub fn popular_movies(&self) -> Route<'_, Movie, Tr> {
        Route::new(self, RequestDescriptor::get("movies/popular"))
    }

    pub fn trending_movies(&self) -> Route<'_, TrendingMovie, Tr> {
        Route::new(self, RequestDescriptor::get("movies/trending"))
    }

    /// `id` is a Trakt id, slug or IMDB id.
    pub fn movie(&self, id: &str) -> Route<'_, Movie, Tr> {
        Route::new(self, RequestDescriptor::get(&format!("movies/{id}")))
    }

    pub fn popular_shows(&self) -> Route<'_, Show, Tr> {
        Route::new(self, RequestDescriptor::get("shows/popular"))
    }

    pub fn trending_shows(&self) -> Route<'_, TrendingShow, Tr> {
        Route::new(self, RequestDescriptor::get("shows/trending"))
    }

    pub fn show(&self, id: &str) -> Route<'_, Show, Tr> {
        Route::new(self, RequestDescriptor::get(&format!("shows/{id}")))
    }

    /// Check into a movie or episode. A checkin already in progress resolves
    /// to `Checkin::AlreadyCheckedIn` with the time a new one is allowed.
    pub async fn check_in(&self, body: &CheckinBody) -> CheckinResult {
        let descriptor = RequestDescriptor::post("checkin").authorized().body(body)?;
        self.checkin_call(&descriptor).await
    }

    /// Remove any active checkin.
    pub async fn delete_active_checkins(&self) -> PlainResult {
        self.plain(&RequestDescriptor::delete("checkin").authorized())
            .await
    }

    /// What `user` is watching. Private profiles need authorization.
    pub async fn watching(&self, user: &str) -> WatchingStatus {
        let mut descriptor = RequestDescriptor::get(&format!("users/{user}/watching"));
        if self.config().access_token.is_some() {
            descriptor = descriptor.authorized();
        }
        self.watching_call(&descriptor).await
    }

    pub async fn scrobble_start(&self, body: &ScrobbleBody) -> ObjectResult<ScrobbleResult> {
        self.scrobble("start", body).await
    }

    pub async fn scrobble_pause(&self, body: &ScrobbleBody) -> ObjectResult<ScrobbleResult> {
        self.scrobble("pause", body).await
    }

    pub async fn scrobble_stop(&self, body: &ScrobbleBody) -> ObjectResult<ScrobbleResult> {
        self.scrobble("stop", body).await
    }

    async fn scrobble(&self, action: &str, body: &ScrobbleBody) -> Result<ScrobbleResult, ApiError> {
        let descriptor = RequestDescriptor::post(&format!("scrobble/{action}"))
            .authorized()
            .body(body)?;
        self.object(&descriptor).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ErrorKind;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::models::SyncId;
    use crate::outcome::{Checkin, Watching};
    use crate::transport::testing::MockTransport;

    fn client(
        responses: Vec<HttpResponse>,
        token: Option<&str>,
    ) -> (TraktClient<Arc<MockTransport>>, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::responding(responses));
        let mut config = ClientConfig::new("id", "", "");
        if let Some(token) = token {
            config = config.with_access_token(token);
        }
        (TraktClient::with_transport(Arc::clone(&transport), config), transport)
    }

    #[test]
    fn route_modifiers_build_query() {
        let (client, _) = client(vec![], None);
        let route = client
            .popular_movies()
            .extended(ExtendedInfo::Full)
            .pagination(Pagination::new(2, 20))
            .filter(Filter::Genres(vec!["action".into()]));
        let query: Vec<(&str, &str)> = route
            .descriptor()
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            query,
            [("extended", "full"), ("page", "2"), ("limit", "20"), ("genres", "action")]
        );
    }

    #[tokio::test]
    async fn movie_summary_url() {
        let (client, transport) = client(
            vec![HttpResponse::new(200).with_body(r#"{"title":"TRON: Legacy","ids":{"trakt":1}}"#)],
            None,
        );
        let movie = client
            .movie("tron-legacy-2010")
            .extended(ExtendedInfo::Min)
            .send()
            .await
            .unwrap();
        assert_eq!(movie.title, "TRON: Legacy");
        assert_eq!(
            transport.sent()[0].url,
            "https://api.trakt.tv/movies/tron-legacy-2010?extended=min"
        );
    }

    #[tokio::test]
    async fn check_in_posts_body() {
        let (client, transport) = client(
            vec![HttpResponse::new(409).with_body(r#"{"expires_at":"2014-10-15T00:00:00.000Z"}"#)],
            Some("token"),
        );
        let outcome = client.check_in(&CheckinBody::episode(12345)).await.unwrap();
        assert!(matches!(outcome, Checkin::AlreadyCheckedIn { .. }));

        let sent = &transport.sent()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url, "https://api.trakt.tv/checkin");
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"episode": {"ids": {"trakt": 12345}}}));
    }

    #[tokio::test]
    async fn check_in_without_token_is_unauthorized() {
        let (client, transport) = client(vec![], None);
        let err = client.check_in(&CheckinBody::movie(1)).await.unwrap_err();
        assert_eq!(err, ErrorKind::Unauthorized);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn delete_active_checkins_accepts_no_content() {
        let (client, transport) = client(vec![HttpResponse::new(204)], Some("token"));
        client.delete_active_checkins().await.unwrap();
        assert_eq!(transport.sent()[0].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn watching_is_authorized_only_with_token() {
        let (client, transport) = client(vec![HttpResponse::new(204)], None);
        assert_eq!(client.watching("sean").await.unwrap(), Watching::Idle);
        let sent = &transport.sent()[0];
        assert_eq!(sent.url, "https://api.trakt.tv/users/sean/watching");
        assert!(sent.header("authorization").is_none());
    }

    #[tokio::test]
    async fn scrobble_paths() {
        let result = r#"{"id":0,"action":"start","progress":1.25,"movie":{"title":"x","ids":{"trakt":1}}}"#;
        let (client, transport) = client(
            vec![
                HttpResponse::new(201).with_body(result),
                HttpResponse::new(201).with_body(result.replace("start", "pause")),
                HttpResponse::new(201).with_body(result.replace("start", "scrobble")),
            ],
            Some("token"),
        );
        let body = ScrobbleBody {
            movie: Some(SyncId::new(1)),
            progress: 1.25,
            ..ScrobbleBody::default()
        };
        assert_eq!(client.scrobble_start(&body).await.unwrap().action, "start");
        assert_eq!(client.scrobble_pause(&body).await.unwrap().action, "pause");
        assert_eq!(client.scrobble_stop(&body).await.unwrap().action, "scrobble");

        let urls: Vec<String> = transport.sent().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            [
                "https://api.trakt.tv/scrobble/start",
                "https://api.trakt.tv/scrobble/pause",
                "https://api.trakt.tv/scrobble/stop",
            ]
        );
    }
}
