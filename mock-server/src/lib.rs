use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use axum::Router as MockRouter;

pub const CATALOGUE_SIZE: u64 = 25;
pub const CHECKIN_EXPIRES_AT: &str = "2014-10-15T00:00:00.000-0000";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Ids {
    pub trakt: u64,
    pub slug: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub title: String,
    pub year: u16,
    pub ids: Ids,
    pub released: String,
}

#[derive(Clone, Debug)]
struct ActiveCheckin {
    history_id: u64,
    movie: Movie,
}

#[derive(Debug, Default)]
pub struct MockState {
    checkin: Option<ActiveCheckin>,
    /// Remaining 429 replies on `movies/trending`.
    throttle: u32,
    next_history_id: u64,
}

pub type Db = Arc<RwLock<MockState>>;

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<u64>,
    limit: Option<u64>,
}

#[derive(Deserialize)]
pub struct CheckinRequest {
    movie: Option<SyncId>,
}

#[derive(Deserialize)]
pub struct SyncId {
    ids: TraktId,
}

#[derive(Deserialize)]
pub struct TraktId {
    trakt: u64,
}

pub fn movie(n: u64) -> Movie {
    Movie {
        title: format!("Movie {n}"),
        year: 2000 + (n % 20) as u16,
        ids: Ids {
            trakt: n,
            slug: format!("movie-{n}"),
        },
        released: format!("{}-01-01", 2000 + n % 20),
    }
}

pub fn app() -> Router {
    app_with_throttle(0)
}

/// Same routes, but the first `throttle` requests to `movies/trending`
/// answer 429 with `retry-after: 1`.
pub fn app_with_throttle(throttle: u32) -> Router {
    let db: Db = Arc::new(RwLock::new(MockState {
        throttle,
        next_history_id: 3_373_536_619,
        ..MockState::default()
    }));
    Router::new()
        .route("/movies/popular", get(popular_movies))
        .route("/movies/trending", get(trending_movies))
        .route("/movies/{id}", get(movie_summary))
        .route("/checkin", axum::routing::post(check_in).delete(delete_checkin))
        .route("/users/{user}/watching", get(watching))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    tracing::info!(addr = ?listener.local_addr().ok(), "mock trakt server listening");
    axum::serve(listener, router).await
}

fn require_api_key(headers: &HeaderMap) -> Result<(), StatusCode> {
    match headers.get("trakt-api-key") {
        Some(key) if !key.is_empty() => Ok(()),
        _ => Err(StatusCode::FORBIDDEN),
    }
}

fn require_token(headers: &HeaderMap) -> Result<(), StatusCode> {
    require_api_key(headers)?;
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match bearer {
        Some(token) if !token.is_empty() => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn pagination_headers(page: u64, limit: u64, total: u64) -> [(HeaderName, HeaderValue); 4] {
    let page_count = total.div_ceil(limit.max(1));
    [
        (HeaderName::from_static("x-pagination-page"), HeaderValue::from(page)),
        (HeaderName::from_static("x-pagination-limit"), HeaderValue::from(limit)),
        (HeaderName::from_static("x-pagination-page-count"), HeaderValue::from(page_count)),
        (HeaderName::from_static("x-pagination-item-count"), HeaderValue::from(total)),
    ]
}

async fn popular_movies(headers: HeaderMap, Query(query): Query<PageQuery>) -> Result<Response, StatusCode> {
    require_api_key(&headers)?;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);
    let start = (page - 1) * limit + 1;
    let movies: Vec<Movie> = (start..start + limit)
        .filter(|n| *n <= CATALOGUE_SIZE)
        .map(movie)
        .collect();
    Ok((pagination_headers(page, limit, CATALOGUE_SIZE), Json(movies)).into_response())
}

async fn trending_movies(State(db): State<Db>, headers: HeaderMap) -> Result<Response, StatusCode> {
    require_api_key(&headers)?;
    let mut state = db.write().await;
    if state.throttle > 0 {
        state.throttle -= 1;
        return Ok((StatusCode::TOO_MANY_REQUESTS, [(header::RETRY_AFTER, "1")]).into_response());
    }
    let trending: Vec<Value> = (1..=3)
        .map(|n| json!({ "watchers": 100 - n, "movie": movie(n) }))
        .collect();
    Ok(Json(trending).into_response())
}

async fn movie_summary(headers: HeaderMap, Path(id): Path<String>) -> Result<Json<Movie>, StatusCode> {
    require_api_key(&headers)?;
    (1..=CATALOGUE_SIZE)
        .map(movie)
        .find(|m| m.ids.slug == id || m.ids.trakt.to_string() == id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn check_in(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CheckinRequest>,
) -> Result<Response, StatusCode> {
    require_token(&headers)?;
    let mut state = db.write().await;
    if state.checkin.is_some() {
        return Ok((StatusCode::CONFLICT, Json(json!({ "expires_at": CHECKIN_EXPIRES_AT }))).into_response());
    }
    let trakt = input.movie.map(|m| m.ids.trakt).ok_or(StatusCode::BAD_REQUEST)?;
    let history_id = state.next_history_id;
    state.next_history_id += 1;
    let active = ActiveCheckin {
        history_id,
        movie: movie(trakt),
    };
    let body = json!({
        "id": active.history_id,
        "watched_at": "2014-08-06T01:11:37.000Z",
        "sharing": { "twitter": false, "tumblr": false },
        "movie": active.movie,
    });
    state.checkin = Some(active);
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn delete_checkin(State(db): State<Db>, headers: HeaderMap) -> Result<StatusCode, StatusCode> {
    require_token(&headers)?;
    db.write().await.checkin = None;
    Ok(StatusCode::NO_CONTENT)
}

async fn watching(State(db): State<Db>, headers: HeaderMap, Path(_user): Path<String>) -> Result<Response, StatusCode> {
    require_api_key(&headers)?;
    let state = db.read().await;
    match &state.checkin {
        None => Ok(StatusCode::NO_CONTENT.into_response()),
        Some(active) => Ok(Json(json!({
            "expires_at": CHECKIN_EXPIRES_AT,
            "started_at": "2014-10-14T22:00:00.000Z",
            "action": "checkin",
            "type": "movie",
            "movie": active.movie,
        }))
        .into_response()),
    }
}
