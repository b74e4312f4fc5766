//! The handful of records the pipeline and its routes decode.
//!
//! Field names follow the API's snake_case JSON. Date fields go through
//! [`crate::date::serde_date`] so every wire shape is accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::serde_date;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ids {
    pub trakt: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    pub ids: Ids,

    // extended=full
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, with = "serde_date::option")]
    pub released: Option<DateTime<Utc>>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub votes: Option<u64>,
    #[serde(default, with = "serde_date::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub certification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    pub ids: Ids,

    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, with = "serde_date::option")]
    pub first_aired: Option<DateTime<Utc>>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, with = "serde_date::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub season: u32,
    pub number: u32,
    #[serde(default)]
    pub title: Option<String>,
    pub ids: Ids,
    #[serde(default, with = "serde_date::option")]
    pub first_aired: Option<DateTime<Utc>>,
}

/// Entry of `movies/trending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingMovie {
    pub watchers: u64,
    pub movie: Movie,
}

/// Entry of `shows/trending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingShow {
    pub watchers: u64,
    pub show: Show,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sharing {
    #[serde(default)]
    pub twitter: bool,
    #[serde(default)]
    pub mastodon: bool,
    #[serde(default)]
    pub tumblr: bool,
}

/// Reference to an item by its Trakt id, serialized as `{"ids":{"trakt":N}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncId {
    pub ids: TraktId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraktId {
    pub trakt: u64,
}

impl SyncId {
    pub fn new(trakt: u64) -> Self {
        Self {
            ids: TraktId { trakt },
        }
    }
}

/// Body of `POST checkin`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckinBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie: Option<SyncId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<SyncId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharing: Option<Sharing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_date: Option<String>,
}

impl CheckinBody {
    pub fn movie(trakt: u64) -> Self {
        Self {
            movie: Some(SyncId::new(trakt)),
            ..Self::default()
        }
    }

    pub fn episode(trakt: u64) -> Self {
        Self {
            episode: Some(SyncId::new(trakt)),
            ..Self::default()
        }
    }
}

/// Successful checkin. `id` references the history entry it created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinResponse {
    pub id: u64,
    #[serde(with = "serde_date")]
    pub watched_at: DateTime<Utc>,
    #[serde(default)]
    pub sharing: Option<Sharing>,
    #[serde(default)]
    pub movie: Option<Movie>,
    #[serde(default)]
    pub show: Option<Show>,
    #[serde(default)]
    pub episode: Option<Episode>,
}

/// What a user is watching right now (`users/{id}/watching`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchingItem {
    #[serde(with = "serde_date")]
    pub expires_at: DateTime<Utc>,
    #[serde(with = "serde_date")]
    pub started_at: DateTime<Utc>,
    /// `checkin` or `scrobble`.
    pub action: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub movie: Option<Movie>,
    #[serde(default)]
    pub show: Option<Show>,
    #[serde(default)]
    pub episode: Option<Episode>,
}

/// Body of the `scrobble/*` routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrobbleBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie: Option<SyncId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<SyncId>,
    /// Percentage between 0 and 100.
    pub progress: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrobbleResult {
    pub id: u64,
    /// `start`, `pause` or `scrobble`.
    pub action: String,
    pub progress: f32,
    #[serde(default)]
    pub sharing: Option<Sharing>,
    #[serde(default)]
    pub movie: Option<Movie>,
    #[serde(default)]
    pub episode: Option<Episode>,
    #[serde(default)]
    pub show: Option<Show>,
}
