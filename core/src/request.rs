//! Logical API calls, before they are rendered into HTTP.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpMethod;

/// Everything the executor needs to perform one logical call.
///
/// Built with the consuming methods below and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub path: String,
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub requires_authorization: bool,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            path: path.trim_start_matches('/').to_string(),
            method,
            query: Vec::new(),
            requires_authorization: false,
            body: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn authorized(mut self) -> Self {
        self.requires_authorization = true;
        self
    }

    /// Append a query pair. Order is preserved on the wire.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn queries<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn body<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// `?page=&limit=` for paginated routes. The API defaults to page 1 of 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub fn pairs(&self) -> [(String, String); 2] {
        [
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }
}

/// How much detail a response should include (`?extended=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendedInfo {
    Min,
    Full,
    Metadata,
    NoSeasons,
    Episodes,
    GuestStars,
}

impl ExtendedInfo {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtendedInfo::Min => "min",
            ExtendedInfo::Full => "full",
            ExtendedInfo::Metadata => "metadata",
            ExtendedInfo::NoSeasons => "noseasons",
            ExtendedInfo::Episodes => "episodes",
            ExtendedInfo::GuestStars => "guest_stars",
        }
    }
}

/// Discovery filters accepted by movie, show, calendar and search routes.
///
/// List-valued filters are sent comma separated and match any of the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Four digit year.
    Years(u16),
    /// Genre slugs.
    Genres(Vec<String>),
    /// Two character language codes.
    Languages(Vec<String>),
    /// Two character country codes.
    Countries(Vec<String>),
    /// Range in minutes.
    Runtimes(u32, u32),
    /// Range between 0 and 100.
    Ratings(u8, u8),
    /// US content certifications.
    Certifications(Vec<String>),
    Networks(Vec<String>),
    /// `returning series`, `in production`, `planned`, `canceled` or `ended`.
    Status(Vec<String>),
}

impl Filter {
    pub fn pair(&self) -> (String, String) {
        let (key, value) = match self {
            Filter::Years(year) => ("years", year.to_string()),
            Filter::Genres(v) => ("genres", v.join(",")),
            Filter::Languages(v) => ("languages", v.join(",")),
            Filter::Countries(v) => ("countries", v.join(",")),
            Filter::Runtimes(lower, upper) => ("runtimes", format!("{lower}-{upper}")),
            Filter::Ratings(lower, upper) => ("ratings", format!("{lower}-{upper}")),
            Filter::Certifications(v) => ("certifications", v.join(",")),
            Filter::Networks(v) => ("networks", v.join(",")),
            Filter::Status(v) => ("status", v.join(",")),
        };
        (key.to_string(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_query_order() {
        let req = RequestDescriptor::get("/movies/popular")
            .query("page", 1)
            .query("limit", 10)
            .queries(Pagination::new(2, 5).pairs());
        assert_eq!(req.path, "movies/popular");
        assert_eq!(req.method, HttpMethod::Get);
        let keys: Vec<&str> = req.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["page", "limit", "page", "limit"]);
        assert!(!req.requires_authorization);
    }

    #[test]
    fn body_is_serialized_once() {
        #[derive(Serialize)]
        struct Body {
            progress: f32,
        }
        let req = RequestDescriptor::post("scrobble/start")
            .authorized()
            .body(&Body { progress: 12.5 })
            .unwrap();
        assert!(req.requires_authorization);
        assert_eq!(req.body, Some(serde_json::json!({"progress": 12.5})));
    }

    #[test]
    fn filters_render_as_query_pairs() {
        assert_eq!(
            Filter::Genres(vec!["action".into(), "adventure".into()]).pair(),
            ("genres".to_string(), "action,adventure".to_string())
        );
        assert_eq!(
            Filter::Runtimes(30, 90).pair(),
            ("runtimes".to_string(), "30-90".to_string())
        );
        assert_eq!(Filter::Years(2016).pair().1, "2016");
    }
}
