//! HTTP exchange types described as plain data.
//!
//! # Design
//! The executor renders a `RequestDescriptor` into an `HttpRequest`, hands it
//! to a `Transport`, and gets an `HttpResponse` back. Classification and
//! decoding only ever see these values, never the transport's own types, so
//! every step after the network call is deterministic and testable without
//! a socket.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Select one or more items. Success is 200.
    Get,
    /// Create an item. Success is 201.
    Post,
    /// Update an item. Success is 200.
    Put,
    /// Delete an item. Success is 200 or 204.
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully rendered HTTP request: absolute URL, headers and JSON body.
///
/// Built once per logical call and re-sent unchanged on every retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A completed HTTP exchange as plain data.
///
/// An empty `body` means the server sent no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Case-insensitive header lookup. Returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// `true` when the body is empty or only whitespace.
    pub fn has_body(&self) -> bool {
        self.body.iter().any(|b| !b.is_ascii_whitespace())
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse::new(200).with_header("X-Pagination-Page", "2");
        assert_eq!(response.header("x-pagination-page"), Some("2"));
        assert_eq!(response.header("X-PAGINATION-PAGE"), Some("2"));
        assert_eq!(response.header("x-pagination-page-count"), None);
    }

    #[test]
    fn whitespace_body_counts_as_empty() {
        assert!(!HttpResponse::new(200).has_body());
        assert!(!HttpResponse::new(200).with_body(" \n").has_body());
        assert!(HttpResponse::new(200).with_body("[]").has_body());
    }

    #[test]
    fn success_range() {
        assert!(HttpResponse::new(204).is_success());
        assert!(!HttpResponse::new(199).is_success());
        assert!(!HttpResponse::new(300).is_success());
    }
}
