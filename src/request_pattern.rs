//! Request patterns
//!
//! The journal treats a request pattern as an opaque predicate over a
//! `LoggedRequest`. Anything implementing `RequestPredicate` can be passed to the
//! query operations, including plain closures. `RequestPattern` is the structural
//! matcher used by tests and by the verification helpers.

use regex::Regex;

use crate::errors::{JournalError, JournalResult};
use crate::serve_event::LoggedRequest;

/// Predicate over a captured request
pub trait RequestPredicate: Send + Sync {
    fn matches(&self, request: &LoggedRequest) -> bool;
}

impl<F> RequestPredicate for F
where
    F: Fn(&LoggedRequest) -> bool + Send + Sync,
{
    fn matches(&self, request: &LoggedRequest) -> bool {
        self(request)
    }
}

fn full_match(pattern: &str) -> JournalResult<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| JournalError::Pattern { source })
}

/// Matcher for a single string value (header value or body)
#[derive(Debug, Clone)]
pub enum StringPattern {
    EqualTo(String),
    Contains(String),
    /// Regex that must match the whole value
    Matches(Regex),
    /// Header must not be present. As a body pattern, the body must be empty.
    Absent,
    /// Both sides parse as JSON and are structurally equal
    EqualToJson(serde_json::Value),
}

impl StringPattern {
    pub fn equal_to(value: impl Into<String>) -> Self {
        Self::EqualTo(value.into())
    }

    pub fn containing(value: impl Into<String>) -> Self {
        Self::Contains(value.into())
    }

    pub fn matching(pattern: &str) -> JournalResult<Self> {
        Ok(Self::Matches(full_match(pattern)?))
    }

    pub fn equal_to_json(value: serde_json::Value) -> Self {
        Self::EqualToJson(value)
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        match self {
            Self::EqualTo(expected) => candidate == expected,
            Self::Contains(needle) => candidate.contains(needle.as_str()),
            Self::Matches(regex) => regex.is_match(candidate),
            Self::Absent => false,
            Self::EqualToJson(expected) => serde_json::from_str::<serde_json::Value>(candidate)
                .map(|actual| &actual == expected)
                .unwrap_or(false),
        }
    }
}

/// Matcher for the request url
#[derive(Debug, Clone)]
pub enum UrlPattern {
    Any,
    /// Path and query, exact
    Equal(String),
    /// Path only, exact
    Path(String),
    /// Path and query, whole-string regex
    Regex(Regex),
    /// Path only, whole-string regex
    PathRegex(Regex),
}

impl UrlPattern {
    pub fn regex(pattern: &str) -> JournalResult<Self> {
        Ok(Self::Regex(full_match(pattern)?))
    }

    pub fn path_regex(pattern: &str) -> JournalResult<Self> {
        Ok(Self::PathRegex(full_match(pattern)?))
    }

    pub fn is_match(&self, request: &LoggedRequest) -> bool {
        match self {
            Self::Any => true,
            Self::Equal(url) => request.url == *url,
            Self::Path(path) => request.path() == path,
            Self::Regex(regex) => regex.is_match(&request.url),
            Self::PathRegex(regex) => regex.is_match(request.path()),
        }
    }
}

/// Structural request matcher: method, url, headers and body
#[derive(Debug, Clone)]
pub struct RequestPattern {
    method: Option<String>,
    url: UrlPattern,
    headers: Vec<(String, StringPattern)>,
    body: Option<StringPattern>,
}

impl RequestPattern {
    pub fn new(method: Option<&str>, url: UrlPattern) -> Self {
        Self {
            method: method.map(|m| m.to_ascii_uppercase()),
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Matches every request
    pub fn anything() -> Self {
        Self::new(None, UrlPattern::Any)
    }

    /// Any method, exact url
    pub fn url_equal_to(url: impl Into<String>) -> Self {
        Self::new(None, UrlPattern::Equal(url.into()))
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Some("GET"), UrlPattern::Equal(url.into()))
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Some("POST"), UrlPattern::Equal(url.into()))
    }

    pub fn with_header(mut self, name: impl Into<String>, pattern: StringPattern) -> Self {
        self.headers.push((name.into(), pattern));
        self
    }

    pub fn with_body(mut self, pattern: StringPattern) -> Self {
        self.body = Some(pattern);
        self
    }

    fn method_matches(&self, request: &LoggedRequest) -> bool {
        match &self.method {
            None => true,
            Some(m) if m == "ANY" => true,
            Some(m) => request.method.eq_ignore_ascii_case(m),
        }
    }

    fn body_matches(&self, request: &LoggedRequest) -> bool {
        match &self.body {
            None => true,
            Some(StringPattern::Absent) => request.body.is_empty(),
            Some(pattern) => pattern.is_match(&request.body_as_string()),
        }
    }

    fn headers_match(&self, request: &LoggedRequest) -> bool {
        self.headers.iter().all(|(name, pattern)| {
            let values = request.header_values(name);
            match pattern {
                StringPattern::Absent => values.is_empty(),
                _ => values.iter().any(|v| pattern.is_match(v)),
            }
        })
    }
}

impl RequestPredicate for RequestPattern {
    fn matches(&self, request: &LoggedRequest) -> bool {
        self.method_matches(request)
            && self.url.is_match(request)
            && self.headers_match(request)
            && self.body_matches(request)
    }
}
