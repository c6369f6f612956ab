//! HTTP requests and responses described as plain data.
//!
//! # Design
//! `HttpRequest` is what the dispatcher hands to a `Transport`; `Response` is
//! what comes back. Neither type knows how to perform I/O, which keeps
//! request resolution and every assertion testable without a network.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
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

    /// Whether leftover payload entries travel in the body rather than the
    /// query string.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header list with case-insensitive names.
///
/// Equality ignores order and name case but compares values exactly.
#[derive(Debug, Clone, Default)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any existing entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Append without replacing, for multi-valued response headers.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Overlay `other` on top of `self`; entries in `other` win.
    pub fn merge(&mut self, other: &Headers) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Headers {
    /// Entries with lowercased names, sorted, for order-free comparison.
    fn normalized(&self) -> Vec<(String, &str)> {
        let mut entries: Vec<_> = self
            .iter()
            .map(|(n, v)| (n.to_ascii_lowercase(), v))
            .collect();
        entries.sort_unstable();
        entries
    }
}

impl PartialEq for Headers {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.normalized() == other.normalized()
    }
}

impl Eq for Headers {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Headers {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A fully resolved request, ready for a transport to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Headers,
    pub body: Option<String>,
}

/// The response exactly as the transport produced it.
///
/// The body is kept as raw bytes; [`Response::json`] parses it on every call
/// so repeated checks on the same response always see the same input.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: Headers, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_displays_as_verb() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert!(HttpMethod::Put.carries_body());
        assert!(!HttpMethod::Get.carries_body());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let headers = Headers::from([("Content-Type", "application/json")]);
        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert!(headers.get("accept").is_none());
    }

    #[test]
    fn insert_replaces_regardless_of_case() {
        let mut headers = Headers::from([("Accept", "text/plain")]);
        headers.insert("accept", "application/json");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Accept"), Some("application/json"));
    }

    #[test]
    fn append_keeps_duplicates() {
        let mut headers = Headers::new();
        headers.append("set-cookie", "a=1");
        headers.append("set-cookie", "b=2");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("set-cookie"), Some("a=1"));
    }

    #[test]
    fn merge_prefers_overlay() {
        let mut base = Headers::from([("accept", "application/json"), ("api_key", "a")]);
        base.merge(&Headers::from([("API_KEY", "b")]));
        assert_eq!(base.get("api_key"), Some("b"));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn equality_ignores_order_and_name_case() {
        let a = Headers::from([("A", "1"), ("b", "2")]);
        let b = Headers::from([("B", "2"), ("a", "1")]);
        assert_eq!(a, b);
        assert_ne!(a, Headers::from([("a", "1"), ("b", "3")]));
        assert_ne!(a, Headers::from([("a", "1")]));
    }

    #[test]
    fn equality_counts_duplicate_names() {
        let mut a = Headers::new();
        a.append("x", "1");
        a.append("x", "1");
        let b = Headers::from([("x", "1"), ("y", "1")]);
        assert_ne!(a, b);
        assert_ne!(b, a);

        let mut c = Headers::new();
        c.append("X", "1");
        c.append("x", "1");
        assert_eq!(a, c);
    }

    #[test]
    fn response_json_is_reparsed_each_call() {
        let response = Response::new(200, Headers::new(), r#"{"id":1}"#);
        let first = response.json().unwrap();
        let second = response.json().unwrap();
        assert_eq!(first, second);
        assert_eq!(first["id"], 1);
    }

    #[test]
    fn response_text_is_lossy() {
        let response = Response::new(200, Headers::new(), vec![b'o', b'k', 0xff]);
        assert_eq!(response.text(), "ok\u{fffd}");
    }
}
