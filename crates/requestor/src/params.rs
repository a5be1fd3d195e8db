//! Request parameter builders
//!
//! [`Header`], [`QueryString`] and [`RoutingRule`] accumulate key-value or
//! ordered path data and render it to the string fragment a commit appends
//! to its target URL. [`FormData`] collects named text fields for multipart
//! POST payloads.

use std::fmt;

/// Headers merged beneath caller entries on every request
const DEFAULT_HEADERS: [(&str, &str); 3] = [
    ("Content-Type", "application/json"),
    ("Cache-Control", "no-cache"),
    ("Pragma", "no-cache"),
];

/// Insertion-ordered request headers
///
/// The transmission snapshot returned by [`Header::entries`] always contains
/// `Content-Type`, `Cache-Control` and `Pragma` defaults unless a caller
/// entry with the same key overrides them.
#[derive(Debug, Clone, Default)]
pub struct Header {
    entries: Vec<(String, String)>,
}

impl Header {
    /// Create an empty header set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, chainable
    ///
    /// Appending a key that is already present replaces its value in place,
    /// keeping the original insertion position.
    pub fn append(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace an entry
    ///
    /// This is the mutation contract the refresh replay path uses to install
    /// the renewed `Authorization` value on the original commit.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Current value for a key, defaults excluded
    pub fn value(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Transmission snapshot: the defaults merged beneath caller entries
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        for (key, value) in &self.entries {
            match merged.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value.clone(),
                None => merged.push((key.clone(), value.clone())),
            }
        }
        merged
    }
}

/// Insertion-ordered query string, rendered as `?k=v&k=v`
#[derive(Debug, Clone, Default)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Create an empty query string
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair, chainable; a repeated key replaces its value in place
    pub fn append(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }
}

impl fmt::Display for QueryString {
    /// Renders `?k=v&k=v`, stripping exactly one trailing `&` separator
    ///
    /// An empty set renders as just the leading `?` marker.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::from("?");
        for (key, value) in &self.pairs {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('&');
        }
        if out.ends_with('&') {
            out.pop();
        }
        f.write_str(&out)
    }
}

/// Ordered path segments, rendered as `seg/seg`
///
/// The rendering is appended verbatim to `base_url + api_url`, exactly like
/// a query string; the commit inserts no separator of its own.
#[derive(Debug, Clone, Default)]
pub struct RoutingRule {
    segments: Vec<String>,
}

impl RoutingRule {
    /// Create an empty routing rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path segment, chainable
    pub fn append(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }
}

impl fmt::Display for RoutingRule {
    /// Renders `seg/seg`, stripping exactly one trailing `/` separator
    ///
    /// An empty sequence renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(segment);
            out.push('/');
        }
        if out.ends_with('/') {
            out.pop();
        }
        f.write_str(&out)
    }
}

/// Ordered multipart text fields for a POST payload
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, chainable; repeated names are allowed
    pub fn append(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub(crate) fn to_multipart(&self) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_starts_with_marker_and_has_no_trailing_separator() {
        let qs = QueryString::new().append("page", "1").append("size", "20");
        let rendered = qs.to_string();
        assert!(rendered.starts_with('?'));
        assert!(!rendered.ends_with('&'));
        assert_eq!(rendered, "?page=1&size=20");
    }

    #[test]
    fn empty_query_string_renders_the_marker_alone() {
        assert_eq!(QueryString::new().to_string(), "?");
    }

    #[test]
    fn query_string_repeated_key_replaces_in_place() {
        let qs = QueryString::new()
            .append("a", "1")
            .append("b", "2")
            .append("a", "3");
        assert_eq!(qs.to_string(), "?a=3&b=2");
    }

    #[test]
    fn routing_rule_has_no_trailing_slash() {
        let rr = RoutingRule::new().append("users").append("42");
        assert_eq!(rr.to_string(), "users/42");
    }

    #[test]
    fn empty_routing_rule_renders_empty() {
        assert_eq!(RoutingRule::new().to_string(), "");
    }

    #[test]
    fn header_snapshot_contains_defaults() {
        let entries = Header::new().entries();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["Content-Type", "Cache-Control", "Pragma"]);
    }

    #[test]
    fn header_caller_entry_overrides_default() {
        let header = Header::new().append("Content-Type", "text/plain");
        let entries = header.entries();
        let content_type = entries
            .iter()
            .find(|(k, _)| k == "Content-Type")
            .map(|(_, v)| v.as_str());
        assert_eq!(content_type, Some("text/plain"));
        assert_eq!(
            entries.iter().filter(|(k, _)| k == "Content-Type").count(),
            1
        );
    }

    #[test]
    fn header_set_replaces_and_value_reads_back() {
        let mut header = Header::new().append("Authorization", "Bearer old");
        header.set("Authorization", "Bearer new");
        assert_eq!(header.value("Authorization"), Some("Bearer new"));
        assert_eq!(header.value("X-Missing"), None);
    }

    #[test]
    fn header_value_does_not_expose_defaults() {
        assert_eq!(Header::new().value("Content-Type"), None);
    }
}
