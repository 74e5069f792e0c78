//! Host URL construction.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters to percent-encode in a path. Path separators are kept so that
/// hierarchical page names map to hierarchical URLs.
const PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Characters to percent-encode in a query string key or value.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builds URLs to host pages.
///
/// All returned URLs are raw and must be attribute-escaped before being
/// written into HTML.
pub trait LinkBuilder {
    /// The current version of a wiki page.
    fn wiki(&self, name: &str) -> String;

    /// A specific version of a wiki page.
    fn wiki_version(&self, name: &str, version: u32) -> String;

    /// The difference between a version of a wiki page and its predecessor.
    fn wiki_diff(&self, name: &str, version: u32) -> String;

    /// The revision history of a wiki page.
    fn wiki_history(&self, name: &str) -> String;

    /// The timeline starting at a given ISO 8601 timestamp, at one second
    /// precision.
    fn timeline_from(&self, iso8601: &str) -> String;
}

/// A [`LinkBuilder`] for a host mounted at a given base path.
#[derive(Clone, Debug, Default)]
pub struct Href {
    /// The base path, without a trailing slash.
    base: String,
}

impl Href {
    /// Creates a new URL builder rooted at the given base path, e.g. `/trac`.
    /// An empty base path refers to the server root.
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// The base path, without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Joins path segments and query parameters onto the base path.
    pub fn build(&self, path: &[&str], params: &[(&str, &str)]) -> String {
        let mut url = self.base.clone();
        for segment in path {
            let segment = segment.trim_matches('/');
            if !segment.is_empty() {
                url.push('/');
                url.extend(utf8_percent_encode(segment, PATH));
            }
        }

        if url.is_empty() {
            url.push('/');
        }

        for (index, (key, value)) in params.iter().enumerate() {
            url.push(if index == 0 { '?' } else { '&' });
            url.extend(utf8_percent_encode(key, QUERY));
            url.push('=');
            url.extend(utf8_percent_encode(value, QUERY));
        }

        url
    }
}

impl LinkBuilder for Href {
    fn wiki(&self, name: &str) -> String {
        self.build(&["wiki", name], &[])
    }

    fn wiki_version(&self, name: &str, version: u32) -> String {
        self.build(&["wiki", name], &[("version", &version.to_string())])
    }

    fn wiki_diff(&self, name: &str, version: u32) -> String {
        self.build(
            &["wiki", name],
            &[("action", "diff"), ("version", &version.to_string())],
        )
    }

    fn wiki_history(&self, name: &str) -> String {
        self.build(&["wiki", name], &[("action", "history")])
    }

    fn timeline_from(&self, iso8601: &str) -> String {
        self.build(&["timeline"], &[("precision", "seconds"), ("from", iso8601)])
    }
}
