//! Page name wildcard patterns.
//!
//! In a pattern, `*` matches any (possibly empty) run of characters. Every
//! other character matches only itself, case-sensitively, and a pattern must
//! match the entire page name.

use std::borrow::Cow;

/// A page name pattern from the macro arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamePattern(String);

impl NamePattern {
    /// The pattern which matches every page.
    pub fn any() -> Self {
        Self("*".to_string())
    }

    /// Creates a new pattern from user input.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// The pattern as written by the user.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the page name matches this pattern.
    pub fn matches(&self, name: &str) -> bool {
        let mut parts = self.0.split('*');
        // `split` always yields at least one item
        let first = parts.next().unwrap_or_default();
        let Some(mut rest) = name.strip_prefix(first) else {
            return false;
        };

        let mut parts = parts.peekable();
        if parts.peek().is_none() {
            return rest.is_empty();
        }

        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                // The final literal has to anchor to the end; everything
                // before it was consumed by a wildcard
                return rest.ends_with(part);
            }

            match rest.find(part) {
                Some(index) => rest = &rest[index + part.len()..],
                None => return false,
            }
        }

        true
    }

    /// Translates the pattern into an SQLite `GLOB` expression.
    ///
    /// `*` is passed through as the GLOB wildcard. The other GLOB
    /// metacharacters `?` and `[` are wrapped in a character class so that
    /// they only match themselves. The result must still be bound as a query
    /// parameter, never interpolated into SQL text.
    pub fn to_glob(&self) -> Cow<'_, str> {
        if !self.0.contains(['?', '[']) {
            return Cow::Borrowed(&self.0);
        }

        let mut glob = String::with_capacity(self.0.len() + 4);
        for c in self.0.chars() {
            match c {
                '?' => glob += "[?]",
                '[' => glob += "[[]",
                c => glob.push(c),
            }
        }
        Cow::Owned(glob)
    }
}

impl From<&str> for NamePattern {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
