//! Interfaces between the macro and the wiki which hosts it.

use crate::{Result, href::LinkBuilder, revision::RevisionStore};
use time::{OffsetDateTime, UtcOffset};

/// Host capabilities available while expanding a macro for one request.
#[derive(Clone, Copy)]
pub struct MacroContext<'a> {
    /// Builds URLs to host pages.
    pub href: &'a dyn LinkBuilder,
    /// The revision history of the wiki.
    pub store: &'a dyn RevisionStore,
    /// The time of the request. Relative times are measured from here.
    pub now: OffsetDateTime,
    /// The time zone of the user.
    pub tz: UtcOffset,
}

impl<'a> MacroContext<'a> {
    /// Creates a new context for a UTC user.
    pub fn new(
        href: &'a dyn LinkBuilder,
        store: &'a dyn RevisionStore,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            href,
            store,
            now,
            tz: UtcOffset::UTC,
        }
    }

    /// Sets the time zone of the user.
    #[must_use]
    pub fn with_tz(mut self, tz: UtcOffset) -> Self {
        self.tz = tz;
        self
    }
}

/// A macro which can be invoked from wiki text.
pub trait WikiMacro {
    /// The name used to invoke the macro.
    fn name(&self) -> &'static str;

    /// Usage documentation for the macro, as wiki text.
    fn description(&self) -> &'static str;

    /// Expands the macro to HTML. `content` is the raw text between the
    /// parentheses of the macro call, if there were any.
    fn expand(&self, ctx: &MacroContext<'_>, content: Option<&str>) -> Result<String>;
}

/// Assets to add to a single rendered response.
#[derive(Debug, Default)]
pub struct Chrome {
    /// Stylesheet paths, relative to the host's static asset root, in the
    /// order they were first added.
    stylesheets: Vec<String>,
}

impl Chrome {
    /// Creates an empty asset list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stylesheet, e.g. `"wikistatuslist/style.css"`. Adding the same
    /// stylesheet more than once has no effect.
    pub fn add_stylesheet(&mut self, path: &str) {
        if !self.stylesheets.iter().any(|s| s == path) {
            self.stylesheets.push(path.to_string());
        }
    }

    /// The stylesheets to link from the response.
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }
}

/// A hook which runs after the host has handled a request, before the
/// response is rendered.
pub trait RequestFilter {
    /// Adjusts the assets of the response.
    fn post_process_request(&self, chrome: &mut Chrome);
}

/// One file in a static asset directory.
#[derive(Clone, Copy, Debug)]
pub struct StaticFile {
    /// The path of the file, relative to its directory.
    pub path: &'static str,
    /// The file contents.
    pub data: &'static [u8],
}

/// A provider of static asset directories.
pub trait TemplateProvider {
    /// Returns `(prefix, files)` pairs. The host serves each file under
    /// `{prefix}/{path}`.
    fn htdocs_dirs(&self) -> Vec<(&'static str, &'static [StaticFile])>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_deduplicates() {
        let mut chrome = Chrome::new();
        chrome.add_stylesheet("a/style.css");
        chrome.add_stylesheet("b/style.css");
        chrome.add_stylesheet("a/style.css");
        assert_eq!(chrome.stylesheets(), ["a/style.css", "b/style.css"]);
    }
}
