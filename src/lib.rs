//! A wiki macro which renders a table of the current revision of every page
//! whose name matches one of a set of wildcard patterns.
//!
//! Usage inside wiki text:
//!
//! ```text
//! [[WikiStatusList(Docs/*, Release*, order=reverse, pagename=short)]]
//! ```
//!
//! The crate does not own a wiki. Revision history, URL construction, the
//! current time and stylesheet registration are provided by the host through
//! the ports in [`host`], [`href`] and [`revision`]. A SQLite implementation of the revision store
//! for a Trac-style `wiki` table lives in [`db`], and the `wiki-status-list`
//! binary is a minimal host which wires all of it together.

use core::fmt;

pub mod args;
pub mod datefmt;
pub mod db;
pub mod host;
pub mod href;
pub mod pattern;
pub mod render;
pub mod resource;
pub mod revision;
pub mod status_list;

pub use args::{MacroArgs, Options, Order, PageNameMode};
pub use host::{Chrome, MacroContext, RequestFilter, StaticFile, TemplateProvider, WikiMacro};
pub use href::{Href, LinkBuilder};
pub use revision::{MemoryStore, PageRevision, RevisionQuery, RevisionStore};
pub use status_list::WikiStatusList;

/// A macro expansion error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A revision store query failed.
    #[error("db error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A write to a buffer failed.
    #[error("fmt error: {0}")]
    Fmt(#[from] fmt::Error),

    /// A `key=value` macro argument had no key.
    #[error("malformed macro option '{0}': missing option name")]
    MalformedOption(String),

    /// A non-SQLite revision store failed.
    #[error(transparent)]
    Store(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// A timestamp could not be formatted.
    #[error(transparent)]
    Time(#[from] time::error::Format),

    /// A timestamp from the store was outside of the representable range.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] time::error::ComponentRange),
}

/// The standard result type used by all fallible macro functions.
pub type Result<T = (), E = Error> = core::result::Result<T, E>;
