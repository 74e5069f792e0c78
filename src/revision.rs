//! Wiki page revisions and the current-revision query.

use crate::{Result, args::Order, pattern::NamePattern};
use std::{cmp::Ordering, collections::HashMap};
use time::OffsetDateTime;

/// One saved version of a wiki page.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageRevision {
    /// The page name. May contain `/`.
    pub name: String,
    /// The time the revision was saved.
    pub time: OffsetDateTime,
    /// The author of the revision.
    pub author: String,
    /// The revision number, starting from 1.
    pub version: u32,
    /// The change comment. May be empty.
    pub comment: String,
}

/// A query for the current revisions of a set of pages.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevisionQuery {
    /// Name patterns. A page is selected if any of them matches.
    patterns: Vec<NamePattern>,
    /// The sort direction by time.
    order: Order,
}

impl RevisionQuery {
    /// Creates a new query. An empty list of patterns selects every page.
    pub fn new<I>(patterns: I, order: Order) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NamePattern>,
    {
        let mut patterns = patterns.into_iter().map(Into::into).collect::<Vec<_>>();
        if patterns.is_empty() {
            patterns.push(NamePattern::any());
        }
        Self { patterns, order }
    }

    /// The name patterns. Never empty.
    pub fn patterns(&self) -> &[NamePattern] {
        &self.patterns
    }

    /// The sort direction by time.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Returns true if the page name matches any of the patterns.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(name))
    }

    /// Compares two revisions by time in the requested direction. Ties are
    /// broken by name so that the order is total.
    pub fn compare(&self, lhs: &PageRevision, rhs: &PageRevision) -> Ordering {
        let by_time = match self.order {
            Order::Ascending => lhs.time.cmp(&rhs.time),
            Order::Descending => rhs.time.cmp(&lhs.time),
        };
        by_time.then_with(|| lhs.name.cmp(&rhs.name))
    }

    /// Runs the query over an arbitrary collection of revisions.
    pub fn apply<I>(&self, revisions: I) -> Vec<PageRevision>
    where
        I: IntoIterator<Item = PageRevision>,
    {
        let mut current = select_current(revisions.into_iter().filter(|r| self.matches(&r.name)));
        current.sort_by(|lhs, rhs| self.compare(lhs, rhs));
        current
    }
}

/// Reduces a collection of revisions to the one with the highest version for
/// each page name. The output order is unspecified.
pub fn select_current<I>(revisions: I) -> Vec<PageRevision>
where
    I: IntoIterator<Item = PageRevision>,
{
    let mut current = HashMap::<String, PageRevision>::new();
    for revision in revisions {
        match current.get(&revision.name) {
            Some(existing) if existing.version >= revision.version => {}
            _ => {
                current.insert(revision.name.clone(), revision);
            }
        }
    }
    current.into_values().collect()
}

/// A source of page revision history.
pub trait RevisionStore {
    /// Returns the current revision of every page matched by the query,
    /// sorted according to [`RevisionQuery::compare`].
    fn current_revisions(&self, query: &RevisionQuery) -> Result<Vec<PageRevision>>;
}

/// A revision store held entirely in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    /// Every revision of every page.
    revisions: Vec<PageRevision>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a revision to the store.
    pub fn insert(&mut self, revision: PageRevision) {
        self.revisions.push(revision);
    }
}

impl FromIterator<PageRevision> for MemoryStore {
    fn from_iter<T: IntoIterator<Item = PageRevision>>(iter: T) -> Self {
        Self {
            revisions: iter.into_iter().collect(),
        }
    }
}

impl RevisionStore for MemoryStore {
    fn current_revisions(&self, query: &RevisionQuery) -> Result<Vec<PageRevision>> {
        Ok(query.apply(self.revisions.iter().cloned()))
    }
}
