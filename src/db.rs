//! A [`RevisionStore`] backed by a Trac-style SQLite `wiki` table.

use crate::{
    Result,
    args::Order,
    revision::{PageRevision, RevisionQuery, RevisionStore},
};
use core::fmt::Write as _;
use rusqlite::{Connection, OpenFlags, Row, params_from_iter, types::Type};
use std::{
    path::{Path, PathBuf},
    time::Instant,
};
use time::OffsetDateTime;

/// The schema of the revision history table.
///
/// `time` is a Unix timestamp in seconds.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS wiki (
    name TEXT NOT NULL,
    version INTEGER NOT NULL,
    time INTEGER,
    author TEXT,
    ipnr TEXT,
    text TEXT,
    comment TEXT,
    readonly INTEGER,
    PRIMARY KEY (name, version)
);

CREATE INDEX IF NOT EXISTS wiki_time_idx ON wiki (time);
";

/// Selects, for each page, the revision with the highest version.
const CURRENT_REVISIONS: &str = "SELECT name, time, author, version, comment FROM wiki AS w1 \
     WHERE version = (SELECT MAX(version) FROM wiki AS w2 WHERE w2.name = w1.name)";

/// Creates the revision history table if it does not already exist.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

/// Builds the SQL text for a query. Each pattern becomes one numbered
/// parameter; no user input is ever written into the SQL text.
pub(crate) fn query_sql(query: &RevisionQuery) -> String {
    let mut sql = String::from(CURRENT_REVISIONS);
    sql += " AND (";
    for index in 1..=query.patterns().len() {
        if index != 1 {
            sql += " OR ";
        }
        // Writing to a `String` is infallible
        let _ = write!(sql, "name GLOB ?{index}");
    }
    sql += ") ORDER BY time";
    if query.order() == Order::Descending {
        sql += " DESC";
    }
    sql += ", name";
    sql
}

/// Converts a result row to a revision.
fn row_to_revision(row: &Row<'_>) -> rusqlite::Result<PageRevision> {
    let time = row.get::<_, Option<i64>>(1)?.unwrap_or_default();
    let time = OffsetDateTime::from_unix_timestamp(time)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(1, Type::Integer, Box::new(err)))?;

    Ok(PageRevision {
        name: row.get(0)?,
        time,
        author: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        version: row.get(3)?,
        comment: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

/// A revision store borrowing a host database connection.
pub struct SqliteStore<'conn> {
    /// The host connection.
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Creates a new store over the given connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RevisionStore for SqliteStore<'_> {
    fn current_revisions(&self, query: &RevisionQuery) -> Result<Vec<PageRevision>> {
        let time = Instant::now();
        let sql = query_sql(query);
        let globs = query.patterns().iter().map(|pattern| pattern.to_glob());

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(globs), row_to_revision)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        log::trace!("Queried {} current revisions in {:.2?}", rows.len(), time.elapsed());
        Ok(rows)
    }
}

/// Manager for pooled connections to a wiki database file.
#[derive(Debug)]
pub struct ConnectionManager {
    /// The path to the database file.
    path: PathBuf,
    /// Connection open flags.
    flags: OpenFlags,
}

impl ConnectionManager {
    /// Creates a new manager which opens read-only connections to an existing
    /// database.
    pub fn read_only(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            flags: OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        }
    }

    /// Creates a new manager which opens read-write connections, creating the
    /// database if it does not exist.
    pub fn read_write(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            flags: OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        }
    }
}

impl r2d2::ManageConnection for ConnectionManager {
    type Connection = Connection;

    type Error = rusqlite::Error;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        log::debug!("Opening connection to {}", self.path.display());
        Connection::open_with_flags(&self.path, self.flags)
    }

    fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        conn.execute_batch("")
    }

    fn has_broken(&self, _: &mut Self::Connection) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, revision::tests::revision};
    use rusqlite::params;

    fn open(revisions: &[PageRevision]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        for r in revisions {
            conn.execute(
                "INSERT INTO wiki (name, version, time, author, comment) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![r.name, r.version, r.time.unix_timestamp(), r.author, r.comment],
            )
            .unwrap();
        }
        conn
    }

    fn fixture() -> Vec<PageRevision> {
        vec![
            revision("X", 1, 100, "alice"),
            revision("X", 2, 200, "bob"),
            revision("X", 3, 300, "carol"),
            revision("Docs/Install", 1, 250, "dave"),
            revision("Docs/Usage", 1, 150, "erin"),
            revision("docs/lowercase", 1, 350, "frank"),
            revision("What?", 1, 50, "gina"),
            revision("Tie", 1, 300, "hal"),
        ]
    }

    #[test]
    fn query_text_uses_parameters() {
        let query = RevisionQuery::new(["A*", "B"], Order::Descending);
        let sql = query_sql(&query);
        assert!(sql.ends_with("AND (name GLOB ?1 OR name GLOB ?2) ORDER BY time DESC, name"));
        assert!(!sql.contains("A*"));

        let sql = query_sql(&RevisionQuery::new(["A*"], Order::Ascending));
        assert!(sql.ends_with("AND (name GLOB ?1) ORDER BY time, name"));
    }

    #[test]
    fn selects_current_version() {
        let conn = open(&fixture());
        let store = SqliteStore::new(&conn);
        let rows = store
            .current_revisions(&RevisionQuery::new(["X"], Order::Descending))
            .unwrap();
        assert_eq!(rows, [revision("X", 3, 300, "carol")]);
    }

    #[test]
    fn agrees_with_memory_store() {
        let fixture = fixture();
        let conn = open(&fixture);
        let sqlite = SqliteStore::new(&conn);
        let memory = fixture.into_iter().collect::<MemoryStore>();

        let cases: &[&[&str]] = &[
            &["*"],
            &["Docs/*"],
            &["docs/*"],
            &["*/*", "X"],
            &["What?"],
            &["Wha?"],
            &["Nothing*"],
        ];

        for patterns in cases {
            for order in [Order::Ascending, Order::Descending] {
                let query = RevisionQuery::new(patterns.iter().copied(), order);
                assert_eq!(
                    sqlite.current_revisions(&query).unwrap(),
                    memory.current_revisions(&query).unwrap(),
                    "{patterns:?} {order:?}"
                );
            }
        }
    }

    #[test]
    fn matching_is_case_sensitive() {
        let conn = open(&fixture());
        let rows = SqliteStore::new(&conn)
            .current_revisions(&RevisionQuery::new(["Docs/*"], Order::Ascending))
            .unwrap();
        let names = rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Docs/Usage", "Docs/Install"]);
    }

    #[test]
    fn injection_is_inert() {
        let conn = open(&fixture());
        let store = SqliteStore::new(&conn);
        for pattern in [r#"" OR 1=1 --"#, "' OR '1'='1", "*') OR (1=1"] {
            let rows = store
                .current_revisions(&RevisionQuery::new([pattern], Order::Descending))
                .unwrap();
            assert!(rows.is_empty(), "{pattern}");
        }
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM wiki", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 8);
    }

    #[test]
    fn null_columns_read_as_empty() {
        let conn = open(&[]);
        conn.execute(
            "INSERT INTO wiki (name, version, time) VALUES ('Bare', 1, 10)",
            [],
        )
        .unwrap();
        let rows = SqliteStore::new(&conn)
            .current_revisions(&RevisionQuery::new(["Bare"], Order::Descending))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].author, "");
        assert_eq!(rows[0].comment, "");
    }

    #[test]
    fn missing_table_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteStore::new(&conn)
            .current_revisions(&RevisionQuery::new(["*"], Order::Descending))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Database(_)));
    }

    #[test]
    fn pooled_connections() {
        let dir = std::env::temp_dir().join(format!("wiki-status-list-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pool.db");
        let _ = std::fs::remove_file(&path);

        let writer = r2d2::Pool::builder()
            .max_size(1)
            .build(ConnectionManager::read_write(&path))
            .unwrap();
        {
            let conn = writer.get().unwrap();
            init_schema(&conn).unwrap();
            conn.execute(
                "INSERT INTO wiki (name, version, time, author, comment) VALUES ('P', 1, 1, 'a', '')",
                [],
            )
            .unwrap();
        }
        drop(writer);

        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(ConnectionManager::read_only(&path))
            .unwrap();
        let conn = pool.get().unwrap();
        let rows = SqliteStore::new(&conn)
            .current_revisions(&RevisionQuery::new(["*"], Order::Descending))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(conn.execute("DELETE FROM wiki", []).is_err());

        drop(conn);
        drop(pool);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
