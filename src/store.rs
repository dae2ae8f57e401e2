//! SQLite persistence for the aggregate tables.
//!
//! Tables are replaced wholesale: every write drops the previous table of the
//! same name, recreates it and inserts all rows inside one transaction. Each
//! successful write also bumps `PRAGMA user_version`, which readers use as the
//! data version token for cache invalidation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use tracing::{debug, info, warn};

use crate::table::Table;

/// Storage class of a persisted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
}

impl Column {
    pub const fn new(name: &'static str, sql_type: SqlType) -> Self {
        Self { name, sql_type }
    }
}

/// A row type that can be written to the store.
pub trait Record {
    /// Persisted columns, in table order.
    const COLUMNS: &'static [Column];

    /// This row's values, in the same order as [`Record::COLUMNS`].
    fn values(&self) -> Vec<Value>;

    fn column_names() -> Vec<&'static str> {
        Self::COLUMNS.iter().map(|c| c.name).collect()
    }
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the store at `path`, creating parent folders.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        debug!(path = %path.display(), "Opened database");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Replaces table `name` with `rows` and returns how many rows were written.
    ///
    /// An empty `rows` leaves any existing table untouched and writes nothing.
    #[tracing::instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn replace_table<R: Record>(&mut self, name: &str, rows: &[R]) -> Result<usize> {
        if rows.is_empty() {
            warn!(table = name, "Skipping table, no data");
            return Ok(0);
        }

        let table = quote_ident(name);
        let column_defs = R::COLUMNS
            .iter()
            .map(|c| format!("{} {}", quote_ident(c.name), c.sql_type.as_sql()))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; R::COLUMNS.len()].join(", ");

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({column_defs});"
        ))
        .with_context(|| format!("failed to recreate table {name}"))?;
        {
            let mut insert = tx.prepare(&format!("INSERT INTO {table} VALUES ({placeholders})"))?;
            for row in rows {
                insert
                    .execute(params_from_iter(row.values()))
                    .with_context(|| format!("failed to insert into {name}"))?;
            }
        }
        let version: i64 = tx.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        tx.execute_batch(&format!("PRAGMA user_version = {}", version + 1))?;
        tx.commit()?;

        info!(table = name, rows = rows.len(), "Saved rows to table");
        Ok(rows.len())
    }

    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Names of all tables in the store, sorted.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Token that changes every time a table is written.
    pub fn data_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Runs a read query and collects its full result.
    pub fn query(&self, sql: &str) -> Result<Table> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .with_context(|| format!("failed to prepare query: {sql}"))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Table { columns, rows })
    }
}

/// Quotes an SQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
