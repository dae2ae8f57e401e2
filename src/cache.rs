//! Query result cache keyed by SQL text and validated against the store's
//! data version.
//!
//! Every table write bumps the version, so a cached result is only served
//! while no ETL run has touched the store since it was read.

use std::collections::HashMap;

use anyhow::Result;
use tracing::debug;

use crate::store::Store;
use crate::table::Table;

struct Entry {
    version: i64,
    table: Table,
}

#[derive(Default)]
pub struct QueryCache {
    entries: HashMap<String, Entry>,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the result of `sql`, re-running it if the store changed since
    /// the cached copy was taken.
    pub fn get_or_query(&mut self, store: &Store, sql: &str) -> Result<&Table> {
        let version = store.data_version()?;
        let fresh = self
            .entries
            .get(sql)
            .is_some_and(|entry| entry.version == version);

        if fresh {
            self.hits += 1;
            debug!(version, "Query cache hit");
        } else {
            self.misses += 1;
            debug!(version, "Query cache miss");
            let table = store.query(sql)?;
            self.entries.insert(sql.to_string(), Entry { version, table });
        }

        Ok(&self.entries[sql].table)
    }

    /// Drops every cached result.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
