//! Read side for consumers of the persisted tables (reports, exports,
//! dashboards).
//!
//! Missing tables read as empty tables that still carry the expected columns,
//! so callers never have to special-case a format that produced no data.

use anyhow::Result;
use rusqlite::types::Value;

use crate::cache::QueryCache;
use crate::format::MatchFormat;
use crate::store::{Record, Store, quote_ident};
use crate::table::Table;
use crate::transform::{BattingRow, BowlingRow, MatchRow, TeamResultRow, parse_team_list};

pub struct Reader<'a> {
    store: &'a Store,
    cache: QueryCache,
}

impl<'a> Reader<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            cache: QueryCache::new(),
        }
    }

    pub fn store(&self) -> &Store {
        self.store
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Runs `sql` through the cache.
    pub fn read_sql(&mut self, sql: &str) -> Result<Table> {
        Ok(self.cache.get_or_query(self.store, sql)?.clone())
    }

    /// Full contents of table `name`, or `None` if it was never written.
    pub fn read_table(&mut self, name: &str) -> Result<Option<Table>> {
        if !self.store.table_exists(name)? {
            return Ok(None);
        }
        let sql = format!("SELECT * FROM {}", quote_ident(name));
        self.read_sql(&sql).map(Some)
    }

    fn read_or_empty(&mut self, name: &str, columns: &[&str]) -> Result<Table> {
        Ok(self
            .read_table(name)?
            .unwrap_or_else(|| Table::empty(columns)))
    }

    pub fn load_matches(&mut self, format: MatchFormat) -> Result<Table> {
        self.read_or_empty(&format.matches_table(), &MatchRow::column_names())
    }

    pub fn load_batting(&mut self, format: MatchFormat) -> Result<Table> {
        self.read_or_empty(&format.batting_table(), &BattingRow::column_names())
    }

    pub fn load_bowling(&mut self, format: MatchFormat) -> Result<Table> {
        self.read_or_empty(&format.bowling_table(), &BowlingRow::column_names())
    }

    pub fn load_team_results(&mut self, format: MatchFormat) -> Result<Table> {
        self.read_or_empty(&format.team_results_table(), &TeamResultRow::column_names())
    }

    /// Formats whose matches table exists, in processing order.
    pub fn available_formats(&self) -> Result<Vec<MatchFormat>> {
        let mut formats = Vec::new();
        for format in MatchFormat::ALL {
            if self.store.table_exists(&format.matches_table())? {
                formats.push(format);
            }
        }
        Ok(formats)
    }
}

/// Client-side filter over match rows: an inclusive year range on `date` and
/// membership of a team in `teams`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
    pub team: Option<String>,
}

impl MatchFilter {
    pub fn is_empty(&self) -> bool {
        self.from_year.is_none() && self.to_year.is_none() && self.team.is_none()
    }

    /// Keeps the rows of a matches table that pass the filter. Rows with no
    /// date are dropped once a year bound is set.
    pub fn apply(&self, table: &mut Table) {
        if self.is_empty() {
            return;
        }
        let date_idx = table.column_index("date");
        let teams_idx = table.column_index("teams");

        table.retain_rows(|row| {
            let year = date_idx.and_then(|i| row_year(&row[i]));
            if self.from_year.is_some() || self.to_year.is_some() {
                let Some(year) = year else {
                    return false;
                };
                if self.from_year.is_some_and(|from| year < from)
                    || self.to_year.is_some_and(|to| year > to)
                {
                    return false;
                }
            }
            if let Some(team) = &self.team {
                let plays = teams_idx.is_some_and(|i| match &row[i] {
                    Value::Text(teams) => parse_team_list(teams).iter().any(|t| t == team),
                    _ => false,
                });
                if !plays {
                    return false;
                }
            }
            true
        });
    }
}

fn row_year(value: &Value) -> Option<i32> {
    match value {
        Value::Text(date) => date.get(..4)?.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_row(id: &str, date: Option<&str>, teams: &[&str]) -> MatchRow {
        let teams: Vec<String> = teams.iter().map(|t| t.to_string()).collect();
        MatchRow {
            match_id: Some(id.to_string()),
            format: Some("ODI".to_string()),
            teams: Some(crate::transform::format_team_list(&teams)),
            venue: Some("Eden Gardens".to_string()),
            date: date.map(str::to_string),
            toss_winner: None,
            match_winner: None,
        }
    }

    fn seeded_store() -> Store {
        let mut store = Store::open_in_memory().unwrap();
        store
            .replace_table(
                "odi_matches",
                &[
                    match_row("1", Some("2010-02-01"), &["India", "Pakistan"]),
                    match_row("2", Some("2015-06-01"), &["England", "India"]),
                    match_row("3", Some("2020-01-01"), &["England", "Australia"]),
                    match_row("4", None, &["India", "Australia"]),
                ],
            )
            .unwrap();
        store
    }

    fn ids(table: &Table) -> Vec<String> {
        (0..table.len())
            .map(|i| match table.get(i, "match_id") {
                Some(Value::Text(id)) => id.clone(),
                other => panic!("unexpected match_id {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_missing_table_reads_as_empty_with_schema() {
        let store = Store::open_in_memory().unwrap();
        let mut reader = Reader::new(&store);

        let batting = reader.load_batting(MatchFormat::T20).unwrap();
        assert!(batting.is_empty());
        assert_eq!(
            batting.columns,
            vec!["batter", "team", "runs", "ball", "four", "six", "strike_rate"]
        );
        assert!(reader.read_table("batting_stats_t20").unwrap().is_none());
    }

    #[test]
    fn test_available_formats() {
        let store = seeded_store();
        let reader = Reader::new(&store);
        assert_eq!(reader.available_formats().unwrap(), vec![MatchFormat::Odi]);
    }

    #[test]
    fn test_repeated_loads_hit_the_cache() {
        let store = seeded_store();
        let mut reader = Reader::new(&store);

        let first = reader.load_matches(MatchFormat::Odi).unwrap();
        let second = reader.load_matches(MatchFormat::Odi).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        assert_eq!(reader.cache().hits(), 1);
    }

    #[test]
    fn test_filter_by_year_range() {
        let store = seeded_store();
        let mut reader = Reader::new(&store);
        let mut matches = reader.load_matches(MatchFormat::Odi).unwrap();

        MatchFilter {
            from_year: Some(2011),
            to_year: Some(2020),
            team: None,
        }
        .apply(&mut matches);

        assert_eq!(ids(&matches), vec!["2", "3"]);
    }

    #[test]
    fn test_filter_by_team() {
        let store = seeded_store();
        let mut reader = Reader::new(&store);
        let mut matches = reader.load_matches(MatchFormat::Odi).unwrap();

        MatchFilter {
            team: Some("India".to_string()),
            ..Default::default()
        }
        .apply(&mut matches);

        assert_eq!(ids(&matches), vec!["1", "2", "4"]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let store = seeded_store();
        let mut reader = Reader::new(&store);
        let mut matches = reader.load_matches(MatchFormat::Odi).unwrap();

        MatchFilter::default().apply(&mut matches);
        assert_eq!(matches.len(), 4);
    }
}
