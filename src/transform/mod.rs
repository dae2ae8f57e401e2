//! Flattening of match documents into the persisted fact tables.
//!
//! Each builder walks the typed documents once and groups in memory. Rates
//! derived from a zero denominator are `None`, stored as NULL.

pub mod batting;
pub mod bowling;
pub mod matches;
pub mod rates;
pub mod team_results;

pub use batting::{BattingRow, build_batting};
pub use bowling::{BowlingRow, build_bowling};
pub use matches::{MatchRow, build_matches, format_team_list, parse_team_list};
pub use team_results::{NoResultPolicy, TeamResultRow, TeamResults, build_team_results};

use crate::document::MatchDocument;

/// All aggregate tables for one format.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatTables {
    pub matches: Vec<MatchRow>,
    pub batting: Vec<BattingRow>,
    pub bowling: Vec<BowlingRow>,
    pub team_results: TeamResults,
}

impl FormatTables {
    pub fn build(documents: &[MatchDocument], policy: NoResultPolicy) -> Self {
        Self {
            matches: build_matches(documents),
            batting: build_batting(documents),
            bowling: build_bowling(documents),
            team_results: build_team_results(documents, policy),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
            && self.batting.is_empty()
            && self.bowling.is_empty()
            && self.team_results.rows.is_empty()
    }
}
