use rusqlite::types::Value;
use serde::Serialize;

use crate::document::MatchDocument;
use crate::store::{Column, Record, SqlType};

/// One row of `<format>_matches`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub match_id: Option<String>,
    pub format: Option<String>,
    pub teams: Option<String>,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub toss_winner: Option<String>,
    pub match_winner: Option<String>,
}

impl MatchRow {
    pub fn from_document(doc: &MatchDocument) -> Self {
        let info = &doc.info;
        MatchRow {
            match_id: doc.match_id.clone(),
            format: info.match_type.clone(),
            teams: info.teams.as_deref().map(format_team_list),
            venue: info.venue.clone(),
            date: info.first_date().map(|d| d.format("%Y-%m-%d").to_string()),
            toss_winner: info.toss_winner().map(str::to_string),
            match_winner: info.winner().map(str::to_string),
        }
    }
}

impl Record for MatchRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("match_id", SqlType::Text),
        Column::new("format", SqlType::Text),
        Column::new("teams", SqlType::Text),
        Column::new("venue", SqlType::Text),
        Column::new("date", SqlType::Text),
        Column::new("toss_winner", SqlType::Text),
        Column::new("match_winner", SqlType::Text),
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.match_id.clone()),
            Value::from(self.format.clone()),
            Value::from(self.teams.clone()),
            Value::from(self.venue.clone()),
            Value::from(self.date.clone()),
            Value::from(self.toss_winner.clone()),
            Value::from(self.match_winner.clone()),
        ]
    }
}

/// One row per document, in document order.
pub fn build_matches(documents: &[MatchDocument]) -> Vec<MatchRow> {
    documents.iter().map(MatchRow::from_document).collect()
}

/// Renders a team list as a list literal, e.g. `['India', 'Australia']`.
///
/// Names containing a single quote are wrapped in double quotes instead.
pub fn format_team_list(teams: &[String]) -> String {
    let items = teams
        .iter()
        .map(|team| {
            if team.contains('\'') && !team.contains('"') {
                format!("\"{team}\"")
            } else {
                format!("'{}'", team.replace('\'', "\\'"))
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{items}]")
}

/// Inverse of [`format_team_list`]. Anything that is not a list literal yields
/// no teams.
pub fn parse_team_list(s: &str) -> Vec<String> {
    let s = s.trim();
    let Some(inner) = s.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) else {
        return Vec::new();
    };

    let mut teams = Vec::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        let quote = match c {
            '\'' | '"' => c,
            _ => continue,
        };
        let mut name = String::new();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        name.push(escaped);
                    }
                }
                c if c == quote => break,
                c => name.push(c),
            }
        }
        teams.push(name);
    }
    teams
}
