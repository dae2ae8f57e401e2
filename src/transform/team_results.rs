use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rusqlite::types::Value;
use serde::Serialize;
use thiserror::Error;

use crate::document::MatchDocument;
use crate::store::{Column, Record, SqlType};
use crate::transform::rates::round2;

/// How matches without a winner (draws, ties, no result) enter team results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoResultPolicy {
    /// Every participating team records a loss.
    #[default]
    CountAsLoss,
    /// The match is left out of team results entirely.
    Exclude,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown no-result policy '{0}' (expected 'loss' or 'exclude')")]
pub struct UnknownPolicy(pub String);

impl fmt::Display for NoResultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoResultPolicy::CountAsLoss => f.write_str("loss"),
            NoResultPolicy::Exclude => f.write_str("exclude"),
        }
    }
}

impl FromStr for NoResultPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loss" => Ok(NoResultPolicy::CountAsLoss),
            "exclude" => Ok(NoResultPolicy::Exclude),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

/// One row of `team_results_<format>`. `wins + losses == matches`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamResultRow {
    pub team: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_percent: f64,
}

impl Record for TeamResultRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("team", SqlType::Text),
        Column::new("matches", SqlType::Integer),
        Column::new("wins", SqlType::Integer),
        Column::new("losses", SqlType::Integer),
        Column::new("win_percent", SqlType::Real),
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.team.clone()),
            Value::from(self.matches),
            Value::from(self.wins),
            Value::from(self.losses),
            Value::from(self.win_percent),
        ]
    }
}

/// Team results plus the number of winnerless matches encountered.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamResults {
    pub rows: Vec<TeamResultRow>,
    pub winnerless: usize,
}

#[derive(Default)]
struct Standing {
    matches: u32,
    wins: u32,
    losses: u32,
}

/// Builds per-team match, win and loss counts, ordered by team name.
pub fn build_team_results(documents: &[MatchDocument], policy: NoResultPolicy) -> TeamResults {
    let mut standings: BTreeMap<&str, Standing> = BTreeMap::new();
    let mut winnerless = 0;

    for doc in documents {
        let Some(teams) = doc.info.teams.as_deref() else {
            continue;
        };
        let winner = doc.info.winner();
        if winner.is_none() {
            winnerless += 1;
            if policy == NoResultPolicy::Exclude {
                continue;
            }
        }

        for team in teams {
            let standing = standings.entry(team.as_str()).or_default();
            standing.matches += 1;
            if Some(team.as_str()) == winner {
                standing.wins += 1;
            } else {
                standing.losses += 1;
            }
        }
    }

    let rows = standings
        .into_iter()
        .map(|(team, r)| TeamResultRow {
            team: team.to_string(),
            matches: r.matches,
            wins: r.wins,
            losses: r.losses,
            win_percent: round2(f64::from(r.wins) * 100.0 / f64::from(r.matches)),
        })
        .collect();

    TeamResults { rows, winnerless }
}
