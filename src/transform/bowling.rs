use std::collections::BTreeMap;

use rusqlite::types::Value;
use serde::Serialize;

use crate::document::MatchDocument;
use crate::store::{Column, Record, SqlType};
use crate::transform::rates::{economy, overs, ratio};

/// Per (bowler, opposing team) aggregate, one row of `bowling_stats_<format>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlingRow {
    pub bowler: String,
    pub against_team: String,
    pub runs_conceded: u32,
    /// Legal balls bowled; wides are not counted.
    pub ball: u32,
    pub wicket: u32,
    pub overs: f64,
    pub economy: Option<f64>,
    pub strike_rate: Option<f64>,
    pub avg: Option<f64>,
}

impl Record for BowlingRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("bowler", SqlType::Text),
        Column::new("against_team", SqlType::Text),
        Column::new("runs_conceded", SqlType::Integer),
        Column::new("ball", SqlType::Integer),
        Column::new("wicket", SqlType::Integer),
        Column::new("overs", SqlType::Real),
        Column::new("economy", SqlType::Real),
        Column::new("strike_rate", SqlType::Real),
        Column::new("avg", SqlType::Real),
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.bowler.clone()),
            Value::from(self.against_team.clone()),
            Value::from(self.runs_conceded),
            Value::from(self.ball),
            Value::from(self.wicket),
            Value::from(self.overs),
            Value::from(self.economy),
            Value::from(self.strike_rate),
            Value::from(self.avg),
        ]
    }
}

#[derive(Default)]
struct Tally {
    runs: u32,
    legal_balls: u32,
    wickets: u32,
}

/// Aggregates every delivery bowled into per (bowler, batting team) figures,
/// ordered by bowler then team.
///
/// Runs conceded are the delivery totals, extras included. A delivery with any
/// wicket entry counts as one wicket.
pub fn build_bowling(documents: &[MatchDocument]) -> Vec<BowlingRow> {
    let mut tallies: BTreeMap<(&str, &str), Tally> = BTreeMap::new();

    for doc in documents {
        for (innings, delivery) in doc.deliveries() {
            let (Some(against), Some(bowler)) =
                (innings.team.as_deref(), delivery.bowler.as_deref())
            else {
                continue;
            };

            let tally = tallies.entry((bowler, against)).or_default();
            tally.runs += delivery.runs.total;
            if delivery.is_legal() {
                tally.legal_balls += 1;
            }
            if delivery.has_wicket() {
                tally.wickets += 1;
            }
        }
    }

    tallies
        .into_iter()
        .map(|((bowler, against), t)| BowlingRow {
            bowler: bowler.to_string(),
            against_team: against.to_string(),
            runs_conceded: t.runs,
            ball: t.legal_balls,
            wicket: t.wickets,
            overs: overs(t.legal_balls),
            economy: economy(t.runs, t.legal_balls),
            strike_rate: ratio(t.legal_balls, t.wickets),
            avg: ratio(t.runs, t.wickets),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    fn innings(team: &str, deliveries: &[&str]) -> MatchDocument {
        let body = deliveries.join(",");
        parse_document(
            format!(r#"{{"innings": [{{"team": "{team}", "overs": [{{"deliveries": [{body}]}}]}}]}}"#)
                .as_bytes(),
        )
        .unwrap()
    }

    const DOT: &str = r#"{"batter": "A", "bowler": "K", "runs": {"batter": 0, "extras": 0, "total": 0}}"#;
    const FOUR: &str = r#"{"batter": "A", "bowler": "K", "runs": {"batter": 4, "extras": 0, "total": 4}}"#;
    const WIDE: &str = r#"{"batter": "A", "bowler": "K", "runs": {"batter": 0, "extras": 1, "total": 1}, "extras": {"wides": 1}}"#;
    const BYES: &str = r#"{"batter": "A", "bowler": "K", "runs": {"batter": 0, "extras": 2, "total": 2}, "extras": {"byes": 2}}"#;
    const WICKET: &str = r#"{"batter": "A", "bowler": "K", "runs": {"batter": 0, "extras": 0, "total": 0}, "wickets": [{"player_out": "A", "kind": "bowled"}]}"#;

    #[test]
    fn test_wides_add_runs_but_not_balls() {
        let rows = build_bowling(&[innings("X", &[DOT, WIDE, FOUR])]);
        let row = &rows[0];

        assert_eq!(row.bowler, "K");
        assert_eq!(row.against_team, "X");
        assert_eq!(row.runs_conceded, 5);
        assert_eq!(row.ball, 2);
        assert_eq!(row.economy, Some(15.0));
    }

    #[test]
    fn test_byes_count_as_legal_and_conceded() {
        let rows = build_bowling(&[innings("X", &[BYES])]);
        assert_eq!(rows[0].ball, 1);
        assert_eq!(rows[0].runs_conceded, 2);
    }

    #[test]
    fn test_wicket_dependent_stats() {
        let over = [DOT, FOUR, WICKET, DOT, FOUR, WICKET, DOT];
        let rows = build_bowling(&[innings("X", &over)]);
        let row = &rows[0];

        assert_eq!(row.ball, 7);
        assert_eq!(row.wicket, 2);
        assert_eq!(row.overs, 1.1);
        assert_eq!(row.economy, Some(6.86));
        assert_eq!(row.strike_rate, Some(3.5));
        assert_eq!(row.avg, Some(4.0));
    }

    #[test]
    fn test_no_wickets_leaves_rates_null() {
        let rows = build_bowling(&[innings("X", &[DOT, FOUR])]);
        assert_eq!(rows[0].wicket, 0);
        assert_eq!(rows[0].strike_rate, None);
        assert_eq!(rows[0].avg, None);
    }

    #[test]
    fn test_only_wides_leaves_economy_null() {
        let rows = build_bowling(&[innings("X", &[WIDE])]);
        assert_eq!(rows[0].ball, 0);
        assert_eq!(rows[0].overs, 0.0);
        assert_eq!(rows[0].economy, None);
    }

    #[test]
    fn test_split_by_opposing_team() {
        let rows = build_bowling(&[innings("Y", &[DOT]), innings("X", &[DOT, DOT])]);
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.against_team.as_str(), r.ball))
            .collect();
        assert_eq!(keys, vec![("X", 2), ("Y", 1)]);
    }
}
