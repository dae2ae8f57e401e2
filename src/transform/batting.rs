use std::collections::BTreeMap;

use rusqlite::types::Value;
use serde::Serialize;

use crate::document::MatchDocument;
use crate::store::{Column, Record, SqlType};
use crate::transform::rates::batting_strike_rate;

/// Per (batter, team) aggregate, one row of `batting_stats_<format>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingRow {
    pub batter: String,
    pub team: String,
    pub runs: u32,
    pub ball: u32,
    pub four: u32,
    pub six: u32,
    pub strike_rate: Option<f64>,
}

impl Record for BattingRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("batter", SqlType::Text),
        Column::new("team", SqlType::Text),
        Column::new("runs", SqlType::Integer),
        Column::new("ball", SqlType::Integer),
        Column::new("four", SqlType::Integer),
        Column::new("six", SqlType::Integer),
        Column::new("strike_rate", SqlType::Real),
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.batter.clone()),
            Value::from(self.team.clone()),
            Value::from(self.runs),
            Value::from(self.ball),
            Value::from(self.four),
            Value::from(self.six),
            Value::from(self.strike_rate),
        ]
    }
}

#[derive(Default)]
struct Tally {
    runs: u32,
    balls: u32,
    fours: u32,
    sixes: u32,
}

/// Aggregates every delivery faced into per (batter, team) figures, ordered
/// by batter then team.
///
/// Wides add their batter runs but not a ball faced. Deliveries without a
/// batter, or from an innings without a batting team, are ignored.
pub fn build_batting(documents: &[MatchDocument]) -> Vec<BattingRow> {
    let mut tallies: BTreeMap<(&str, &str), Tally> = BTreeMap::new();

    for doc in documents {
        for (innings, delivery) in doc.deliveries() {
            let (Some(team), Some(batter)) = (innings.team.as_deref(), delivery.batter.as_deref())
            else {
                continue;
            };

            let runs = delivery.runs.batter;
            let tally = tallies.entry((batter, team)).or_default();
            tally.runs += runs;
            if delivery.is_legal() {
                tally.balls += 1;
            }
            match runs {
                4 => tally.fours += 1,
                6 => tally.sixes += 1,
                _ => {}
            }
        }
    }

    tallies
        .into_iter()
        .map(|((batter, team), t)| BattingRow {
            batter: batter.to_string(),
            team: team.to_string(),
            runs: t.runs,
            ball: t.balls,
            four: t.fours,
            six: t.sixes,
            strike_rate: batting_strike_rate(t.runs, t.balls),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    fn innings(team: &str, deliveries: &str) -> MatchDocument {
        parse_document(
            format!(
                r#"{{"innings": [{{"team": "{team}", "overs": [{{"over": 0, "deliveries": [{deliveries}]}}]}}]}}"#
            )
            .as_bytes(),
        )
        .unwrap()
    }

    fn ball(batter: &str, runs: u32) -> String {
        format!(
            r#"{{"batter": "{batter}", "bowler": "B", "runs": {{"batter": {runs}, "extras": 0, "total": {runs}}}}}"#
        )
    }

    #[test]
    fn test_sums_runs_balls_and_boundaries() {
        let doc = innings(
            "X",
            &[ball("A", 0), ball("A", 4), ball("A", 6)].join(","),
        );
        let rows = build_batting(&[doc]);

        assert_eq!(
            rows,
            vec![BattingRow {
                batter: "A".into(),
                team: "X".into(),
                runs: 10,
                ball: 3,
                four: 1,
                six: 1,
                strike_rate: Some(333.33),
            }]
        );
    }

    #[test]
    fn test_groups_across_documents_and_orders_by_key() {
        let first = innings("X", &[ball("B", 1), ball("A", 2)].join(","));
        let second = innings("Y", &[ball("A", 3)].join(","));
        let rows = build_batting(&[first, second]);

        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.batter.as_str(), r.team.as_str(), r.runs))
            .collect();
        assert_eq!(keys, vec![("A", "X", 2), ("A", "Y", 3), ("B", "X", 1)]);
    }

    #[test]
    fn test_wide_is_not_a_ball_faced() {
        let wide = r#"{"batter": "A", "bowler": "B", "runs": {"batter": 0, "extras": 1, "total": 1}, "extras": {"wides": 1}}"#;
        let doc = innings("X", &[wide.to_string(), ball("A", 2)].join(","));
        let rows = build_batting(&[doc]);

        assert_eq!(rows[0].ball, 1);
        assert_eq!(rows[0].runs, 2);
        assert_eq!(rows[0].strike_rate, Some(200.0));
    }

    #[test]
    fn test_only_wides_faced_gives_null_strike_rate() {
        let wide = r#"{"batter": "A", "bowler": "B", "runs": {"batter": 0, "extras": 5, "total": 5}, "extras": {"wides": 5}}"#;
        let rows = build_batting(&[innings("X", wide)]);

        assert_eq!(rows[0].ball, 0);
        assert_eq!(rows[0].strike_rate, None);
    }

    #[test]
    fn test_missing_batter_or_team_is_dropped() {
        let no_batter = r#"{"bowler": "B", "runs": {"batter": 4, "extras": 0, "total": 4}}"#;
        let no_team = parse_document(
            br#"{"innings": [{"overs": [{"deliveries": [{"batter": "A", "runs": {"batter": 1}}]}]}]}"#,
        )
        .unwrap();

        let rows = build_batting(&[innings("X", no_batter), no_team]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_no_documents_no_rows() {
        assert!(build_batting(&[]).is_empty());
    }
}
