//! Fixed summary reports over the persisted tables.

use anyhow::Result;
use tracing::warn;

use crate::reader::Reader;
use crate::store::quote_ident;
use crate::table::Table;

/// A parameter-free report and the tables it reads.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub name: &'static str,
    pub sql: &'static str,
    pub requires: &'static [&'static str],
}

pub const TOP_VENUES_ODI: Report = Report {
    name: "top_venues_odi",
    sql: "SELECT venue, COUNT(*) AS matches
          FROM odi_matches
          GROUP BY venue
          ORDER BY matches DESC, venue
          LIMIT 10",
    requires: &["odi_matches"],
};

pub const TOSS_VS_WINNER_T20: Report = Report {
    name: "toss_vs_winner_t20",
    sql: "SELECT CASE WHEN toss_winner = match_winner THEN 'Toss=Match Winner'
                      ELSE 'Toss≠Match Winner' END AS outcome,
                 COUNT(*) AS count
          FROM t20_matches
          GROUP BY outcome
          ORDER BY outcome",
    requires: &["t20_matches"],
};

pub const MATCHES_PER_YEAR_TEST: Report = Report {
    name: "matches_per_year_test",
    sql: "SELECT SUBSTR(date, 1, 4) AS season, COUNT(*) AS matches
          FROM test_matches
          GROUP BY season
          ORDER BY season",
    requires: &["test_matches"],
};

pub const ODI_RESULT_TYPE: Report = Report {
    name: "odi_result_type",
    sql: "SELECT match_winner AS result, COUNT(*) AS count
          FROM odi_matches
          GROUP BY result
          ORDER BY count DESC, result",
    requires: &["odi_matches"],
};

pub const REPORTS: [Report; 4] = [
    TOP_VENUES_ODI,
    TOSS_VS_WINNER_T20,
    MATCHES_PER_YEAR_TEST,
    ODI_RESULT_TYPE,
];

/// Outcome of one report. `table` is `None` when a source table is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    pub name: &'static str,
    pub table: Option<Table>,
}

/// Runs `report`, or returns no data if any table it reads is missing.
pub fn run_report(reader: &mut Reader<'_>, report: &Report) -> Result<ReportOutput> {
    for table in report.requires {
        if !reader.store().table_exists(table)? {
            warn!(report = report.name, table, "Report source table missing, no data");
            return Ok(ReportOutput {
                name: report.name,
                table: None,
            });
        }
    }
    Ok(ReportOutput {
        name: report.name,
        table: Some(reader.read_sql(report.sql)?),
    })
}

/// Match count per format, over whichever formats have a matches table.
pub fn matches_per_format(reader: &mut Reader<'_>) -> Result<ReportOutput> {
    let formats = reader.available_formats()?;
    if formats.is_empty() {
        warn!("No match tables found, no data");
        return Ok(ReportOutput {
            name: "matches_per_format",
            table: None,
        });
    }

    let sql = formats
        .iter()
        .map(|f| {
            format!(
                "SELECT '{}' AS format, COUNT(*) AS matches FROM {}",
                f.as_str().to_uppercase(),
                quote_ident(&f.matches_table())
            )
        })
        .collect::<Vec<_>>()
        .join(" UNION ALL ");

    Ok(ReportOutput {
        name: "matches_per_format",
        table: Some(reader.read_sql(&sql)?),
    })
}

/// Matches per format followed by every fixed report.
pub fn run_all_reports(reader: &mut Reader<'_>) -> Result<Vec<ReportOutput>> {
    let mut outputs = vec![matches_per_format(reader)?];
    for report in &REPORTS {
        outputs.push(run_report(reader, report)?);
    }
    Ok(outputs)
}
