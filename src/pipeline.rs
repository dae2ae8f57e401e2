//! Per-format ETL: load, transform, persist.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::format::MatchFormat;
use crate::loader::load_documents;
use crate::store::Store;
use crate::transform::{FormatTables, NoResultPolicy};

/// What one format's run produced. Row counts are what was written; a zero
/// means the table was skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormatSummary {
    pub format: String,
    pub documents: usize,
    pub matches: usize,
    pub batting: usize,
    pub bowling: usize,
    pub team_results: usize,
    pub winnerless: usize,
}

/// Runs the ETL for one format, replacing its four tables.
#[tracing::instrument(skip_all, fields(format = %format, policy = %policy))]
pub fn run_format(
    store: &mut Store,
    data_dir: &Path,
    format: MatchFormat,
    policy: NoResultPolicy,
) -> Result<FormatSummary> {
    let documents = load_documents(data_dir, format)
        .with_context(|| format!("failed to load {format} documents"))?;
    let tables = FormatTables::build(&documents, policy);

    if tables.team_results.winnerless > 0 {
        warn!(
            winnerless = tables.team_results.winnerless,
            policy = %policy,
            "Matches without a winner found; team results follow the no-result policy"
        );
    }

    let summary = FormatSummary {
        format: format.to_string(),
        documents: documents.len(),
        matches: store.replace_table(&format.matches_table(), &tables.matches)?,
        batting: store.replace_table(&format.batting_table(), &tables.batting)?,
        bowling: store.replace_table(&format.bowling_table(), &tables.bowling)?,
        team_results: store
            .replace_table(&format.team_results_table(), &tables.team_results.rows)?,
        winnerless: tables.team_results.winnerless,
    };

    info!(
        documents = summary.documents,
        matches = summary.matches,
        batting = summary.batting,
        bowling = summary.bowling,
        team_results = summary.team_results,
        "Format processed"
    );
    Ok(summary)
}

/// Runs every format in `formats`, one after another.
pub fn run_all(
    store: &mut Store,
    data_dir: &Path,
    formats: &[MatchFormat],
    policy: NoResultPolicy,
) -> Result<Vec<FormatSummary>> {
    formats
        .iter()
        .map(|&format| run_format(store, data_dir, format, policy))
        .collect()
}
