//! Typed shape of a cricsheet match document.
//!
//! Every section decodes into a record whose fields are all optional, so a
//! document is checked once at ingestion and the aggregators work on known
//! fields instead of probing raw JSON. Unknown keys are ignored.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Deserialize;

/// One match, as published by cricsheet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchDocument {
    /// Identifier assigned at load time from the file name.
    #[serde(skip)]
    pub match_id: Option<String>,
    pub meta: Meta,
    pub info: Info,
    pub innings: Vec<Innings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub data_version: Option<String>,
    pub created: Option<String>,
    pub revision: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Info {
    pub match_type: Option<String>,
    pub teams: Option<Vec<String>>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub dates: Vec<NaiveDate>,
    pub toss: Option<Toss>,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Toss {
    pub winner: Option<String>,
    pub decision: Option<String>,
}

/// Match outcome. `winner` is absent for draws, ties and abandoned games,
/// in which case `result` usually says which.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Outcome {
    pub winner: Option<String>,
    pub result: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Innings {
    /// The batting side.
    pub team: Option<String>,
    pub overs: Vec<Over>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Over {
    pub over: Option<u32>,
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Delivery {
    pub batter: Option<String>,
    pub bowler: Option<String>,
    pub non_striker: Option<String>,
    pub runs: Runs,
    pub extras: Option<Extras>,
    pub wickets: Option<Vec<Wicket>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Runs {
    pub batter: u32,
    pub extras: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Extras {
    pub wides: Option<u32>,
    pub noballs: Option<u32>,
    pub byes: Option<u32>,
    pub legbyes: Option<u32>,
    pub penalty: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Wicket {
    pub player_out: Option<String>,
    pub kind: Option<String>,
}

impl MatchDocument {
    /// Tags the document with the identifier it was loaded under.
    pub fn with_match_id(mut self, match_id: &str) -> Self {
        self.match_id = Some(match_id.to_string());
        self
    }

    /// Every delivery of the match, paired with the innings it was bowled in.
    pub fn deliveries(&self) -> impl Iterator<Item = (&Innings, &Delivery)> {
        self.innings.iter().flat_map(|innings| {
            innings
                .overs
                .iter()
                .flat_map(|over| over.deliveries.iter())
                .map(move |delivery| (innings, delivery))
        })
    }
}

impl Info {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn toss_winner(&self) -> Option<&str> {
        self.toss.as_ref()?.winner.as_deref()
    }

    pub fn winner(&self) -> Option<&str> {
        self.outcome.as_ref()?.winner.as_deref()
    }
}

impl Delivery {
    /// A wide carries extra runs and names `wides` in its extras breakdown.
    pub fn is_wide(&self) -> bool {
        self.runs.extras > 0 && self.extras.as_ref().is_some_and(|e| e.wides.is_some())
    }

    /// Legal deliveries count towards balls bowled and balls faced.
    pub fn is_legal(&self) -> bool {
        !self.is_wide()
    }

    pub fn has_wicket(&self) -> bool {
        self.wickets.is_some()
    }
}

/// Decodes a JSON match document from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON or a present field has the
/// wrong type (for example a malformed date).
pub fn parse_document(bytes: &[u8]) -> Result<MatchDocument> {
    Ok(serde_json::from_slice(bytes)?)
}
