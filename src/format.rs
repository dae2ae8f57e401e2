//! Match formats covered by the archive and the table names derived from them.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A cricsheet archive format. Each format gets its own input folder and its
/// own set of persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchFormat {
    Odi,
    T20,
    Test,
    Ipl,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown match format '{0}' (expected one of: odi, t20, test, ipl)")]
pub struct UnknownFormat(pub String);

impl MatchFormat {
    /// All formats, in the order the pipeline processes them.
    pub const ALL: [MatchFormat; 4] = [
        MatchFormat::Odi,
        MatchFormat::T20,
        MatchFormat::Test,
        MatchFormat::Ipl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFormat::Odi => "odi",
            MatchFormat::T20 => "t20",
            MatchFormat::Test => "test",
            MatchFormat::Ipl => "ipl",
        }
    }

    /// Download location of the format's zipped JSON archive.
    pub fn archive_url(&self) -> &'static str {
        match self {
            MatchFormat::Odi => "https://cricsheet.org/downloads/odis_json.zip",
            MatchFormat::T20 => "https://cricsheet.org/downloads/t20s_json.zip",
            MatchFormat::Test => "https://cricsheet.org/downloads/tests_json.zip",
            MatchFormat::Ipl => "https://cricsheet.org/downloads/ipl_json.zip",
        }
    }

    pub fn matches_table(&self) -> String {
        format!("{}_matches", self.as_str())
    }

    pub fn batting_table(&self) -> String {
        format!("batting_stats_{}", self.as_str())
    }

    pub fn bowling_table(&self) -> String {
        format!("bowling_stats_{}", self.as_str())
    }

    pub fn team_results_table(&self) -> String {
        format!("team_results_{}", self.as_str())
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "odi" => Ok(MatchFormat::Odi),
            "t20" => Ok(MatchFormat::T20),
            "test" => Ok(MatchFormat::Test),
            "ipl" => Ok(MatchFormat::Ipl),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(MatchFormat::Odi.matches_table(), "odi_matches");
        assert_eq!(MatchFormat::T20.batting_table(), "batting_stats_t20");
        assert_eq!(MatchFormat::Test.bowling_table(), "bowling_stats_test");
        assert_eq!(MatchFormat::Ipl.team_results_table(), "team_results_ipl");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ODI".parse::<MatchFormat>(), Ok(MatchFormat::Odi));
        assert_eq!(" t20 ".parse::<MatchFormat>(), Ok(MatchFormat::T20));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "hundred".parse::<MatchFormat>().unwrap_err();
        assert_eq!(err, UnknownFormat("hundred".to_string()));
    }

    #[test]
    fn test_display_round_trips() {
        for format in MatchFormat::ALL {
            assert_eq!(format.to_string().parse::<MatchFormat>(), Ok(format));
        }
    }
}
