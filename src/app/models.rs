//! Data models for Orbit Fetcher
//!
//! Acquisition timestamps, orbit pass and processor selection, and the
//! retrieval jobs handed from the matcher to the dispatcher.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::matching;

/// Point in time at which an SLC acquisition was taken
///
/// Immutable once parsed; only used for ordering and interval membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AcquisitionTimestamp(NaiveDateTime);

impl AcquisitionTimestamp {
    /// Wrap an already parsed date-time
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Parse `text` with the given `strftime` format
    pub fn parse(text: &str, format: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(text, format).map(Self)
    }

    /// Render with the given `strftime` format
    pub fn format(&self, format: &str) -> String {
        self.0.format(format).to_string()
    }

    /// Underlying date-time
    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for AcquisitionTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(matching::DATE_FORMAT))
    }
}

/// Orbit pass directory under the data root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrbitPass {
    Ascending,
    Descending,
}

impl OrbitPass {
    /// Directory name for this pass
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

impl fmt::Display for OrbitPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Downstream InSAR processor whose storage layout is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorMode {
    /// Zipped under `<snap_root>/<SAT>/<YYYY>/<MM>/`
    Snap,
    /// Raw file under `<data>/<pass>/orbits/`
    Isce,
}

impl fmt::Display for ProcessorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snap => f.write_str("snap"),
            Self::Isce => f.write_str("isce"),
        }
    }
}

/// One orbit file to retrieve, with the acquisition date used to name its path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalJob {
    /// Candidate file name as listed in the catalog
    pub candidate: String,
    /// First covered acquisition date (`YYYYMMDDTHHMMSS`)
    pub representative_date: String,
}

impl RetrievalJob {
    pub fn new(candidate: impl Into<String>, representative_date: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            representative_date: representative_date.into(),
        }
    }

    /// Satellite prefix of the candidate (`S1A` in `S1A_OPER_...`)
    pub fn satellite_prefix(&self) -> Option<&str> {
        satellite_prefix(&self.candidate)
    }

    /// Year and month of the representative date
    pub fn year_month(&self) -> Option<(&str, &str)> {
        let year = self.representative_date.get(0..4)?;
        let month = self.representative_date.get(4..6)?;
        let numeric = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if numeric(year) && numeric(month) {
            Some((year, month))
        } else {
            None
        }
    }
}

/// Leading satellite identifier of a candidate name, if non-empty
pub fn satellite_prefix(candidate: &str) -> Option<&str> {
    candidate
        .split(matching::FIELD_SEPARATOR)
        .next()
        .filter(|prefix| !prefix.is_empty())
}
