//! Validity interval decoding
//!
//! POEORB file names end in their validity window:
//!
//! ```text
//! S1A_OPER_AUX_POEORB_OPOD_20210125T121545_V20210104T225942_20210106T005942.EOF
//!                                          ^ start          ^ end
//! ```
//!
//! The last `fields` underscore-separated tokens are taken, the leading marker
//! and the file suffix are stripped, and the last two tokens are parsed as the
//! inclusive `[start, end]` window.

use serde::{Deserialize, Serialize};

use crate::app::models::AcquisitionTimestamp;
use crate::constants::matching;
use crate::errors::{IntervalParseError, IntervalResult};

/// How a candidate name encodes its validity window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityEncoding {
    /// Trailing fields holding the window
    pub fields: usize,
    /// `strftime` format of each bound
    pub date_format: String,
    /// Leading marker character stripped from each token
    pub marker: char,
    /// File suffix removed from each token
    pub suffix: String,
}

impl Default for ValidityEncoding {
    fn default() -> Self {
        Self {
            fields: matching::VALIDITY_FIELDS,
            date_format: matching::DATE_FORMAT.to_string(),
            marker: matching::VALIDITY_MARKER,
            suffix: matching::VALIDITY_SUFFIX.to_string(),
        }
    }
}

/// Inclusive validity window of one orbit file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityInterval {
    pub start: AcquisitionTimestamp,
    pub end: AcquisitionTimestamp,
}

impl ValidityInterval {
    /// Decode the window from a candidate name
    ///
    /// `start <= end` is not checked.
    ///
    /// # Errors
    ///
    /// Returns `IntervalParseError::MissingFields` when fewer than two tokens
    /// are available and `IntervalParseError::InvalidTimestamp` when a token
    /// does not parse with the encoding's date format.
    pub fn parse(candidate: &str, encoding: &ValidityEncoding) -> IntervalResult<Self> {
        let fields: Vec<&str> = candidate.split(matching::FIELD_SEPARATOR).collect();
        let taken = encoding.fields.min(fields.len());
        if taken < 2 {
            return Err(IntervalParseError::MissingFields {
                candidate: candidate.to_string(),
                found: taken,
                required: 2,
            });
        }

        let tokens: Vec<String> = fields[fields.len() - taken..]
            .iter()
            .map(|token| {
                token
                    .trim_start_matches(encoding.marker)
                    .replace(encoding.suffix.as_str(), "")
            })
            .collect();

        let parse = |token: &str| {
            AcquisitionTimestamp::parse(token, &encoding.date_format).map_err(|source| {
                IntervalParseError::InvalidTimestamp {
                    candidate: candidate.to_string(),
                    token: token.to_string(),
                    source,
                }
            })
        };

        let start = parse(&tokens[tokens.len() - 2])?;
        let end = parse(&tokens[tokens.len() - 1])?;
        Ok(Self { start, end })
    }

    /// True iff `start <= t <= end`
    pub fn covers(&self, t: &AcquisitionTimestamp) -> bool {
        self.start <= *t && *t <= self.end
    }
}
