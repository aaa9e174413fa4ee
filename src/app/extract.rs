//! Acquisition timestamp extraction
//!
//! SLC product names embed their sensing start as a 15-character
//! `YYYYMMDDTHHMMSS` stamp, e.g.
//! `S1A_IW_SLC__1SDV_20210105T120000_20210105T120027_036000_043000_ABCD.zip`.
//! The first such stamp in the identifier is the acquisition timestamp.

use regex::Regex;

use crate::app::models::AcquisitionTimestamp;
use crate::app::observer::{RunEvent, RunObserver};
use crate::constants::matching;
use crate::errors::{ExtractionError, ExtractionResult};

/// Parses acquisition identifiers into sortable timestamps
#[derive(Debug, Clone)]
pub struct TimestampExtractor {
    pattern: Regex,
    date_format: String,
}

impl Default for TimestampExtractor {
    fn default() -> Self {
        Self::new(matching::DATE_FORMAT)
    }
}

impl TimestampExtractor {
    /// Create an extractor parsing matches with `date_format`
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            pattern: Regex::new(matching::ACQUISITION_PATTERN)
                .expect("Acquisition pattern should be valid"),
            date_format: date_format.into(),
        }
    }

    /// Extract the acquisition timestamp from one identifier
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::NotFound` when the identifier carries no
    /// stamp and `ExtractionError::InvalidTimestamp` when the stamp is not a
    /// real date-time.
    pub fn extract(&self, identifier: &str) -> ExtractionResult<AcquisitionTimestamp> {
        let text = self
            .pattern
            .find(identifier)
            .map(|m| m.as_str())
            .ok_or_else(|| ExtractionError::NotFound {
                identifier: identifier.to_string(),
            })?;

        AcquisitionTimestamp::parse(text, &self.date_format).map_err(|source| {
            ExtractionError::InvalidTimestamp {
                identifier: identifier.to_string(),
                text: text.to_string(),
                source,
            }
        })
    }

    /// Extract every identifier, dropping failures, sorted ascending
    ///
    /// Each dropped identifier is reported as `RunEvent::AcquisitionSkipped`.
    pub fn extract_all<I, S>(&self, identifiers: I, observer: &dyn RunObserver) -> Vec<AcquisitionTimestamp>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut timestamps: Vec<AcquisitionTimestamp> = identifiers
            .into_iter()
            .filter_map(|identifier| {
                let identifier = identifier.as_ref();
                match self.extract(identifier) {
                    Ok(ts) => Some(ts),
                    Err(e) => {
                        observer.notify(RunEvent::AcquisitionSkipped {
                            identifier: identifier.to_string(),
                            reason: e.to_string(),
                        });
                        None
                    }
                }
            })
            .collect();

        timestamps.sort();
        timestamps
    }
}
