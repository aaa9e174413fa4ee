//! Per-chunk interval matching
//!
//! Every candidate of a chunk is checked against every acquisition. The
//! acquisition count per run is small (tens), so a linear scan is used.

use crate::app::matcher::interval::{ValidityEncoding, ValidityInterval};
use crate::app::matcher::reduce::MatchMapping;
use crate::app::models::AcquisitionTimestamp;
use crate::app::observer::{RunEvent, RunObserver};
use crate::constants::matching;

/// Build the mapping for one chunk of candidates
///
/// Candidates whose window does not parse are reported as
/// `RunEvent::CandidateRejected` and skipped. Candidates covering no
/// acquisition are left out of the mapping. Covered stamps are always
/// written as `YYYYMMDDTHHMMSS`.
pub fn match_chunk<S>(
    chunk: &[S],
    acquisitions: &[AcquisitionTimestamp],
    encoding: &ValidityEncoding,
    observer: &dyn RunObserver,
) -> MatchMapping
where
    S: AsRef<str>,
{
    let mut mapping = MatchMapping::new();

    for candidate in chunk {
        let candidate = candidate.as_ref();
        let interval = match ValidityInterval::parse(candidate, encoding) {
            Ok(interval) => interval,
            Err(e) => {
                observer.notify(RunEvent::CandidateRejected {
                    candidate: candidate.to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let covered: Vec<String> = acquisitions
            .iter()
            .filter(|t| interval.covers(t))
            .map(|t| t.format(matching::DATE_FORMAT))
            .collect();

        if !covered.is_empty() {
            mapping.extend_entry(candidate, covered);
        }
    }

    mapping
}
