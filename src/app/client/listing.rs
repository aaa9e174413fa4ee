//! Catalog directory listing parsing
//!
//! The POEORB catalog is a plain HTML index; every anchor points at one orbit
//! file. Only the file name part of each `href` is kept.

use scraper::{Html, Selector};

use crate::app::observer::{RunEvent, RunObserver};
use crate::constants::catalog;
use crate::errors::{CatalogError, CatalogResult};

/// Extract entry names from a directory listing page, in page order
pub fn parse_listing(html: &str) -> CatalogResult<Vec<String>> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse(catalog::ENTRY_SELECTOR).map_err(|_| CatalogError::InvalidSelector {
            selector: catalog::ENTRY_SELECTOR.to_string(),
        })?;

    let entries = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| href.rsplit('/').next())
        .filter(|name| !name.is_empty() && !name.starts_with('?'))
        .map(str::to_string)
        .collect();

    Ok(entries)
}

/// Keep entries for one satellite that carry the orbit file suffix
///
/// Entries for the satellite without the suffix cannot hold a validity
/// window; each is reported as `RunEvent::CandidateRejected`.
pub fn filter_candidates(
    entries: &[String],
    satellite: &str,
    suffix: &str,
    observer: &dyn RunObserver,
) -> Vec<String> {
    let mut kept = Vec::new();
    for name in entries.iter().filter(|name| name.starts_with(satellite)) {
        if name.ends_with(suffix) {
            kept.push(name.clone());
        } else {
            observer.notify(RunEvent::CandidateRejected {
                candidate: name.clone(),
                reason: format!("missing {} suffix", suffix),
            });
        }
    }
    kept
}
