//! Match mappings and their reduction
//!
//! A [`MatchMapping`] maps an orbit file name to the acquisition dates it
//! covers, in insertion order. Each chunk produces one; [`reduce`] merges them
//! in chunk order by concatenating covered lists.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::app::models::RetrievalJob;

/// Orbit file name to covered acquisition dates (`YYYYMMDDTHHMMSS`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchMapping {
    entries: IndexMap<String, Vec<String>>,
}

impl MatchMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `dates` to the entry for `candidate`, creating it on first sight
    pub fn extend_entry<I>(&mut self, candidate: impl Into<String>, dates: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.entries
            .entry(candidate.into())
            .or_default()
            .extend(dates);
    }

    pub fn get(&self, candidate: &str) -> Option<&[String]> {
        self.entries.get(candidate).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// One retrieval per candidate, named after its first covered date
    ///
    /// Remaining covered dates stay in the mapping but play no part in path
    /// naming.
    pub fn retrieval_jobs(&self) -> Vec<RetrievalJob> {
        self.entries
            .iter()
            .filter_map(|(candidate, dates)| {
                dates
                    .first()
                    .map(|date| RetrievalJob::new(candidate.as_str(), date.as_str()))
            })
            .collect()
    }
}

impl IntoIterator for MatchMapping {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Vec<String>)> for MatchMapping {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (candidate, dates) in iter {
            mapping.extend_entry(candidate, dates);
        }
        mapping
    }
}

/// Merge per-chunk mappings, in chunk order, into one global mapping
///
/// Covered lists for a candidate seen in several chunks are concatenated,
/// not deduplicated.
pub fn reduce<I>(chunk_mappings: I) -> MatchMapping
where
    I: IntoIterator<Item = MatchMapping>,
{
    let mut global = MatchMapping::new();
    for mapping in chunk_mappings {
        for (candidate, dates) in mapping {
            global.extend_entry(candidate, dates);
        }
    }
    global
}
