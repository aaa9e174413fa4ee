//! Outcome of a synchronisation run

use serde::{Deserialize, Serialize};

use crate::app::dispatcher::DispatchStats;
use crate::app::matcher::MatchMapping;

/// What happened for one satellite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteReport {
    pub satellite: String,
    /// Acquisitions with a usable timestamp
    pub acquisitions: usize,
    /// Catalog entries kept for this satellite
    pub candidates: usize,
    /// Global mapping after reduction
    pub mapping: MatchMapping,
    /// Retrieval tallies; `None` when nothing was dispatched
    pub dispatch: Option<DispatchStats>,
}

/// Per-satellite reports in processing order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub satellites: Vec<SatelliteReport>,
}

impl RunReport {
    /// Total matched candidates across satellites
    pub fn total_matched(&self) -> usize {
        self.satellites.iter().map(|s| s.mapping.len()).sum()
    }

    /// Tallies summed across satellites that dispatched
    pub fn total_dispatch(&self) -> DispatchStats {
        self.satellites
            .iter()
            .filter_map(|s| s.dispatch)
            .fold(DispatchStats::default(), |acc, stats| DispatchStats {
                submitted: acc.submitted + stats.submitted,
                succeeded: acc.succeeded + stats.succeeded,
                failed: acc.failed + stats.failed,
            })
    }

    /// Report for one satellite, if it was processed
    pub fn satellite(&self, satellite: &str) -> Option<&SatelliteReport> {
        self.satellites.iter().find(|s| s.satellite == satellite)
    }
}
