//! Behavioural tests across the matcher components
//!
//! These cover the properties the whole stage has to hold: parallel and
//! sequential runs agree, malformed entries do not disturb the result, and
//! the documented scenarios produce the expected mapping.

use std::sync::Arc;

use super::*;
use crate::app::observer::{MemoryObserver, RunEvent};
use crate::constants::matching;

fn ts(text: &str) -> AcquisitionTimestamp {
    AcquisitionTimestamp::parse(text, matching::DATE_FORMAT).unwrap()
}

/// Daily POEORB-style names, window from day d 22:59:42 to day d+2 00:59:42
fn daily_catalog(days: u32) -> Vec<String> {
    (0..days)
        .map(|offset| {
            let start = ts("20210101T225942").datetime() + chrono::Duration::days(offset as i64);
            let end = start + chrono::Duration::hours(26);
            format!(
                "S1A_OPER_AUX_POEORB_OPOD_{}_V{}_{}.EOF",
                (end + chrono::Duration::days(19)).format(matching::DATE_FORMAT),
                start.format(matching::DATE_FORMAT),
                end.format(matching::DATE_FORMAT)
            )
        })
        .collect()
}

fn acquisitions() -> Vec<AcquisitionTimestamp> {
    vec![
        ts("20210103T054210"),
        ts("20210105T120000"),
        ts("20210110T120000"),
        ts("20210110T120025"),
        ts("20210122T235959"),
    ]
}

#[tokio::test]
async fn test_parallel_matches_sequential() {
    let catalog = daily_catalog(40);
    let acq = acquisitions();
    let encoding = ValidityEncoding::default();

    let sequential = match_sequential(&catalog, &acq, &encoding, MemoryObserver::new().as_ref());
    assert!(!sequential.is_empty());

    for divisor in [1, 2, 3, 4, 7, 40, 100] {
        for workers in [1, 2, 8] {
            let parallel = MatchPool::new(workers)
                .run(&catalog, &acq, &encoding, divisor, MemoryObserver::new())
                .await
                .unwrap();
            assert_eq!(
                parallel, sequential,
                "divisor={} workers={}",
                divisor, workers
            );
            let parallel_keys: Vec<&String> = parallel.candidates().collect();
            let sequential_keys: Vec<&String> = sequential.candidates().collect();
            assert_eq!(parallel_keys, sequential_keys);
        }
    }
}

#[tokio::test]
async fn test_malformed_entry_is_invisible() {
    let clean = daily_catalog(12);
    let mut dirty = clean.clone();
    dirty.insert(5, "S1A_OPER_AUX_POEORB_OPOD_V2021-01-05_garbage.EOF".to_string());

    let settings = MatchSettings {
        match_workers: 3,
        ..Default::default()
    };
    let acq = acquisitions();

    let observer = MemoryObserver::new();
    let from_clean = settings.run(&clean, &acq, MemoryObserver::new()).await.unwrap();
    let from_dirty = settings.run(&dirty, &acq, observer.clone()).await.unwrap();

    assert_eq!(from_clean, from_dirty);
    assert_eq!(
        observer.count(|e| matches!(e, RunEvent::CandidateRejected { .. })),
        1
    );
}

#[tokio::test]
async fn test_scenario_one_candidate_covers_first_acquisition() {
    let extractor = crate::app::extract::TimestampExtractor::default();
    let observer = MemoryObserver::new();
    let acq = extractor.extract_all(
        [
            "S1A_IW_SLC__1SDV_20210105T120000_20210105T120027_036000_043000_ABCD.zip",
            "S1A_IW_SLC__1SDV_20210110T120000_20210110T120027_036075_043A1B_1C2D.zip",
        ],
        observer.as_ref(),
    );
    assert_eq!(acq, vec![ts("20210105T120000"), ts("20210110T120000")]);

    let candidate =
        "S1A_OPER_AUX_POEORB_OPOD_20210125T121545_V20210104T225942_20210106T005942.EOF".to_string();
    let mapping = MatchSettings::default()
        .run(&[candidate.clone()], &acq, observer.clone())
        .await
        .unwrap();

    let expected: MatchMapping = vec![(candidate, vec!["20210105T120000".to_string()])]
        .into_iter()
        .collect();
    assert_eq!(mapping, expected);
}

#[tokio::test]
async fn test_scenario_nothing_matches() {
    let catalog = daily_catalog(10);
    let acq = vec![ts("20220601T000000")];
    let mapping = MatchSettings::default()
        .run(&catalog, &acq, Arc::new(crate::app::observer::TracingObserver))
        .await
        .unwrap();

    assert!(mapping.is_empty());
    assert!(mapping.retrieval_jobs().is_empty());
}

#[test]
fn test_scenario_ten_candidates_divisor_four() {
    let catalog = daily_catalog(10);
    let chunks = partition(&catalog, 4);
    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![2, 2, 2, 2, 2]);
    assert_eq!(chunks[0][0], catalog[0]);
    assert_eq!(chunks[4][1], catalog[9]);
}

#[test]
fn test_covered_dates_reparse() {
    let catalog = daily_catalog(25);
    let acq = acquisitions();
    let encoding = ValidityEncoding::default();
    let mapping = match_sequential(&catalog, &acq, &encoding, MemoryObserver::new().as_ref());

    for (_, dates) in mapping.iter() {
        for date in dates {
            let parsed = AcquisitionTimestamp::parse(date, &encoding.date_format).unwrap();
            assert!(acq.contains(&parsed));
            assert_eq!(&parsed.format(&encoding.date_format), date);
        }
    }
}

#[test]
fn test_boundary_acquisitions_included() {
    let catalog = daily_catalog(3);
    // Exactly the start of the first window and the end of the last
    let acq = vec![ts("20210101T225942"), ts("20210105T005942")];
    let mapping = match_sequential(
        &catalog,
        &acq,
        &ValidityEncoding::default(),
        MemoryObserver::new().as_ref(),
    );

    assert_eq!(mapping.get(&catalog[0]).unwrap(), &["20210101T225942"]);
    assert_eq!(mapping.get(&catalog[2]).unwrap(), &["20210105T005942"]);
}
