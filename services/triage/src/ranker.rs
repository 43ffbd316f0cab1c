//! Triage queue ordering and wait-time derivation

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::DataIntegrityWarning;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::intake::{IntakeEntry, TriageLevel};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub entry: IntakeEntry,
    /// Whole minutes since arrival; `None` when arrival is unknown
    pub wait_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<DataIntegrityWarning>,
}

/// Whole minutes from `arrival` to `now`, rounded down. Future arrivals count as 0.
pub fn wait_minutes(arrival: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - arrival).num_seconds().div_euclid(60).max(0)
}

/// Order queued entries by urgency, then arrival.
///
/// Entries whose arrival is missing or unparsable stay in the queue,
/// after the timestamped entries of the same level, flagged with a
/// warning. Remaining ties keep input order.
pub fn rank_queue(entries: &[IntakeEntry], now: DateTime<Utc>) -> Vec<RankedEntry> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, RankedEntry)> = entries
        .iter()
        .map(|entry| match entry.arrival() {
            Ok(arrival) => (
                Some(arrival),
                RankedEntry {
                    entry: entry.clone(),
                    wait_minutes: Some(wait_minutes(arrival, now)),
                    warning: None,
                },
            ),
            Err(warning) => (
                None,
                RankedEntry {
                    entry: entry.clone(),
                    wait_minutes: None,
                    warning: Some(warning),
                },
            ),
        })
        .collect();

    keyed.sort_by(|(a_arrival, a), (b_arrival, b)| {
        a.entry
            .triage_level
            .rank()
            .cmp(&b.entry.triage_level.rank())
            .then_with(|| compare_arrivals(a_arrival, b_arrival))
    });

    keyed.into_iter().map(|(_, ranked)| ranked).collect()
}

fn compare_arrivals(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSummary {
    pub total: usize,
    pub by_level: BTreeMap<TriageLevel, usize>,
    pub longest_wait_minutes: Option<i64>,
    /// Entries carrying a data integrity warning
    pub flagged: usize,
}

pub fn summarize(queue: &[RankedEntry]) -> QueueSummary {
    let mut summary = QueueSummary {
        total: queue.len(),
        ..QueueSummary::default()
    };

    for ranked in queue {
        *summary.by_level.entry(ranked.entry.triage_level).or_insert(0) += 1;
        if ranked.warning.is_some() {
            summary.flagged += 1;
        }
        summary.longest_wait_minutes = match (summary.longest_wait_minutes, ranked.wait_minutes) {
            (Some(longest), Some(wait)) => Some(longest.max(wait)),
            (longest, wait) => longest.or(wait),
        };
    }

    summary
}
