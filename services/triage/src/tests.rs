//! Tests for the triage queue
//!
//! Covers urgency/arrival ordering, wait-time derivation, integrity
//! warnings, the queue summary and the service facade.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use shared::{CoreError, FixedClock};
use std::sync::Arc;

use crate::intake::{IntakeEntry, IntakeStatus, TriageLevel};
use crate::ranker::{rank_queue, summarize, wait_minutes};
use crate::service::TriageService;
use crate::source::{InMemoryIntakeSource, IntakeSource};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, minute, 0).unwrap()
}

fn entry(id: &str, level: TriageLevel, arrived: DateTime<Utc>) -> IntakeEntry {
    IntakeEntry::new(id, format!("patient-{}", id), level, arrived)
}

fn ids(ranked: &[crate::RankedEntry]) -> Vec<&str> {
    ranked.iter().map(|r| r.entry.id.as_str()).collect()
}

struct FailingSource;

#[async_trait]
impl IntakeSource for FailingSource {
    async fn fetch_active(&self) -> anyhow::Result<Vec<IntakeEntry>> {
        Err(anyhow!("query timed out"))
    }
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_urgency_then_arrival() {
    let entries = vec![
        entry("A", TriageLevel::Urgent, at(10, 0)),
        entry("B", TriageLevel::Immediate, at(10, 5)),
        entry("C", TriageLevel::Urgent, at(9, 50)),
    ];

    let ranked = rank_queue(&entries, at(10, 30));

    assert_eq!(ids(&ranked), vec!["B", "C", "A"]);
}

#[test]
fn test_no_less_urgent_entry_before_more_urgent() {
    let levels = [
        TriageLevel::NonUrgent,
        TriageLevel::Urgent,
        TriageLevel::LessUrgent,
        TriageLevel::Immediate,
    ];
    let entries: Vec<_> = (0..20)
        .map(|i| entry(&format!("e{}", i), levels[i % 4], at(8, 0) + Duration::minutes((i * 7 % 13) as i64)))
        .collect();

    let ranked = rank_queue(&entries, at(12, 0));

    assert_eq!(ranked.len(), entries.len());
    for pair in ranked.windows(2) {
        let (a, b) = (&pair[0].entry, &pair[1].entry);
        assert!(a.triage_level.rank() <= b.triage_level.rank());
        if a.triage_level == b.triage_level {
            assert!(a.arrival().unwrap() <= b.arrival().unwrap());
        }
    }
}

#[test]
fn test_same_level_same_arrival_keeps_input_order() {
    let entries = vec![
        entry("first", TriageLevel::Urgent, at(9, 0)),
        entry("second", TriageLevel::Urgent, at(9, 0)),
        entry("third", TriageLevel::Urgent, at(9, 0)),
    ];
    let ranked = rank_queue(&entries, at(9, 30));
    assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
}

#[test]
fn test_level_rank_matches_declaration_order() {
    for pair in TriageLevel::ALL.windows(2) {
        assert!(pair[0] < pair[1]);
        assert!(pair[0].rank() < pair[1].rank());
    }
    assert_eq!(TriageLevel::Immediate.rank(), 0);
}

#[test]
fn test_ranker_does_not_filter_statuses() {
    let mut treated = entry("T", TriageLevel::Urgent, at(9, 0));
    treated.status = IntakeStatus::InTreatment;
    let entries = vec![treated, entry("W", TriageLevel::Urgent, at(9, 5))];

    assert_eq!(rank_queue(&entries, at(10, 0)).len(), 2);
}

// ============================================================================
// Wait time
// ============================================================================

#[test]
fn test_wait_minutes_floor() {
    let arrived = at(10, 0);
    assert_eq!(wait_minutes(arrived, arrived), 0);
    assert_eq!(wait_minutes(arrived, arrived + Duration::seconds(59)), 0);
    assert_eq!(wait_minutes(arrived, arrived + Duration::seconds(60)), 1);
    assert_eq!(wait_minutes(arrived, arrived + Duration::seconds(119)), 1);
    assert_eq!(wait_minutes(arrived, at(11, 45)), 105);
}

#[test]
fn test_future_arrival_waits_zero() {
    assert_eq!(wait_minutes(at(10, 5), at(10, 0)), 0);
}

#[test]
fn test_wait_minutes_attached_to_entries() {
    let entries = vec![
        entry("A", TriageLevel::Urgent, at(10, 0)),
        entry("B", TriageLevel::Immediate, at(10, 5)),
    ];
    let ranked = rank_queue(&entries, at(10, 30));

    assert_eq!(ranked[0].wait_minutes, Some(25));
    assert_eq!(ranked[1].wait_minutes, Some(30));
    assert!(ranked.iter().all(|r| r.warning.is_none()));
}

#[test]
fn test_wait_is_monotonic_in_now() {
    let entries = vec![
        entry("A", TriageLevel::Urgent, at(10, 0)),
        entry("B", TriageLevel::NonUrgent, at(7, 13)),
    ];

    let mut previous: Option<Vec<Option<i64>>> = None;
    for offset in [0_i64, 1, 59, 60, 61, 600, 3601] {
        let now = at(10, 0) + Duration::seconds(offset);
        let waits: Vec<_> = rank_queue(&entries, now).iter().map(|r| r.wait_minutes).collect();
        if let Some(previous) = &previous {
            for (before, after) in previous.iter().zip(&waits) {
                assert!(after >= before);
            }
        }
        previous = Some(waits);
    }
}

#[test]
fn test_ranking_is_idempotent() {
    let entries = vec![
        entry("A", TriageLevel::LessUrgent, at(9, 0)),
        entry("B", TriageLevel::Urgent, at(9, 30)),
    ];
    let now = at(10, 0);
    assert_eq!(rank_queue(&entries, now), rank_queue(&entries, now));
}

#[test]
fn test_offset_timestamps_are_normalised() {
    let mut e = entry("A", TriageLevel::Urgent, at(10, 0));
    e.arrival_time = Some("2026-03-01T13:00:00+03:00".to_string());

    let ranked = rank_queue(&[e], at(10, 20));
    assert_eq!(ranked[0].wait_minutes, Some(20));
}

// ============================================================================
// Integrity warnings
// ============================================================================

#[test]
fn test_missing_arrival_kept_and_flagged() {
    let mut missing = entry("M", TriageLevel::Immediate, at(9, 0));
    missing.arrival_time = None;
    let entries = vec![
        missing,
        entry("I", TriageLevel::Immediate, at(9, 30)),
        entry("U", TriageLevel::Urgent, at(8, 0)),
    ];

    let ranked = rank_queue(&entries, at(10, 0));

    assert_eq!(ids(&ranked), vec!["I", "M", "U"]);
    let flagged = &ranked[1];
    assert_eq!(flagged.wait_minutes, None);
    let warning = flagged.warning.as_ref().unwrap();
    assert_eq!(warning.record_id, "M");
    assert_eq!(warning.field, "arrivalTime");
    assert_eq!(warning.reason, "missing");
}

#[test]
fn test_unparsable_arrival_kept_and_flagged() {
    let mut garbled = entry("G", TriageLevel::Urgent, at(9, 0));
    garbled.arrival_time = Some("yesterday-ish".to_string());

    let ranked = rank_queue(&[garbled], at(10, 0));

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].wait_minutes, None);
    assert!(ranked[0].warning.as_ref().unwrap().reason.contains("yesterday-ish"));
}

// ============================================================================
// Summary
// ============================================================================

#[test]
fn test_summary_counts() {
    let mut unknown = entry("X", TriageLevel::Urgent, at(9, 0));
    unknown.arrival_time = None;
    let entries = vec![
        entry("A", TriageLevel::Urgent, at(10, 0)),
        entry("B", TriageLevel::Immediate, at(10, 5)),
        entry("C", TriageLevel::Urgent, at(9, 50)),
        unknown,
    ];

    let summary = summarize(&rank_queue(&entries, at(10, 30)));

    assert_eq!(summary.total, 4);
    assert_eq!(summary.by_level.get(&TriageLevel::Urgent), Some(&3));
    assert_eq!(summary.by_level.get(&TriageLevel::Immediate), Some(&1));
    assert_eq!(summary.by_level.get(&TriageLevel::NonUrgent), None);
    assert_eq!(summary.longest_wait_minutes, Some(40));
    assert_eq!(summary.flagged, 1);
}

#[test]
fn test_summary_of_empty_queue() {
    let summary = summarize(&[]);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.longest_wait_minutes, None);
}

// ============================================================================
// Snapshot format
// ============================================================================

#[test]
fn test_intake_snapshot_from_store_json() {
    let json = r#"[
        {"id": "i-1", "patientId": "p-1", "triageLevel": "less-urgent", "status": "waiting",
         "arrivalTime": "2026-03-01T09:15:00Z", "chiefComplaint": "sprained ankle"},
        {"id": "i-2", "patientId": "p-2", "triageLevel": "immediate", "status": "in-assessment"}
    ]"#;

    let entries: Vec<IntakeEntry> = serde_json::from_str(json).unwrap();

    assert_eq!(entries[0].triage_level, TriageLevel::LessUrgent);
    assert_eq!(entries[0].arrival().unwrap(), at(9, 15));
    assert_eq!(entries[1].status, IntakeStatus::InAssessment);
    assert!(entries[1].arrival().is_err());

    let ranked = rank_queue(&entries, at(9, 45));
    assert_eq!(ids(&ranked), vec!["i-2", "i-1"]);

    let value = serde_json::to_value(&ranked[1]).unwrap();
    assert_eq!(value["waitMinutes"], serde_json::json!(30));
    assert!(value.get("warning").is_none());
}

// ============================================================================
// Source and service
// ============================================================================

#[test]
fn test_source_returns_only_queued_entries() {
    let source = InMemoryIntakeSource::new(vec![
        entry("A", TriageLevel::Urgent, at(9, 0)),
        entry("B", TriageLevel::Immediate, at(9, 5)),
    ]);
    source.admit(entry("C", TriageLevel::NonUrgent, at(9, 10))).unwrap();
    assert!(source.admit(entry("C", TriageLevel::NonUrgent, at(9, 10))).is_err());

    source.transition("B", IntakeStatus::InTreatment).unwrap();
    source.transition("C", IntakeStatus::InAssessment).unwrap();
    assert!(source.transition("Z", IntakeStatus::Discharged).is_err());

    let active = tokio_test::block_on(source.fetch_active()).unwrap();
    let active_ids: Vec<_> = active.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(active_ids, vec!["A", "C"]);
    assert_eq!(source.len(), 3);
}

#[tokio::test]
async fn test_service_ranks_with_injected_clock() {
    let source = Arc::new(InMemoryIntakeSource::new(vec![
        entry("A", TriageLevel::Urgent, at(10, 0)),
        entry("B", TriageLevel::Immediate, at(10, 5)),
        entry("C", TriageLevel::Urgent, at(9, 50)),
    ]));
    let clock = Arc::new(FixedClock::new(at(10, 30)));
    let service = TriageService::new(source, clock.clone());

    let queue = service.queue().await.unwrap();
    assert_eq!(ids(&queue), vec!["B", "C", "A"]);
    assert_eq!(queue[1].wait_minutes, Some(40));

    clock.advance(Duration::minutes(10));
    let later = service.queue().await.unwrap();
    assert_eq!(later[1].wait_minutes, Some(50));
}

#[tokio::test]
async fn test_service_summary() {
    let source = Arc::new(InMemoryIntakeSource::new(vec![
        entry("A", TriageLevel::Urgent, at(10, 0)),
        entry("B", TriageLevel::Immediate, at(10, 5)),
    ]));
    let service = TriageService::new(source, Arc::new(FixedClock::new(at(10, 10))));

    let (queue, summary) = service.queue_with_summary().await.unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.longest_wait_minutes, Some(10));
}

#[tokio::test]
async fn test_service_snapshot_failure_is_dependency_error() {
    let service = TriageService::new(Arc::new(FailingSource), Arc::new(FixedClock::new(at(10, 0))));

    let err = service.queue().await.unwrap_err();
    assert!(matches!(err, CoreError::Dependency { .. }));
}
