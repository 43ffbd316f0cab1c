//! Intake records as delivered by the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::DataIntegrityWarning;
use std::fmt;

/// Clinical urgency. Declaration order is severity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriageLevel {
    Immediate,
    Urgent,
    LessUrgent,
    NonUrgent,
}

impl TriageLevel {
    pub const ALL: [TriageLevel; 4] = [
        TriageLevel::Immediate,
        TriageLevel::Urgent,
        TriageLevel::LessUrgent,
        TriageLevel::NonUrgent,
    ];

    /// 0 is the most urgent
    pub fn rank(&self) -> u8 {
        match self {
            TriageLevel::Immediate => 0,
            TriageLevel::Urgent => 1,
            TriageLevel::LessUrgent => 2,
            TriageLevel::NonUrgent => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriageLevel::Immediate => "immediate",
            TriageLevel::Urgent => "urgent",
            TriageLevel::LessUrgent => "less-urgent",
            TriageLevel::NonUrgent => "non-urgent",
        }
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntakeStatus {
    Waiting,
    InAssessment,
    InTreatment,
    Admitted,
    Discharged,
    Transferred,
    LeftWithoutBeingSeen,
}

impl IntakeStatus {
    /// Whether the entry belongs in the live queue view
    pub fn is_queued(&self) -> bool {
        matches!(self, IntakeStatus::Waiting | IntakeStatus::InAssessment)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeEntry {
    pub id: String,
    pub patient_id: String,
    pub triage_level: TriageLevel,
    pub status: IntakeStatus,
    /// RFC 3339 text as stored; kept raw so a bad value can be reported
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
}

impl IntakeEntry {
    pub fn new(
        id: impl Into<String>,
        patient_id: impl Into<String>,
        triage_level: TriageLevel,
        arrival_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            patient_id: patient_id.into(),
            triage_level,
            status: IntakeStatus::Waiting,
            arrival_time: Some(arrival_time.to_rfc3339()),
            chief_complaint: None,
        }
    }

    pub fn arrival(&self) -> Result<DateTime<Utc>, DataIntegrityWarning> {
        let raw = self
            .arrival_time
            .as_deref()
            .ok_or_else(|| DataIntegrityWarning::new(&self.id, "arrivalTime", "missing"))?;

        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| {
                DataIntegrityWarning::new(&self.id, "arrivalTime", format!("unparsable {:?}: {}", raw, e))
            })
    }
}
