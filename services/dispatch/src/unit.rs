//! Transport unit snapshot types

use serde::{Deserialize, Serialize};
use shared::{CoreError, DataIntegrityWarning, GeoPoint};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitStatus {
    Available,
    Dispatched,
    OnScene,
    Transporting,
    AtFacility,
    Returning,
    Unavailable,
    Maintenance,
    OutOfService,
}

impl UnitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Available => "available",
            UnitStatus::Dispatched => "dispatched",
            UnitStatus::OnScene => "on-scene",
            UnitStatus::Transporting => "transporting",
            UnitStatus::AtFacility => "at-facility",
            UnitStatus::Returning => "returning",
            UnitStatus::Unavailable => "unavailable",
            UnitStatus::Maintenance => "maintenance",
            UnitStatus::OutOfService => "out-of-service",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of incident a unit is requested for.
///
/// Recorded with each request; units carry no capability data, so it
/// does not change which units match or their order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmergencyType {
    #[default]
    Medical,
    Trauma,
    Cardiac,
    Respiratory,
    Obstetric,
    Pediatric,
    Burn,
    Psychiatric,
    Other,
}

/// Owning facility; its fixed position stands in when the unit has no fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub coordinates: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportUnit {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_sign: Option<String>,
    pub status: UnitStatus,
    pub is_operational: bool,
    #[serde(default)]
    pub current_location: Option<GeoPoint>,
    #[serde(default)]
    pub hospital: Option<Facility>,
}

impl TransportUnit {
    pub fn new(id: impl Into<String>, status: UnitStatus) -> Self {
        Self {
            id: id.into(),
            call_sign: None,
            status,
            is_operational: true,
            current_location: None,
            hospital: None,
        }
    }

    pub fn at(mut self, location: GeoPoint) -> Self {
        self.current_location = Some(location);
        self
    }

    pub fn based_at(mut self, facility: Facility) -> Self {
        self.hospital = Some(facility);
        self
    }

    pub fn operational(mut self, is_operational: bool) -> Self {
        self.is_operational = is_operational;
        self
    }

    /// Available and operational
    pub fn is_eligible(&self) -> bool {
        self.status == UnitStatus::Available && self.is_operational
    }

    /// Own last fix, else the home facility, else unknown.
    ///
    /// Out-of-range or non-finite coordinates count as no position.
    pub fn resolved_position(&self) -> Option<&GeoPoint> {
        let usable = |point: &&GeoPoint| point.validate().is_ok();
        self.current_location
            .as_ref()
            .filter(usable)
            .or_else(|| self.hospital.as_ref().map(|h| &h.coordinates).filter(usable))
    }

    /// One warning per stored position that cannot be used.
    pub fn position_warnings(&self) -> Vec<DataIntegrityWarning> {
        let candidates = [
            ("currentLocation", self.current_location.as_ref()),
            ("hospital.coordinates", self.hospital.as_ref().map(|h| &h.coordinates)),
        ];

        candidates
            .into_iter()
            .filter_map(|(field, point)| match point?.validate() {
                Ok(()) => None,
                Err(CoreError::InvalidArgument(reason)) => Some(DataIntegrityWarning::new(&self.id, field, reason)),
                Err(other) => Some(DataIntegrityWarning::new(&self.id, field, other.to_string())),
            })
            .collect()
    }
}
