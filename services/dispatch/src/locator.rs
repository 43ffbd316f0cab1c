//! Nearest-unit search

use serde::Serialize;
use shared::GeoPoint;
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::unit::{EmergencyType, TransportUnit};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitMatch {
    pub unit: TransportUnit,
    pub distance_km: f64,
}

/// Distance from `origin` to the unit, `+inf` when its position is unknown.
pub fn distance_to_unit(origin: &GeoPoint, unit: &TransportUnit) -> f64 {
    unit.resolved_position()
        .map(|position| origin.distance_km(position))
        .unwrap_or(f64::INFINITY)
}

/// Rank eligible units by great-circle distance from `origin`.
///
/// Units without a resolvable position are dropped before truncation;
/// corrupt stored coordinates are logged as integrity warnings.
/// Equal distances keep their input order.
pub fn locate(
    units: &[TransportUnit],
    origin: &GeoPoint,
    emergency_type: EmergencyType,
    limit: usize,
) -> Vec<UnitMatch> {
    let mut ranked: Vec<(&TransportUnit, f64)> = units
        .iter()
        .filter(|unit| unit.is_eligible())
        .inspect(|unit| {
            for flagged in unit.position_warnings() {
                warn!(
                    record_id = %flagged.record_id,
                    field = flagged.field,
                    reason = %flagged.reason,
                    "unit position ignored with data integrity warning"
                );
            }
        })
        .map(|unit| (unit, distance_to_unit(origin, unit)))
        .collect();

    let eligible = ranked.len();
    ranked.retain(|(unit, distance)| {
        if distance.is_finite() {
            true
        } else {
            debug!(unit_id = %unit.id, "skipping unit with no known position");
            false
        }
    });

    let positioned = ranked.len();
    // sort_by is stable, which gives the input-order tie-break
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);

    debug!(
        ?emergency_type,
        eligible,
        positioned,
        limit,
        "ranked transport units"
    );

    ranked
        .into_iter()
        .map(|(unit, distance_km)| UnitMatch {
            unit: unit.clone(),
            distance_km,
        })
        .collect()
}
