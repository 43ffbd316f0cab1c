//! Dispatch request handling
//!
//! Validates the caller's request, loads one unit snapshot and ranks it.
//! A snapshot failure is reported as a dependency error and left for the
//! caller to retry.

use serde::Deserialize;
use shared::config::LocatorSettings;
use shared::{CoreError, CoreResult, GeoPoint};
use std::sync::Arc;
use tracing::{info, warn};

use crate::locator::{locate, UnitMatch};
use crate::source::UnitSource;
use crate::unit::EmergencyType;

/// Raw request as received from the handler layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub emergency_type: EmergencyType,
    pub limit: Option<usize>,
}

impl LocateRequest {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }

    pub fn for_emergency(mut self, emergency_type: EmergencyType) -> Self {
        self.emergency_type = emergency_type;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

pub struct DispatchService<S: UnitSource> {
    source: Arc<S>,
    default_limit: usize,
    max_limit: usize,
}

impl<S: UnitSource> DispatchService<S> {
    pub fn new(source: Arc<S>, settings: &LocatorSettings) -> Self {
        Self {
            source,
            default_limit: settings.default_limit,
            max_limit: settings.max_limit,
        }
    }

    /// Limit actually applied: the caller's, else the default, capped at the max.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }

    pub async fn nearest_units(&self, request: &LocateRequest) -> CoreResult<Vec<UnitMatch>> {
        let origin = GeoPoint::from_raw(request.latitude, request.longitude)?;
        let limit = self.effective_limit(request.limit);

        let units = self.source.fetch_units().await.map_err(|e| {
            warn!(error = %e, "unit snapshot unavailable");
            CoreError::dependency("transport units", e)
        })?;

        let matches = locate(&units, &origin, request.emergency_type, limit);

        info!(
            latitude = origin.latitude,
            longitude = origin.longitude,
            emergency_type = ?request.emergency_type,
            snapshot = units.len(),
            returned = matches.len(),
            nearest_km = ?matches.first().map(|m| m.distance_km),
            "nearest units located"
        );

        Ok(matches)
    }
}
