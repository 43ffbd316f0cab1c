//! Unit snapshot sources

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::GeoPoint;

use crate::unit::{TransportUnit, UnitStatus};

/// Supplies the current transport-unit snapshot.
#[async_trait]
pub trait UnitSource: Send + Sync {
    async fn fetch_units(&self) -> Result<Vec<TransportUnit>>;
}

/// Unit store held in process memory.
///
/// Owned by whoever constructs it and handed to services explicitly.
#[derive(Debug, Default)]
pub struct InMemoryUnitSource {
    units: RwLock<Vec<TransportUnit>>,
}

impl InMemoryUnitSource {
    pub fn new(units: Vec<TransportUnit>) -> Self {
        Self {
            units: RwLock::new(units),
        }
    }

    /// Insert or replace by id. New units go to the end.
    pub fn upsert(&self, unit: TransportUnit) {
        let mut units = self.units.write();
        match units.iter_mut().find(|existing| existing.id == unit.id) {
            Some(existing) => *existing = unit,
            None => units.push(unit),
        }
    }

    pub fn set_status(&self, id: &str, status: UnitStatus) -> Result<()> {
        let mut units = self.units.write();
        let unit = units
            .iter_mut()
            .find(|unit| unit.id == id)
            .ok_or_else(|| anyhow!("unit {} not found", id))?;
        unit.status = status;
        Ok(())
    }

    pub fn update_location(&self, id: &str, location: GeoPoint) -> Result<()> {
        let mut units = self.units.write();
        let unit = units
            .iter_mut()
            .find(|unit| unit.id == id)
            .ok_or_else(|| anyhow!("unit {} not found", id))?;
        unit.current_location = Some(location);
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Option<TransportUnit> {
        let mut units = self.units.write();
        let index = units.iter().position(|unit| unit.id == id)?;
        Some(units.remove(index))
    }

    pub fn len(&self) -> usize {
        self.units.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.read().is_empty()
    }
}

#[async_trait]
impl UnitSource for InMemoryUnitSource {
    async fn fetch_units(&self) -> Result<Vec<TransportUnit>> {
        Ok(self.units.read().clone())
    }
}
