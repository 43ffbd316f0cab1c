//! Intake snapshot sources

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::intake::{IntakeEntry, IntakeStatus};

/// Supplies the queued intake records (waiting or in assessment).
#[async_trait]
pub trait IntakeSource: Send + Sync {
    async fn fetch_active(&self) -> Result<Vec<IntakeEntry>>;
}

#[derive(Debug, Default)]
pub struct InMemoryIntakeSource {
    entries: RwLock<Vec<IntakeEntry>>,
}

impl InMemoryIntakeSource {
    pub fn new(entries: Vec<IntakeEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn admit(&self, entry: IntakeEntry) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.iter().any(|existing| existing.id == entry.id) {
            return Err(anyhow!("intake {} already exists", entry.id));
        }
        entries.push(entry);
        Ok(())
    }

    pub fn transition(&self, id: &str, status: IntakeStatus) -> Result<()> {
        let mut entries = self.entries.write();
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| anyhow!("intake {} not found", id))?;
        entry.status = status;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl IntakeSource for InMemoryIntakeSource {
    async fn fetch_active(&self) -> Result<Vec<IntakeEntry>> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|entry| entry.status.is_queued())
            .cloned()
            .collect())
    }
}
