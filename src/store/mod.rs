// Persistent measurement cache: an in-memory map mirrored to a database on
// every mutation.

mod blob;
mod file;

pub use file::FileDatabase;

use crate::models::Measurement;
use std::collections::BTreeMap;

/// Measurements keyed by timestamp (ms since epoch).
pub type MeasurementMap = BTreeMap<u64, Measurement>;

/// Stores and restores a whole map at once.
pub trait Database {
    fn save(&self, map: &MeasurementMap) -> anyhow::Result<()>;
    fn load(&self) -> anyhow::Result<MeasurementMap>;
    fn name(&self) -> &str;
}

/// Map whose every mutation is written through to `D`.
///
/// A failed save is logged and the in-memory change is kept; the next
/// successful save persists it.
pub struct PersistentMap<D> {
    db: D,
    data: MeasurementMap,
}

impl<D: Database> PersistentMap<D> {
    pub fn open(db: D) -> anyhow::Result<Self> {
        let data = db.load()?;
        tracing::info!(db = db.name(), entries = data.len(), "measurement store loaded");
        Ok(Self { db, data })
    }

    pub fn insert(&mut self, measurement: Measurement) -> Option<Measurement> {
        let old = self.data.insert(measurement.timestamp, measurement);
        self.persist();
        old
    }

    pub fn remove(&mut self, timestamp: u64) -> Option<Measurement> {
        let old = self.data.remove(&timestamp);
        if old.is_some() {
            self.persist();
        }
        old
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.persist();
    }

    /// Drops the oldest entries until at most `max_entries` remain.
    /// Returns how many were dropped.
    pub fn prune_to(&mut self, max_entries: usize) -> usize {
        let excess = self.data.len().saturating_sub(max_entries);
        if excess == 0 {
            return 0;
        }
        let keep_from = self.data.keys().nth(excess).copied();
        self.data = match keep_from {
            Some(ts) => self.data.split_off(&ts),
            None => MeasurementMap::new(),
        };
        self.persist();
        excess
    }

    pub fn get(&self, timestamp: u64) -> Option<&Measurement> {
        self.data.get(&timestamp)
    }

    pub fn latest(&self) -> Option<&Measurement> {
        self.data.values().next_back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.data.values()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn name(&self) -> &str {
        self.db.name()
    }

    fn persist(&self) {
        if let Err(e) = self.db.save(&self.data) {
            tracing::warn!(
                db = self.db.name(),
                error = %e,
                operation = "save",
                "could not save measurements"
            );
        }
    }
}
