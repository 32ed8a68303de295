//! In-process attribution store

use crate::StoreError;
use std::collections::HashMap;
use verbatim_domain::traits::AttributionStore;
use verbatim_domain::{AttributionId, AttributionRecord, AuditEvent, InsightId, Relationship};

/// HashMap-backed implementation of `AttributionStore`
///
/// Nothing survives the process. Operations never fail; the error type is
/// shared with `SqliteStore` so callers can swap one for the other.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    records: HashMap<AttributionId, AttributionRecord>,
    events: HashMap<AttributionId, Vec<AuditEvent>>,
    relationships: HashMap<InsightId, Vec<Relationship>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record is stored
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn upsert_edge(&mut self, edge: Relationship) {
        let edges = self.relationships.entry(edge.from).or_default();
        match edges.iter_mut().find(|e| e.to == edge.to) {
            Some(existing) => *existing = edge,
            None => edges.push(edge),
        }
    }
}

impl AttributionStore for InMemoryStore {
    type Error = StoreError;

    fn get_attribution(&self, id: AttributionId) -> Result<Option<AttributionRecord>, Self::Error> {
        Ok(self.records.get(&id).cloned())
    }

    fn put_attribution(&mut self, record: AttributionRecord) -> Result<(), Self::Error> {
        self.records.insert(record.attribution_id, record);
        Ok(())
    }

    fn append_event(&mut self, id: AttributionId, event: AuditEvent) -> Result<(), Self::Error> {
        self.events.entry(id).or_default().push(event);
        Ok(())
    }

    fn get_events(&self, id: AttributionId) -> Result<Vec<AuditEvent>, Self::Error> {
        Ok(self.events.get(&id).cloned().unwrap_or_default())
    }

    fn add_relationship_pair(
        &mut self,
        forward: Relationship,
        reverse: Relationship,
    ) -> Result<(), Self::Error> {
        self.upsert_edge(forward);
        self.upsert_edge(reverse);
        Ok(())
    }

    fn get_relationships(&self, id: InsightId) -> Result<Vec<Relationship>, Self::Error> {
        Ok(self.relationships.get(&id).cloned().unwrap_or_default())
    }
}
