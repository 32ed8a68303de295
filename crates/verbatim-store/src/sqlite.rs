//! SQLite-backed attribution store

use crate::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use verbatim_domain::traits::AttributionStore;
use verbatim_domain::{
    AttributionId, AttributionRecord, AuditEvent, AuditEventType, InsightId, Relationship,
    RelationshipType,
};

/// SQLite-based implementation of `AttributionStore`
///
/// Each record is stored whole as a JSON body, including its version history,
/// so a read returns exactly what was written.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store behind a mutex or
/// give each thread its own `SqliteStore` instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use verbatim_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("verbatim.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn id_to_bytes(value: u128) -> Vec<u8> {
        value.to_be_bytes().to_vec()
    }

    fn bytes_to_value(bytes: &[u8]) -> Result<u128, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for ID, got {}", bytes.len()))
        })?;
        Ok(u128::from_be_bytes(arr))
    }

    /// Number of stored records
    pub fn count_attributions(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM attributions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl AttributionStore for SqliteStore {
    type Error = StoreError;

    fn get_attribution(&self, id: AttributionId) -> Result<Option<AttributionRecord>, Self::Error> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM attributions WHERE id = ?1",
                params![Self::id_to_bytes(id.value())],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    fn put_attribution(&mut self, record: AttributionRecord) -> Result<(), Self::Error> {
        let body = serde_json::to_string(&record)?;

        self.conn.execute(
            "INSERT INTO attributions (id, insight_id, version, body)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                insight_id = excluded.insight_id,
                version = excluded.version,
                body = excluded.body",
            params![
                Self::id_to_bytes(record.attribution_id.value()),
                Self::id_to_bytes(record.insight_id.value()),
                record.version as i64,
                body,
            ],
        )?;

        Ok(())
    }

    fn append_event(&mut self, id: AttributionId, event: AuditEvent) -> Result<(), Self::Error> {
        let metadata = serde_json::to_string(&event.metadata)?;

        self.conn.execute(
            "INSERT INTO audit_events (attribution_id, event_type, timestamp, metadata)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                Self::id_to_bytes(id.value()),
                event.event_type.as_str(),
                event.timestamp as i64,
                metadata,
            ],
        )?;

        Ok(())
    }

    fn get_events(&self, id: AttributionId) -> Result<Vec<AuditEvent>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT event_type, timestamp, metadata
             FROM audit_events WHERE attribution_id = ?1 ORDER BY seq",
        )?;

        let rows = stmt
            .query_map(params![Self::id_to_bytes(id.value())], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(event_type, timestamp, metadata)| {
                let event_type = AuditEventType::parse(&event_type).ok_or_else(|| {
                    StoreError::InvalidData(format!("Unknown audit event type: {}", event_type))
                })?;
                Ok(AuditEvent::new(
                    event_type,
                    timestamp as u64,
                    serde_json::from_str(&metadata)?,
                ))
            })
            .collect()
    }

    fn add_relationship_pair(
        &mut self,
        forward: Relationship,
        reverse: Relationship,
    ) -> Result<(), Self::Error> {
        let tx = self.conn.transaction()?;

        for edge in [&forward, &reverse] {
            tx.execute(
                "INSERT INTO relationships (from_id, to_id, relationship_type, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(from_id, to_id) DO UPDATE SET
                    relationship_type = excluded.relationship_type,
                    created_at = excluded.created_at",
                params![
                    Self::id_to_bytes(edge.from.value()),
                    Self::id_to_bytes(edge.to.value()),
                    edge.relationship_type.as_str(),
                    edge.created_at as i64,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn get_relationships(&self, id: InsightId) -> Result<Vec<Relationship>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT to_id, relationship_type, created_at
             FROM relationships WHERE from_id = ?1 ORDER BY seq",
        )?;

        let rows = stmt
            .query_map(params![Self::id_to_bytes(id.value())], |row| {
                Ok((
                    row.get::<_, Vec<u8>>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(to, kind, created_at)| {
                Ok(Relationship::new(
                    id,
                    InsightId::from_value(Self::bytes_to_value(&to)?),
                    RelationshipType::parse(&kind),
                    created_at as u64,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_bytes_round_trip() {
        let id = InsightId::new();
        let bytes = SqliteStore::id_to_bytes(id.value());
        assert_eq!(bytes.len(), 16);
        assert_eq!(SqliteStore::bytes_to_value(&bytes).unwrap(), id.value());
    }

    #[test]
    fn test_rejects_short_id_bytes() {
        let err = SqliteStore::bytes_to_value(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn test_events_keep_insertion_order() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let id = AttributionId::new();

        store
            .append_event(
                id,
                AuditEvent::new(AuditEventType::AttributionUpdated, 50, serde_json::json!({})),
            )
            .unwrap();
        store
            .append_event(
                id,
                AuditEvent::new(AuditEventType::AttributionCreated, 10, serde_json::json!({})),
            )
            .unwrap();

        let events = store.get_events(id).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, 50);
        assert_eq!(events[1].timestamp, 10);
    }
}
