//! Integration tests for verbatim-store
//!
//! The same scenarios run against both store implementations.

use anyhow::Result;
use serde_json::json;
use verbatim_domain::traits::AttributionStore;
use verbatim_domain::{
    AttributionId, AttributionRecord, AttributionUpdate, AuditEvent, AuditEventType, InsightId,
    Relationship, RelationshipType, SourceReference, TranscriptMetadata, VerificationMethod,
};
use verbatim_store::{InMemoryStore, SqliteStore, StoreError};

fn reference(quote: &str, confidence: f64) -> SourceReference {
    SourceReference {
        file: "standup.txt".to_string(),
        line_start: 3,
        line_end: 3,
        timestamp: Some("00:00:12".to_string()),
        exact_quote: quote.to_string(),
        context_before: Some("Morning everyone.".to_string()),
        context_after: None,
        confidence,
        verification_method: VerificationMethod::from_confidence(confidence),
        character_offset: 42,
    }
}

fn record() -> AttributionRecord {
    AttributionRecord::new(
        InsightId::new(),
        vec![reference("the deploy pipeline is flaky", 1.0)],
        TranscriptMetadata {
            filename: "standup.txt".to_string(),
            total_lines: 9,
            ..TranscriptMetadata::default()
        },
        1_000,
    )
}

fn record_round_trip<S>(store: &mut S) -> Result<()>
where
    S: AttributionStore<Error = StoreError>,
{
    let original = record();
    store.put_attribution(original.clone())?;
    assert_eq!(store.get_attribution(original.attribution_id)?, Some(original.clone()));

    let revised = original.revise(
        &AttributionUpdate::source_references(vec![reference("the pipeline is flaky", 0.85)]),
        2_000,
        true,
    );
    store.put_attribution(revised.clone())?;

    let stored = store
        .get_attribution(original.attribution_id)?
        .expect("record present");
    assert_eq!(stored.version, 2);
    assert_eq!(stored.version_history.len(), 1);
    assert_eq!(stored.version_history[0].data, original.snapshot());
    assert!(store.get_attribution(AttributionId::new())?.is_none());
    Ok(())
}

fn events_are_append_only<S>(store: &mut S) -> Result<()>
where
    S: AttributionStore<Error = StoreError>,
{
    let id = AttributionId::new();
    store.append_event(
        id,
        AuditEvent::new(AuditEventType::AttributionCreated, 1, json!({ "source_count": 1 })),
    )?;
    store.append_event(
        id,
        AuditEvent::new(
            AuditEventType::AttributionUpdated,
            2,
            json!({ "changed_fields": ["source_references"] }),
        ),
    )?;

    let events = store.get_events(id)?;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, AuditEventType::AttributionCreated);
    assert_eq!(events[0].metadata["source_count"], 1);
    assert_eq!(events[1].metadata["changed_fields"][0], "source_references");
    assert!(store.get_events(AttributionId::new())?.is_empty());
    Ok(())
}

fn relationships_are_symmetric<S>(store: &mut S) -> Result<()>
where
    S: AttributionStore<Error = StoreError>,
{
    let a = InsightId::new();
    let b = InsightId::new();
    let c = InsightId::new();

    let ab = Relationship::new(a, b, RelationshipType::Supports, 10);
    store.add_relationship_pair(ab.clone(), ab.reversed())?;
    let ac = Relationship::new(a, c, RelationshipType::from("elaborates"), 11);
    store.add_relationship_pair(ac.clone(), ac.reversed())?;

    let from_a = store.get_relationships(a)?;
    assert_eq!(from_a, vec![ab.clone(), ac.clone()]);

    let from_b = store.get_relationships(b)?;
    assert_eq!(from_b.len(), 1);
    assert_eq!(from_b[0].to, a);
    assert_eq!(from_b[0].relationship_type, RelationshipType::SupportedBy);

    let from_c = store.get_relationships(c)?;
    assert_eq!(from_c[0].relationship_type, RelationshipType::from("elaborates"));

    // Re-linking the same pair replaces the kind on both sides
    let ab2 = Relationship::new(a, b, RelationshipType::DependsOn, 12);
    store.add_relationship_pair(ab2.clone(), ab2.reversed())?;
    assert_eq!(store.get_relationships(a)?.len(), 2);
    assert_eq!(
        store.get_relationships(b)?[0].relationship_type,
        RelationshipType::DependedOnBy
    );
    Ok(())
}

#[test]
fn test_memory_store_records() -> Result<()> {
    record_round_trip(&mut InMemoryStore::new())
}

#[test]
fn test_sqlite_store_records() -> Result<()> {
    record_round_trip(&mut SqliteStore::new(":memory:")?)
}

#[test]
fn test_memory_store_events() -> Result<()> {
    events_are_append_only(&mut InMemoryStore::new())
}

#[test]
fn test_sqlite_store_events() -> Result<()> {
    events_are_append_only(&mut SqliteStore::new(":memory:")?)
}

#[test]
fn test_memory_store_relationships() -> Result<()> {
    relationships_are_symmetric(&mut InMemoryStore::new())
}

#[test]
fn test_sqlite_store_relationships() -> Result<()> {
    relationships_are_symmetric(&mut SqliteStore::new(":memory:")?)
}

#[test]
fn test_sqlite_store_persists_across_connections() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("verbatim.db");
    let original = record();

    {
        let mut store = SqliteStore::new(&path)?;
        store.put_attribution(original.clone())?;
        store.append_event(
            original.attribution_id,
            AuditEvent::new(AuditEventType::AttributionCreated, 1_000, json!({ "source_count": 1 })),
        )?;
    }

    let store = SqliteStore::new(&path)?;
    assert_eq!(store.count_attributions()?, 1);
    assert_eq!(store.get_attribution(original.attribution_id)?, Some(original.clone()));
    assert_eq!(store.get_events(original.attribution_id)?.len(), 1);
    Ok(())
}

#[test]
fn test_sqlite_store_keeps_exact_float_bits() -> Result<()> {
    let mut store = SqliteStore::new(":memory:")?;
    let mut original = record();
    original.source_references = [1.0 / 3.0 * 0.8, 13.0 / 47.0 * 0.6, 0.1 + 0.2]
        .into_iter()
        .map(|c| reference("the deploy pipeline is flaky", c))
        .collect();
    store.put_attribution(original.clone())?;

    let stored = store
        .get_attribution(original.attribution_id)?
        .expect("record present");
    for (got, want) in stored.source_references.iter().zip(&original.source_references) {
        assert_eq!(got.confidence.to_bits(), want.confidence.to_bits());
    }
    Ok(())
}
