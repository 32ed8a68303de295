//! Attribution manager
//!
//! Owns every attribution record. Records are built, revised and persisted
//! through an injected `AttributionStore`; the manager is the only writer.

use crate::export::{self, ExportFormat};
use crate::{
    AttributionConfig, AttributionError, AuditTrail, IntegrityIssue, IntegrityIssueKind,
    IntegrityReport, SourceContext, SourceTrace,
};
use serde_json::json;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use verbatim_domain::traits::AttributionStore;
use verbatim_domain::{
    now_millis, AttributionId, AttributionRecord, AttributionUpdate, AuditEvent, AuditEventType,
    Insight, InsightId, Quote, Relationship, RelationshipType, SourceReference, Transcript,
    TranscriptLine, TranscriptMetadata, VerificationMethod,
};
use verbatim_store::InMemoryStore;

/// Creates, versions, links, audits and exports attribution records
///
/// All methods take `&self`; the store sits behind a mutex so updates to a
/// record are serialized and its version increments stay gapless.
pub struct AttributionManager<S> {
    config: AttributionConfig,
    store: Mutex<S>,
}

impl AttributionManager<InMemoryStore> {
    /// Manager backed by a fresh in-memory store
    pub fn in_memory(config: AttributionConfig) -> Result<Self, AttributionError> {
        Self::new(InMemoryStore::new(), config)
    }
}

impl<S> AttributionManager<S>
where
    S: AttributionStore,
    S::Error: Display,
{
    /// Create a manager over `store`
    pub fn new(store: S, config: AttributionConfig) -> Result<Self, AttributionError> {
        config.validate().map_err(AttributionError::Config)?;
        Ok(Self {
            config,
            store: Mutex::new(store),
        })
    }

    /// The configuration the manager was built with
    pub fn config(&self) -> &AttributionConfig {
        &self.config
    }

    fn store(&self) -> Result<MutexGuard<'_, S>, AttributionError> {
        self.store
            .lock()
            .map_err(|_| AttributionError::Store("store lock poisoned".to_string()))
    }

    fn store_err(e: S::Error) -> AttributionError {
        AttributionError::Store(e.to_string())
    }

    fn record_event(
        &self,
        store: &mut S,
        id: AttributionId,
        event_type: AuditEventType,
        metadata: serde_json::Value,
    ) -> Result<(), AttributionError> {
        if !self.config.audit_trail {
            return Ok(());
        }
        store
            .append_event(id, AuditEvent::new(event_type, now_millis(), metadata))
            .map_err(Self::store_err)
    }

    /// Build and store an attribution for every quote on `insight`
    ///
    /// Returns `Structural` if the insight has no quotes, a quote's line range
    /// does not lie within `transcript`, or a resulting reference is
    /// malformed; nothing is stored in that case.
    ///
    /// A quote without a computed `confidence` (one that never went through
    /// verification) is recorded with confidence 0 and `low_confidence`.
    pub fn create_attribution(
        &self,
        insight: &Insight,
        transcript: &Transcript,
    ) -> Result<AttributionRecord, AttributionError> {
        for (idx, quote) in insight.quotes.iter().enumerate() {
            check_line_range(quote, transcript)
                .map_err(|e| AttributionError::Structural(format!("quote {}: {}", idx, e)))?;
            if quote.confidence.is_none() {
                warn!(
                    "Quote at {} line {} has no computed confidence; recording as low_confidence",
                    quote.source_file, quote.line_start
                );
            }
        }

        let source_references: Vec<SourceReference> = insight
            .quotes
            .iter()
            .map(|quote| self.build_reference(quote, transcript))
            .collect();

        if self.config.require_timestamps {
            for reference in source_references.iter().filter(|r| r.timestamp.is_none()) {
                warn!(
                    "Reference to {} line {} has no timestamp",
                    reference.file, reference.line_start
                );
            }
        }

        let record = AttributionRecord::new(
            insight.insight_id,
            source_references,
            TranscriptMetadata {
                filename: transcript.filename.clone(),
                total_lines: transcript.len(),
                metadata: transcript.metadata.clone(),
            },
            now_millis(),
        );
        record.validate().map_err(AttributionError::Structural)?;

        let mut store = self.store()?;
        store.put_attribution(record.clone()).map_err(Self::store_err)?;
        self.record_event(
            &mut store,
            record.attribution_id,
            AuditEventType::AttributionCreated,
            json!({ "source_count": record.source_references.len() }),
        )?;

        info!(
            "Created attribution {} for insight {} ({} sources)",
            record.attribution_id,
            record.insight_id,
            record.source_references.len()
        );
        Ok(record)
    }

    fn build_reference(&self, quote: &Quote, transcript: &Transcript) -> SourceReference {
        let window = self.config.context_window_sentences;
        let start_idx = transcript.index_of(quote.line_start);
        let end_idx = transcript.index_of(quote.line_end).or(start_idx);

        let join = |lines: &[TranscriptLine]| {
            if lines.is_empty() {
                None
            } else {
                Some(
                    lines
                        .iter()
                        .map(|l| l.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                )
            }
        };

        let context_before = start_idx
            .and_then(|idx| join(&transcript.content[idx.saturating_sub(window)..idx]));
        let context_after = end_idx.and_then(|idx| {
            let from = idx + 1;
            let to = (from + window).min(transcript.len());
            join(&transcript.content[from.min(to)..to])
        });

        let character_offset = start_idx
            .map(|idx| {
                let prior: usize = transcript.content[..idx]
                    .iter()
                    .map(|l| l.text.chars().count() + 1)
                    .sum();
                let line = &transcript.content[idx].text;
                let within = line
                    .find(&quote.text)
                    .map(|byte| line[..byte].chars().count())
                    .unwrap_or(0);
                prior + within
            })
            .unwrap_or(0);

        let timestamp = quote.timestamp.clone().or_else(|| {
            start_idx.and_then(|idx| transcript.content[idx].timestamp.clone())
        });

        let confidence = quote.confidence.unwrap_or(0.0);

        SourceReference {
            file: quote.source_file.clone(),
            line_start: quote.line_start,
            line_end: quote.line_end,
            timestamp,
            exact_quote: quote.text.clone(),
            context_before,
            context_after,
            confidence,
            verification_method: VerificationMethod::from_confidence(confidence),
            character_offset,
        }
    }

    /// Project a record into citation views
    ///
    /// Returns `None` when the record belongs to a different insight.
    pub fn trace_insight_to_source(
        &self,
        insight_id: InsightId,
        record: &AttributionRecord,
    ) -> Option<Vec<SourceTrace>> {
        if record.insight_id != insight_id {
            debug!(
                "Trace requested for insight {} but record belongs to {}",
                insight_id, record.insight_id
            );
            return None;
        }

        Some(
            record
                .source_references
                .iter()
                .map(|r| SourceTrace {
                    file: r.file.clone(),
                    line_numbers: r.line_numbers(),
                    span_lines: r.span_lines(),
                    timestamp: r.timestamp.clone(),
                    original_text: r.exact_quote.clone(),
                    context: SourceContext {
                        before: r.context_before.clone(),
                        after: r.context_after.clone(),
                    },
                    confidence: r.confidence,
                    character_offset: r.character_offset,
                })
                .collect(),
        )
    }

    /// Re-check every reference of `record` against `transcript`
    ///
    /// Never mutates the record; drift is reported, not repaired.
    pub fn check_source_integrity(
        &self,
        record: &AttributionRecord,
        transcript: &Transcript,
    ) -> IntegrityReport {
        let mut issues = Vec::new();
        let mut passed = Vec::new();

        let present: HashSet<u32> = transcript.content.iter().map(|l| l.line_number).collect();

        for (idx, reference) in record.source_references.iter().enumerate() {
            if let Some(gap) = missing_lines(reference, &present) {
                issues.push(IntegrityIssue {
                    kind: IntegrityIssueKind::MissingLines,
                    reference_index: idx,
                    message: format!(
                        "{} of lines {}-{} no longer exist in {} (first missing: {})",
                        gap.count, reference.line_start, reference.line_end, reference.file, gap.first
                    ),
                });
                continue;
            }

            let still_there = transcript
                .line(reference.line_start)
                .is_some_and(|line| line.text.contains(&reference.exact_quote));
            if !still_there {
                issues.push(IntegrityIssue {
                    kind: IntegrityIssueKind::QuoteMismatch,
                    reference_index: idx,
                    message: format!(
                        "Line {} of {} no longer contains the quoted text",
                        reference.line_start, reference.file
                    ),
                });
                continue;
            }

            passed.push(reference.confidence);
        }

        if !issues.is_empty() {
            warn!(
                "Attribution {} has {} integrity issue(s)",
                record.attribution_id,
                issues.len()
            );
        }

        let confidence_score = if passed.is_empty() {
            0.0
        } else {
            passed.iter().sum::<f64>() / passed.len() as f64
        };

        IntegrityReport {
            is_valid: issues.is_empty(),
            issues,
            confidence_score,
        }
    }

    /// Revise a stored record
    ///
    /// The prior state is appended to `version_history` (when version
    /// tracking is on) and the version is incremented by one.
    pub fn update_attribution(
        &self,
        id: AttributionId,
        update: AttributionUpdate,
    ) -> Result<AttributionRecord, AttributionError> {
        let mut store = self.store()?;
        let prior = store
            .get_attribution(id)
            .map_err(Self::store_err)?
            .ok_or(AttributionError::NotFound(id))?;

        let next = prior.revise(&update, now_millis(), self.config.track_versions);
        next.validate().map_err(AttributionError::Structural)?;

        store.put_attribution(next.clone()).map_err(Self::store_err)?;
        self.record_event(
            &mut store,
            id,
            AuditEventType::AttributionUpdated,
            json!({ "changed_fields": update.changed_fields(), "version": next.version }),
        )?;

        info!("Updated attribution {} to version {}", id, next.version);
        Ok(next)
    }

    /// Link two insights, storing the forward edge and its reverse together
    pub fn link_related_insights(
        &self,
        from: InsightId,
        to: InsightId,
        relationship_type: RelationshipType,
    ) -> Result<Relationship, AttributionError> {
        let forward = Relationship::new(from, to, relationship_type, now_millis());
        let reverse = forward.reversed();

        self.store()?
            .add_relationship_pair(forward.clone(), reverse)
            .map_err(Self::store_err)?;

        debug!(
            "Linked {} -[{}]-> {}",
            forward.from, forward.relationship_type, forward.to
        );
        Ok(forward)
    }

    /// Outgoing edges of an insight
    pub fn get_related_insights(&self, id: InsightId) -> Result<Vec<Relationship>, AttributionError> {
        self.store()?.get_relationships(id).map_err(Self::store_err)
    }

    /// Kind of the edge `from → to`, if linked
    pub fn get_relationship_type(
        &self,
        from: InsightId,
        to: InsightId,
    ) -> Result<Option<RelationshipType>, AttributionError> {
        Ok(self
            .get_related_insights(from)?
            .into_iter()
            .find(|r| r.to == to)
            .map(|r| r.relationship_type))
    }

    /// Every audit event of `record`, oldest first
    pub fn generate_audit_trail(
        &self,
        record: &AttributionRecord,
    ) -> Result<AuditTrail, AttributionError> {
        let mut events = self.get_audit_events(record.attribution_id)?;
        events.sort_by_key(|e| e.timestamp);

        Ok(AuditTrail {
            attribution_id: record.attribution_id,
            event_count: events.len(),
            events,
            created_at: record.created_at,
            updated_at: record.updated_at,
            version: record.version,
        })
    }

    /// Render a record as `json` or `markdown`
    pub fn export_attribution(
        &self,
        record: &AttributionRecord,
        format: &str,
    ) -> Result<String, AttributionError> {
        let format: ExportFormat = format.parse()?;
        export::render(record, format)
    }

    /// Look up a stored record
    pub fn get_attribution(
        &self,
        id: AttributionId,
    ) -> Result<Option<AttributionRecord>, AttributionError> {
        self.store()?.get_attribution(id).map_err(Self::store_err)
    }

    /// Stored audit events of a record, in insertion order
    pub fn get_audit_events(&self, id: AttributionId) -> Result<Vec<AuditEvent>, AttributionError> {
        self.store()?.get_events(id).map_err(Self::store_err)
    }
}

/// Lines of a reference absent from the checked transcript
struct LineGap {
    first: u32,
    count: u64,
}

/// Find the lines of `reference` missing from `present` in O(lines), whatever the span
fn missing_lines(reference: &SourceReference, present: &HashSet<u32>) -> Option<LineGap> {
    let span = u64::from(reference.line_end.saturating_sub(reference.line_start)) + 1;
    let range = reference.line_start..=reference.line_end;
    let found = present.iter().filter(|n| range.contains(*n)).count() as u64;
    if found >= span {
        return None;
    }
    // At most `found` present lines precede the first gap
    let first = range.clone().find(|n| !present.contains(n))?;
    Some(LineGap {
        first,
        count: span - found,
    })
}

/// A quote's range must name existing lines and fit within the transcript
fn check_line_range(quote: &Quote, transcript: &Transcript) -> Result<(), String> {
    if quote.line_end < quote.line_start {
        return Err(format!(
            "line_end {} < line_start {}",
            quote.line_end, quote.line_start
        ));
    }
    let span = u64::from(quote.line_end - quote.line_start) + 1;
    if span > transcript.len() as u64 {
        return Err(format!(
            "lines {}-{} span more than the {} lines of {}",
            quote.line_start,
            quote.line_end,
            transcript.len(),
            transcript.filename
        ));
    }
    for line in [quote.line_start, quote.line_end] {
        if transcript.index_of(line).is_none() {
            return Err(format!("line {} not in {}", line, transcript.filename));
        }
    }
    Ok(())
}
