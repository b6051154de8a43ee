use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::config::EngineConfig;
use crate::domain::{BatchDiagnostics, EnrichedIncident, IncidentRecord, QualityFlags};
use crate::enrich::enrich_incidents;
use crate::error::EngineError;
use crate::ingest::RawTable;
use crate::metrics::{
    backlog_metrics, resolution_time_analysis, sla_metrics, BacklogMetrics,
    ResolutionTimeAnalysis, SlaMetrics,
};
use crate::normalize::normalize_table;
use crate::patterns::{find_recurring_issues, RecurringIssue};
use crate::quality::check_quality;

pub const ANALYSIS_SNAPSHOT_VERSION: u32 = 1;

/// Everything one batch invocation produces: the enriched dataset, the quality side
/// table, the three aggregate summaries, the recurrence list and the diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSnapshot {
    pub version: u32,
    pub incident_count: usize,
    pub enriched: Vec<EnrichedIncident>,
    pub quality: Vec<QualityFlags>,
    pub sla: SlaMetrics,
    pub resolution_times: ResolutionTimeAnalysis,
    pub backlog: BacklogMetrics,
    pub recurring_issues: Vec<RecurringIssue>,
    pub diagnostics: BatchDiagnostics,
}

/// Run enrichment plus every downstream consumer over one canonical batch.
///
/// Pure function of (records, config, now): no I/O, no shared state, nothing persisted.
/// Configuration is validated up front: a malformed rule table aborts before any record
/// is touched. Per-record anomalies never abort; they land in `diagnostics`.
pub fn analyze_batch(
    records: &[IncidentRecord],
    config: &EngineConfig,
    now: OffsetDateTime,
) -> Result<AnalysisSnapshot, EngineError> {
    config.validate()?;

    let (enriched, diagnostics) = enrich_incidents(records, config, now);
    let quality = check_quality(&enriched, &config.quality, now);
    let sla = sla_metrics(&enriched);
    let resolution_times = resolution_time_analysis(&enriched);
    let backlog = backlog_metrics(&enriched);
    let recurring_issues = find_recurring_issues(&enriched, config.min_recurrence);

    info!(
        incidents = enriched.len(),
        backlog = backlog.total_backlog,
        recurring = recurring_issues.len(),
        "batch analysis complete"
    );

    Ok(AnalysisSnapshot {
        version: ANALYSIS_SNAPSHOT_VERSION,
        incident_count: records.len(),
        enriched,
        quality,
        sla,
        resolution_times,
        backlog,
        recurring_issues,
        diagnostics,
    })
}

/// Convenience entry point for callers holding a raw table: normalize, then analyze.
/// Normalization warnings are folded into the snapshot diagnostics ahead of the
/// enrichment warnings.
pub fn analyze_table(
    table: &RawTable,
    config: &EngineConfig,
    now: OffsetDateTime,
) -> Result<AnalysisSnapshot, EngineError> {
    let (records, normalize_warnings) = normalize_table(table)?;
    let mut snapshot = analyze_batch(&records, config, now)?;
    snapshot
        .diagnostics
        .warnings
        .splice(0..0, normalize_warnings);
    Ok(snapshot)
}
