use serde::{Deserialize, Serialize};

/// Canonical raw incident record produced by the schema normalizer.
///
/// Notes:
/// - Text fields default to `""` when the source column is absent; only the identifier,
///   priority and opened timestamp are required to resolve during normalization.
/// - `opened_at`/`resolved_at` keep the source text verbatim. Parsing happens during
///   enrichment so that an unparsable value degrades one record, never the batch.
/// - `reassignment_count` defaults to 0; non-numeric source values surface as warnings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentRecord {
    pub number: String,
    pub short_description: String,
    pub description: String,
    pub priority: String,
    pub state: String,
    pub opened_at: Option<String>,
    pub resolved_at: Option<String>,
    pub assignment_group: String,
    pub assigned_to: String,
    pub caller: String,
    pub cmdb_ci: String,
    pub ci_type: String,
    pub scope: String,
    pub reassignment_count: i64,
}

/// One incident after the enrichment pass: the raw record plus every derived analytical
/// column. Serialized under the analytical column names consumed by the reporting layer.
///
/// Enriched records are immutable value objects; downstream consumers (quality checker,
/// aggregators, recurrence detector) read them and emit side tables or summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedIncident {
    #[serde(flatten)]
    pub record: IncidentRecord,

    /// Canonical RFC3339 UTC forms of the opened/resolved timestamps, when parseable.
    pub opened_ts: Option<String>,
    pub resolved_ts: Option<String>,

    pub is_active: bool,
    pub is_resolved: bool,
    pub is_high_impact: bool,
    pub is_critical: bool,
    /// Ordinal 1..=5 parsed from the priority label ("1 - Critical" -> 1).
    pub priority_score: Option<u8>,

    pub age_hrs: Option<f64>,
    pub age_days: Option<f64>,
    pub resolution_time_hrs: Option<f64>,
    pub resolution_time_days: Option<f64>,

    pub year: Option<i32>,
    pub week: Option<u8>,
    pub month: Option<u8>,
    pub quarter: Option<u8>,
    /// 0 = Monday .. 6 = Sunday, in the configured reporting offset.
    pub day_of_week: Option<u8>,
    pub hour_of_day: Option<u8>,
    pub is_business_hours: Option<bool>,

    pub pattern_category: String,

    pub sla_breach: Option<bool>,
    /// Positive = hours of headroom, negative = hours over the deadline.
    pub sla_margin_hrs: Option<f64>,

    pub user_impact_estimate: i64,
}

/// Quality flags for one incident, emitted as a side table aligned with the enriched set
/// (same order, same cardinality) and keyed by the incident identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityFlags {
    pub number: String,
    pub quality_priority_mismatch: bool,
    pub quality_on_hold_abuse: bool,
    pub quality_poor_description: bool,
    pub quality_excessive_reassignments: bool,
    pub quality_issues_count: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Per-batch anomaly counters returned alongside the enriched dataset.
///
/// One malformed incident must never abort analysis of a batch: the affected fields are
/// nulled, the record is kept, and the anomaly shows up here instead of as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchDiagnostics {
    pub timestamp_parse_failures: u64,
    pub negative_resolution_times: u64,
    pub missing_sla_thresholds: u64,
    pub unknown_priority_labels: u64,
    pub warnings: Vec<ValidationWarning>,
}
