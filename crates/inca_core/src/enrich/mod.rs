pub mod categorize;
pub mod impact;
pub mod sla;

use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

use crate::config::{EngineConfig, ReportingCalendar};
use crate::domain::{BatchDiagnostics, EnrichedIncident, IncidentRecord, ValidationWarning};
use crate::normalize::timestamps::{canonical_rfc3339_utc, parse_timestamp};

/// Ordinal 1..=5 parsed from the leading digits of a priority label ("1 - Critical" -> 1).
pub fn priority_score(label: &str) -> Option<u8> {
    let digits: String = label
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let score = digits.parse::<u8>().ok()?;
    (1..=5).contains(&score).then_some(score)
}

fn hours_between(a: OffsetDateTime, b: OffsetDateTime) -> f64 {
    (b - a).as_seconds_f64() / 3600.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CalendarFields {
    year: Option<i32>,
    week: Option<u8>,
    month: Option<u8>,
    quarter: Option<u8>,
    day_of_week: Option<u8>,
    hour_of_day: Option<u8>,
    is_business_hours: Option<bool>,
}

fn calendar_fields(opened: Option<OffsetDateTime>, calendar: &ReportingCalendar) -> CalendarFields {
    let Some(opened) = opened else {
        return CalendarFields::default();
    };
    // Offsets are validated to +/-14h, so this conversion cannot fail.
    let offset = UtcOffset::from_whole_seconds(calendar.utc_offset_minutes * 60)
        .unwrap_or(UtcOffset::UTC);
    let local = opened.to_offset(offset);

    let month = local.month() as u8;
    let day_of_week = local.weekday().number_days_from_monday();
    let hour_of_day = local.hour();

    CalendarFields {
        year: Some(local.year()),
        week: Some(local.date().iso_week()),
        month: Some(month),
        quarter: Some((month + 2) / 3),
        day_of_week: Some(day_of_week),
        hour_of_day: Some(hour_of_day),
        is_business_hours: Some(
            calendar.business_days.contains(&day_of_week)
                && hour_of_day >= calendar.business_start_hour
                && hour_of_day < calendar.business_end_hour,
        ),
    }
}

fn enrich_one(
    record: &IncidentRecord,
    config: &EngineConfig,
    now: OffsetDateTime,
    diagnostics: &mut BatchDiagnostics,
) -> EnrichedIncident {
    let mut warnings = Vec::new();

    let opened = record
        .opened_at
        .as_deref()
        .and_then(|raw| parse_timestamp("opened_at", raw, &mut warnings));
    if record.opened_at.is_some() && opened.is_none() {
        diagnostics.timestamp_parse_failures += 1;
    }

    let resolved = record
        .resolved_at
        .as_deref()
        .and_then(|raw| parse_timestamp("resolved_at", raw, &mut warnings));
    if record.resolved_at.is_some() && resolved.is_none() {
        diagnostics.timestamp_parse_failures += 1;
    }

    let is_resolved = resolved.is_some();
    let state = record.state.trim();
    let is_terminal = config
        .terminal_states
        .iter()
        .any(|s| s.eq_ignore_ascii_case(state));
    let is_active = !is_terminal && resolved.is_none();

    let score = priority_score(&record.priority);
    if score.is_none() {
        diagnostics.unknown_priority_labels += 1;
        warnings.push(
            ValidationWarning::new(
                "ENRICH_PRIORITY_LABEL_UNKNOWN",
                "Priority label has no recognizable ordinal",
            )
            .with_details(format!("number={}; priority={}", record.number, record.priority)),
        );
    }
    let is_high_impact = matches!(score, Some(1 | 2));
    let is_critical = score == Some(1);

    let mut resolution_time_hrs = None;
    if let (Some(o), Some(r)) = (opened, resolved) {
        let hrs = hours_between(o, r);
        if hrs < 0.0 {
            diagnostics.negative_resolution_times += 1;
            warnings.push(
                ValidationWarning::new(
                    "ENRICH_NEGATIVE_RESOLUTION_TIME",
                    "Resolved before opened; resolution time withheld",
                )
                .with_details(format!("number={}; hours={hrs:.2}", record.number)),
            );
        } else {
            resolution_time_hrs = Some(hrs);
        }
    }

    let age_hrs = if is_active {
        opened.map(|o| hours_between(o, now))
    } else {
        None
    };

    let calendar = calendar_fields(opened, &config.calendar);

    let pattern_category = categorize::categorize(
        &config.categorization,
        &record.short_description,
        &record.description,
    );

    let (sla_breach, sla_margin_hrs) =
        match sla::evaluate(config, &record.priority, resolution_time_hrs, age_hrs) {
            Some(outcome) => (outcome.breach, outcome.margin_hrs),
            None => {
                diagnostics.missing_sla_thresholds += 1;
                (None, None)
            }
        };

    let user_impact_estimate = impact::estimate_user_impact(&record.ci_type, score, &record.scope);

    diagnostics.warnings.extend(warnings);

    EnrichedIncident {
        record: record.clone(),
        opened_ts: opened.and_then(canonical_rfc3339_utc),
        resolved_ts: resolved.and_then(canonical_rfc3339_utc),
        is_active,
        is_resolved,
        is_high_impact,
        is_critical,
        priority_score: score,
        age_hrs,
        age_days: age_hrs.map(|h| h / 24.0),
        resolution_time_hrs,
        resolution_time_days: resolution_time_hrs.map(|h| h / 24.0),
        year: calendar.year,
        week: calendar.week,
        month: calendar.month,
        quarter: calendar.quarter,
        day_of_week: calendar.day_of_week,
        hour_of_day: calendar.hour_of_day,
        is_business_hours: calendar.is_business_hours,
        pattern_category,
        sla_breach,
        sla_margin_hrs,
        user_impact_estimate,
    }
}

/// Run the full enrichment pipeline over one batch.
///
/// Contract:
/// - Pure function of (records, config, now); `now` is the caller's snapshot instant so
///   age-based fields are reproducible.
/// - Output cardinality and order equal the input; records are never dropped.
/// - Per-record anomalies null the affected fields and increment [`BatchDiagnostics`]
///   counters; nothing in this pass returns an error.
pub fn enrich_incidents(
    records: &[IncidentRecord],
    config: &EngineConfig,
    now: OffsetDateTime,
) -> (Vec<EnrichedIncident>, BatchDiagnostics) {
    let mut diagnostics = BatchDiagnostics::default();

    let enriched = records
        .iter()
        .map(|record| enrich_one(record, config, now, &mut diagnostics))
        .collect::<Vec<_>>();

    debug!(
        records = enriched.len(),
        ts_failures = diagnostics.timestamp_parse_failures,
        missing_sla = diagnostics.missing_sla_thresholds,
        "enrichment pass complete"
    );

    (enriched, diagnostics)
}
