use pretty_assertions::assert_eq;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use inca_core::config::EngineConfig;
use inca_core::domain::IncidentRecord;
use inca_core::enrich::enrich_incidents;
use inca_core::metrics::{backlog_metrics, resolution_time_analysis, sla_metrics};

fn ts(s: &str) -> OffsetDateTime {
    OffsetDateTime::parse(s, &Rfc3339).expect("test timestamp")
}

fn resolved(number: &str, priority: &str, opened: &str, resolved_at: &str) -> IncidentRecord {
    IncidentRecord {
        number: number.to_string(),
        priority: priority.to_string(),
        state: "Resolved".to_string(),
        opened_at: Some(opened.to_string()),
        resolved_at: Some(resolved_at.to_string()),
        ..Default::default()
    }
}

fn active(number: &str, priority: &str, opened: &str) -> IncidentRecord {
    IncidentRecord {
        number: number.to_string(),
        priority: priority.to_string(),
        state: "In Progress".to_string(),
        opened_at: Some(opened.to_string()),
        ..Default::default()
    }
}

#[test]
fn sla_metrics_split_by_priority_and_skip_unevaluated_tiers() {
    let now = ts("2026-02-01T00:00:00Z");
    let records = vec![
        // Critical, 4h threshold: one breach (5h), one met (3h).
        resolved("INC1", "1 - Critical", "2026-01-01T00:00:00Z", "2026-01-01T05:00:00Z"),
        resolved("INC2", "1 - Critical", "2026-01-02T00:00:00Z", "2026-01-02T03:00:00Z"),
        // High, 24h threshold: one breach (30h).
        resolved("INC3", "2 - High", "2026-01-03T00:00:00Z", "2026-01-04T06:00:00Z"),
        // No configured threshold: resolved but unevaluated.
        resolved("INC4", "5 - Planning", "2026-01-04T00:00:00Z", "2026-01-04T10:00:00Z"),
        // Active records stay out of SLA compliance entirely.
        active("INC5", "1 - Critical", "2026-01-30T00:00:00Z"),
    ];

    let (enriched, _) = enrich_incidents(&records, &EngineConfig::default(), now);
    let metrics = sla_metrics(&enriched);

    assert_eq!(metrics.total_resolved, 4);
    assert_eq!(metrics.sla_met, 1);
    assert_eq!(metrics.sla_breached, 2);
    assert_eq!(metrics.breach_rate_pct, Some(66.67));

    let critical = &metrics.by_priority["1 - Critical"];
    assert_eq!(critical.total, 2);
    assert_eq!(critical.met, 1);
    assert_eq!(critical.breached, 1);
    assert_eq!(critical.breach_rate_pct, Some(50.0));

    // Whole tier unevaluated: rate is null, never a division error.
    let planning = &metrics.by_priority["5 - Planning"];
    assert_eq!(planning.total, 1);
    assert_eq!(planning.breach_rate_pct, None);
}

#[test]
fn resolution_stats_use_linear_interpolation_percentiles() {
    let now = ts("2026-02-01T00:00:00Z");
    // Resolution times 1h, 2h, 3h, 4h, 10h.
    let records = vec![
        resolved("INC1", "3 - Moderate", "2026-01-01T00:00:00Z", "2026-01-01T01:00:00Z"),
        resolved("INC2", "3 - Moderate", "2026-01-02T00:00:00Z", "2026-01-02T02:00:00Z"),
        resolved("INC3", "3 - Moderate", "2026-01-03T00:00:00Z", "2026-01-03T03:00:00Z"),
        resolved("INC4", "3 - Moderate", "2026-01-04T00:00:00Z", "2026-01-04T04:00:00Z"),
        resolved("INC5", "3 - Moderate", "2026-01-05T00:00:00Z", "2026-01-05T10:00:00Z"),
    ];

    let (enriched, _) = enrich_incidents(&records, &EngineConfig::default(), now);
    let analysis = resolution_time_analysis(&enriched);

    let overall = analysis.overall.expect("resolved records present");
    assert_eq!(overall.count, 5);
    assert_eq!(overall.mean_hrs, 4.0);
    assert_eq!(overall.median_hrs, 3.0);
    // rank h = 0.9 * 4 = 3.6 -> 4 + 0.6 * (10 - 4).
    assert_eq!(overall.percentile_90_hrs, 7.6);

    assert_eq!(analysis.by_priority["3 - Moderate"].count, 5);
    assert_eq!(analysis.by_category["Uncategorized"].median_hrs, 3.0);
}

#[test]
fn resolution_stats_are_null_when_nothing_is_resolved() {
    let now = ts("2026-02-01T00:00:00Z");
    let records = vec![active("INC1", "2 - High", "2026-01-30T00:00:00Z")];

    let (enriched, _) = enrich_incidents(&records, &EngineConfig::default(), now);
    let analysis = resolution_time_analysis(&enriched);
    assert!(analysis.overall.is_none());
    assert!(analysis.by_priority.is_empty());

    let sla = sla_metrics(&enriched);
    assert_eq!(sla.total_resolved, 0);
    assert_eq!(sla.breach_rate_pct, None);
}

#[test]
fn backlog_buckets_ages_with_inclusive_lower_edges() {
    let now = ts("2026-03-01T00:00:00Z");
    let records = vec![
        // 12h old.
        active("INC1", "1 - Critical", "2026-02-28T12:00:00Z"),
        // Exactly 24h old: lands in the second band, not the first.
        active("INC2", "2 - High", "2026-02-28T00:00:00Z"),
        // 5 days.
        active("INC3", "2 - High", "2026-02-24T00:00:00Z"),
        // 10 days.
        active("INC4", "3 - Moderate", "2026-02-19T00:00:00Z"),
        // 33.5 days.
        active("INC5", "4 - Low", "2026-01-26T12:00:00Z"),
        // Unparsable opened: counted in the backlog, not ageable into a band.
        active("INC6", "4 - Low", "when it rained"),
        // Resolved records are not backlog.
        resolved("INC7", "1 - Critical", "2026-02-01T00:00:00Z", "2026-02-01T02:00:00Z"),
    ];

    let (enriched, _) = enrich_incidents(&records, &EngineConfig::default(), now);
    let backlog = backlog_metrics(&enriched);

    assert_eq!(backlog.total_backlog, 6);

    let bands: Vec<(&str, usize)> = backlog
        .by_age
        .iter()
        .map(|b| (b.key.as_str(), b.count))
        .collect();
    assert_eq!(
        bands,
        vec![
            ("less_than_24h", 1),
            ("24h_to_3days", 1),
            ("3days_to_1week", 1),
            ("1week_to_1month", 1),
            ("more_than_1month", 1),
        ]
    );

    // (0.5 + 1 + 5 + 10 + 33.5) / 5 days.
    assert_eq!(backlog.avg_age_days, Some(10.0));
    assert_eq!(backlog.by_priority["2 - High"], 2);
    assert_eq!(backlog.by_priority["4 - Low"], 2);
}

#[test]
fn empty_backlog_yields_zero_bands_and_null_average() {
    let now = ts("2026-03-01T00:00:00Z");
    let records = vec![resolved(
        "INC1",
        "1 - Critical",
        "2026-02-01T00:00:00Z",
        "2026-02-01T02:00:00Z",
    )];

    let (enriched, _) = enrich_incidents(&records, &EngineConfig::default(), now);
    let backlog = backlog_metrics(&enriched);

    assert_eq!(backlog.total_backlog, 0);
    assert_eq!(backlog.by_age.len(), 5, "all bands always present");
    assert!(backlog.by_age.iter().all(|b| b.count == 0));
    assert_eq!(backlog.avg_age_days, None);
}
