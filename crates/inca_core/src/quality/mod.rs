use std::collections::BTreeMap;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use crate::config::QualityConfig;
use crate::domain::{EnrichedIncident, QualityFlags};
use crate::stats::percentile_linear;

fn opened_instant(incident: &EnrichedIncident) -> Option<OffsetDateTime> {
    incident
        .opened_ts
        .as_deref()
        .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok())
}

/// Run the four structural quality detectors over an enriched batch.
///
/// Output is a side table aligned with the input (same order, same cardinality); the
/// enriched records themselves are never mutated. The four flags are independent: one
/// record can trigger all of them.
///
/// Detector policies:
/// - `quality_priority_mismatch`: high-impact record whose resolution time sits at or
///   below the configured percentile (default median) of its own priority tier's
///   resolution-time distribution. The comparison is inclusive, so a lone fast-resolved
///   critical still flags. Requires a resolution time; unresolved records never flag.
/// - `quality_on_hold_abuse`: state is an on-hold label and more than the configured
///   threshold of hours has passed since opening. Hold duration is approximated by record
///   age because state-transition history is not part of the batch.
/// - `quality_poor_description`: combined short + long description shorter than the
///   configured minimum after trimming.
/// - `quality_excessive_reassignments`: reassignment count strictly above the threshold.
pub fn check_quality(
    enriched: &[EnrichedIncident],
    config: &QualityConfig,
    now: OffsetDateTime,
) -> Vec<QualityFlags> {
    let mut tier_times: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for incident in enriched {
        if let Some(rt) = incident.resolution_time_hrs {
            tier_times
                .entry(incident.record.priority.as_str())
                .or_default()
                .push(rt);
        }
    }

    let tier_cutoffs: BTreeMap<&str, f64> = tier_times
        .iter()
        .filter_map(|(priority, times)| {
            percentile_linear(times, config.mismatch_percentile).map(|cutoff| (*priority, cutoff))
        })
        .collect();

    let flags = enriched
        .iter()
        .map(|incident| {
            let quality_priority_mismatch = match (incident.is_high_impact, incident.resolution_time_hrs)
            {
                (true, Some(rt)) => tier_cutoffs
                    .get(incident.record.priority.as_str())
                    .is_some_and(|cutoff| rt <= *cutoff),
                _ => false,
            };

            let state = incident.record.state.trim();
            let on_hold = config
                .on_hold_states
                .iter()
                .any(|s| s.eq_ignore_ascii_case(state));
            let hold_hrs =
                opened_instant(incident).map(|opened| (now - opened).as_seconds_f64() / 3600.0);
            let quality_on_hold_abuse =
                on_hold && hold_hrs.is_some_and(|h| h > config.on_hold_threshold_hrs);

            let combined = format!(
                "{} {}",
                incident.record.short_description, incident.record.description
            );
            let quality_poor_description =
                combined.trim().chars().count() < config.min_description_len;

            let quality_excessive_reassignments =
                incident.record.reassignment_count > config.reassignment_threshold;

            let quality_issues_count = [
                quality_priority_mismatch,
                quality_on_hold_abuse,
                quality_poor_description,
                quality_excessive_reassignments,
            ]
            .iter()
            .filter(|flag| **flag)
            .count() as u8;

            QualityFlags {
                number: incident.record.number.clone(),
                quality_priority_mismatch,
                quality_on_hold_abuse,
                quality_poor_description,
                quality_excessive_reassignments,
                quality_issues_count,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        flagged = flags.iter().filter(|f| f.quality_issues_count > 0).count(),
        total = flags.len(),
        "quality checks complete"
    );

    flags
}
