use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::EnrichedIncident;
use crate::stats::{mean, median, percentile_linear, round2};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SlaTierMetrics {
    pub total: usize,
    pub met: usize,
    pub breached: usize,
    /// None when no record in the tier could be evaluated against a threshold.
    pub breach_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SlaMetrics {
    pub total_resolved: usize,
    pub sla_met: usize,
    pub sla_breached: usize,
    pub breach_rate_pct: Option<f64>,
    pub by_priority: BTreeMap<String, SlaTierMetrics>,
}

fn breach_rate(met: usize, breached: usize) -> Option<f64> {
    let evaluated = met + breached;
    if evaluated == 0 {
        return None;
    }
    Some(round2(breached as f64 / evaluated as f64 * 100.0))
}

/// SLA compliance over the resolved portion of the batch.
///
/// Records whose priority has no configured threshold count toward the resolved totals
/// but not toward met/breached; rates divide by the evaluated subset and are None (never
/// a division error) when that subset is empty.
pub fn sla_metrics(enriched: &[EnrichedIncident]) -> SlaMetrics {
    let mut metrics = SlaMetrics::default();

    for incident in enriched {
        if incident.resolution_time_hrs.is_none() {
            continue;
        }
        metrics.total_resolved += 1;

        let tier = metrics
            .by_priority
            .entry(incident.record.priority.clone())
            .or_default();
        tier.total += 1;

        match incident.sla_breach {
            Some(true) => {
                metrics.sla_breached += 1;
                tier.breached += 1;
            }
            Some(false) => {
                metrics.sla_met += 1;
                tier.met += 1;
            }
            None => {}
        }
    }

    metrics.breach_rate_pct = breach_rate(metrics.sla_met, metrics.sla_breached);
    for tier in metrics.by_priority.values_mut() {
        tier.breach_rate_pct = breach_rate(tier.met, tier.breached);
    }

    debug!(
        total_resolved = metrics.total_resolved,
        breached = metrics.sla_breached,
        "SLA metrics computed"
    );

    metrics
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolutionStats {
    pub count: usize,
    pub mean_hrs: f64,
    pub median_hrs: f64,
    pub percentile_90_hrs: f64,
}

fn resolution_stats(times: &[f64]) -> Option<ResolutionStats> {
    Some(ResolutionStats {
        count: times.len(),
        mean_hrs: round2(mean(times)?),
        median_hrs: round2(median(times)?),
        percentile_90_hrs: round2(percentile_linear(times, 90.0)?),
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResolutionTimeAnalysis {
    pub overall: Option<ResolutionStats>,
    pub by_priority: BTreeMap<String, ResolutionStats>,
    pub by_category: BTreeMap<String, ResolutionStats>,
}

/// Resolution-time distribution over resolved records, overall and broken out by
/// priority and pattern category. Percentiles use the linear-interpolation convention
/// documented in [`crate::stats::percentile_linear`].
pub fn resolution_time_analysis(enriched: &[EnrichedIncident]) -> ResolutionTimeAnalysis {
    let mut overall_times = Vec::new();
    let mut priority_times: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut category_times: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for incident in enriched {
        let Some(rt) = incident.resolution_time_hrs else {
            continue;
        };
        overall_times.push(rt);
        priority_times
            .entry(incident.record.priority.clone())
            .or_default()
            .push(rt);
        category_times
            .entry(incident.pattern_category.clone())
            .or_default()
            .push(rt);
    }

    ResolutionTimeAnalysis {
        overall: resolution_stats(&overall_times),
        by_priority: priority_times
            .into_iter()
            .filter_map(|(k, times)| resolution_stats(&times).map(|s| (k, s)))
            .collect(),
        by_category: category_times
            .into_iter()
            .filter_map(|(k, times)| resolution_stats(&times).map(|s| (k, s)))
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgeBucket {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BacklogMetrics {
    pub total_backlog: usize,
    /// Fixed bands, always all five and always in ascending-age order.
    pub by_age: Vec<AgeBucket>,
    pub by_priority: BTreeMap<String, usize>,
    pub avg_age_days: Option<f64>,
}

const AGE_BAND_KEYS: [&str; 5] = [
    "less_than_24h",
    "24h_to_3days",
    "3days_to_1week",
    "1week_to_1month",
    "more_than_1month",
];

/// Band index for an active record's age. Edges in days are [0,1), [1,3), [3,7), [7,30),
/// [30,inf), lower-inclusive, so an age of exactly 24.0 hours lands in `24h_to_3days`.
fn age_band_index(age_days: f64) -> usize {
    if age_days < 1.0 {
        0
    } else if age_days < 3.0 {
        1
    } else if age_days < 7.0 {
        2
    } else if age_days < 30.0 {
        3
    } else {
        4
    }
}

/// Backlog composition over the active portion of the batch. Ages come from the
/// enrichment pass, so the bucketing reflects the same snapshot instant.
pub fn backlog_metrics(enriched: &[EnrichedIncident]) -> BacklogMetrics {
    let mut band_counts = [0usize; 5];
    let mut by_priority: BTreeMap<String, usize> = BTreeMap::new();
    let mut ages = Vec::new();
    let mut total_backlog = 0;

    for incident in enriched {
        if !incident.is_active {
            continue;
        }
        total_backlog += 1;
        *by_priority
            .entry(incident.record.priority.clone())
            .or_default() += 1;

        // Records with an unparsable opened timestamp stay in the backlog total but
        // cannot be aged into a band.
        if let Some(age_days) = incident.age_days {
            band_counts[age_band_index(age_days)] += 1;
            ages.push(age_days);
        }
    }

    BacklogMetrics {
        total_backlog,
        by_age: AGE_BAND_KEYS
            .iter()
            .zip(band_counts)
            .map(|(key, count)| AgeBucket {
                key: key.to_string(),
                count,
            })
            .collect(),
        by_priority,
        avg_age_days: mean(&ages).map(round2),
    }
}
