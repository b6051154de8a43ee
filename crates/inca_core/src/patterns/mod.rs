use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::EnrichedIncident;
use crate::normalize::timestamps::canonical_rfc3339_utc;

/// One recurring (category, asset) combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurringIssue {
    pub category: String,
    pub asset: String,
    pub occurrences: usize,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
}

#[derive(Default)]
struct GroupAccumulator {
    occurrences: usize,
    first: Option<OffsetDateTime>,
    last: Option<OffsetDateTime>,
}

/// Surface repeated (pattern category, configuration item) combinations.
///
/// This is a grouping and counting pass, not an anomaly detector: correctness rests on
/// the stable grouping key and the deterministic sort. Groups with fewer than
/// `min_occurrences` incidents are dropped, as are records with a blank asset identifier
/// (there is nothing to recur on). Output order: occurrence count descending, then most
/// recent last-occurrence first, then category and asset ascending.
pub fn find_recurring_issues(
    enriched: &[EnrichedIncident],
    min_occurrences: usize,
) -> Vec<RecurringIssue> {
    let mut groups: BTreeMap<(String, String), GroupAccumulator> = BTreeMap::new();

    for incident in enriched {
        let asset = incident.record.cmdb_ci.trim();
        if asset.is_empty() {
            continue;
        }

        let group = groups
            .entry((incident.pattern_category.clone(), asset.to_string()))
            .or_default();
        group.occurrences += 1;

        let opened = incident
            .opened_ts
            .as_deref()
            .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok());
        if let Some(opened) = opened {
            group.first = Some(group.first.map_or(opened, |f| f.min(opened)));
            group.last = Some(group.last.map_or(opened, |l| l.max(opened)));
        }
    }

    let mut recurring = groups
        .into_iter()
        .filter(|(_, group)| group.occurrences >= min_occurrences)
        .collect::<Vec<_>>();

    recurring.sort_by_key(|((category, asset), group)| {
        (
            Reverse(group.occurrences),
            Reverse(group.last),
            category.clone(),
            asset.clone(),
        )
    });

    debug!(groups = recurring.len(), min_occurrences, "recurring-issue pass complete");

    recurring
        .into_iter()
        .map(|((category, asset), group)| RecurringIssue {
            category,
            asset,
            occurrences: group.occurrences,
            first_seen: group.first.and_then(canonical_rfc3339_utc),
            last_seen: group.last.and_then(canonical_rfc3339_utc),
        })
        .collect()
}
