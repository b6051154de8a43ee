pub mod timestamps;

use std::collections::BTreeSet;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::{IncidentRecord, ValidationWarning};
use crate::error::EngineError;
use crate::ingest::RawTable;

/// Alias lists for each canonical field, in preference order: when a source table carries
/// several recognized headers for one field, the first listed alias wins.
const NUMBER_ALIASES: &[&str] = &["number", "incident_number", "sys_id"];
const SHORT_DESCRIPTION_ALIASES: &[&str] = &["short_description", "summary", "title"];
const DESCRIPTION_ALIASES: &[&str] = &["description", "long_description", "notes"];
const PRIORITY_ALIASES: &[&str] = &["priority", "u_priority"];
const STATE_ALIASES: &[&str] = &["incident_state", "state", "status"];
const OPENED_ALIASES: &[&str] = &["opened", "opened_at", "sys_created_on"];
const RESOLVED_ALIASES: &[&str] = &["resolved", "resolved_at", "u_resolved"];
const ASSIGNMENT_GROUP_ALIASES: &[&str] = &["assignment_group", "assigned_group"];
const ASSIGNED_TO_ALIASES: &[&str] = &["assigned_to", "assignee"];
const CALLER_ALIASES: &[&str] = &["caller_id", "caller", "opened_by"];
const CMDB_CI_ALIASES: &[&str] = &["cmdb_ci", "ci", "configuration_item"];
const CI_TYPE_ALIASES: &[&str] = &["u_ci_type", "ci_type"];
const SCOPE_ALIASES: &[&str] = &["u_scope", "scope", "impact_scope"];
const REASSIGNMENT_COUNT_ALIASES: &[&str] = &["reassignment_count", "u_reassignment_count"];

fn resolve_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        if let Some(idx) = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(alias))
        {
            return Some(idx);
        }
    }
    None
}

fn require_column(
    headers: &[String],
    field: &str,
    aliases: &[&str],
) -> Result<usize, EngineError> {
    resolve_column(headers, aliases).ok_or_else(|| {
        EngineError::new(
            "SCHEMA_REQUIRED_FIELD_UNRESOLVED",
            format!("Required field '{field}' cannot be resolved from any recognized header"),
        )
        .with_details(format!(
            "aliases={aliases:?}; headers={:?}",
            headers.iter().map(|h| h.trim()).collect::<Vec<_>>()
        ))
    })
}

fn text_field(table: &RawTable, row_idx: usize, col: Option<usize>) -> String {
    col.and_then(|c| table.cell(row_idx, c))
        .unwrap_or("")
        .to_string()
}

fn opt_field(table: &RawTable, row_idx: usize, col: Option<usize>) -> Option<String> {
    col.and_then(|c| table.cell(row_idx, c)).map(str::to_string)
}

/// Stable fingerprint over the identity-bearing raw fields, used to surface duplicate
/// records without dropping them.
fn record_fingerprint(number: &str, opened_at: Option<&str>) -> String {
    let payload = format!(
        "number={}|opened={}",
        number.trim().to_lowercase(),
        opened_at.unwrap_or("")
    );
    let digest = Sha256::digest(payload.as_bytes());
    hex::encode(digest)
}

/// Map a raw table onto the canonical incident schema.
///
/// Contract:
/// - Exactly one output record per input row, in input order.
/// - Identifier, priority and opened-timestamp columns must resolve; anything else falls
///   back to a documented default (`""` for text, absent for the resolved timestamp,
///   0 for the reassignment count).
/// - Per-row anomalies (blank identifier, non-numeric reassignment count, duplicate
///   identity fingerprint) become warnings, never errors.
pub fn normalize_table(
    table: &RawTable,
) -> Result<(Vec<IncidentRecord>, Vec<ValidationWarning>), EngineError> {
    let headers = &table.headers;

    let number_col = require_column(headers, "number", NUMBER_ALIASES)?;
    let priority_col = require_column(headers, "priority", PRIORITY_ALIASES)?;
    let opened_col = require_column(headers, "opened_at", OPENED_ALIASES)?;

    let short_description_col = resolve_column(headers, SHORT_DESCRIPTION_ALIASES);
    let description_col = resolve_column(headers, DESCRIPTION_ALIASES);
    let state_col = resolve_column(headers, STATE_ALIASES);
    let resolved_col = resolve_column(headers, RESOLVED_ALIASES);
    let assignment_group_col = resolve_column(headers, ASSIGNMENT_GROUP_ALIASES);
    let assigned_to_col = resolve_column(headers, ASSIGNED_TO_ALIASES);
    let caller_col = resolve_column(headers, CALLER_ALIASES);
    let cmdb_ci_col = resolve_column(headers, CMDB_CI_ALIASES);
    let ci_type_col = resolve_column(headers, CI_TYPE_ALIASES);
    let scope_col = resolve_column(headers, SCOPE_ALIASES);
    let reassignment_col = resolve_column(headers, REASSIGNMENT_COUNT_ALIASES);

    let mut warnings = Vec::new();
    let mut seen_fingerprints = BTreeSet::new();
    let mut records = Vec::with_capacity(table.rows.len());

    for row_idx in 0..table.rows.len() {
        let number = text_field(table, row_idx, Some(number_col));
        if number.is_empty() {
            warnings.push(
                ValidationWarning::new(
                    "NORMALIZE_IDENTIFIER_MISSING",
                    "Record has a blank identifier",
                )
                .with_details(format!("row={row_idx}")),
            );
        }

        let opened_at = opt_field(table, row_idx, Some(opened_col));

        let fingerprint = record_fingerprint(&number, opened_at.as_deref());
        if !number.is_empty() && !seen_fingerprints.insert(fingerprint) {
            warnings.push(
                ValidationWarning::new(
                    "NORMALIZE_DUPLICATE_IDENTIFIER",
                    "Duplicate incident identity in batch",
                )
                .with_details(format!("row={row_idx}; number={number}")),
            );
        }

        let reassignment_count = match opt_field(table, row_idx, reassignment_col) {
            None => 0,
            Some(raw) => match raw.parse::<i64>() {
                Ok(v) if v >= 0 => v,
                Ok(v) => {
                    warnings.push(
                        ValidationWarning::new(
                            "NORMALIZE_REASSIGNMENT_COUNT_INVALID",
                            "Negative reassignment count; defaulting to 0",
                        )
                        .with_details(format!("row={row_idx}; value={v}")),
                    );
                    0
                }
                Err(e) => {
                    warnings.push(
                        ValidationWarning::new(
                            "NORMALIZE_REASSIGNMENT_COUNT_INVALID",
                            "Non-numeric reassignment count; defaulting to 0",
                        )
                        .with_details(format!("row={row_idx}; value={raw}; err={e}")),
                    );
                    0
                }
            },
        };

        records.push(IncidentRecord {
            number,
            short_description: text_field(table, row_idx, short_description_col),
            description: text_field(table, row_idx, description_col),
            priority: text_field(table, row_idx, Some(priority_col)),
            state: text_field(table, row_idx, state_col),
            opened_at,
            resolved_at: opt_field(table, row_idx, resolved_col),
            assignment_group: text_field(table, row_idx, assignment_group_col),
            assigned_to: text_field(table, row_idx, assigned_to_col),
            caller: text_field(table, row_idx, caller_col),
            cmdb_ci: text_field(table, row_idx, cmdb_ci_col),
            ci_type: text_field(table, row_idx, ci_type_col),
            scope: text_field(table, row_idx, scope_col),
            reassignment_count,
        });
    }

    debug!(
        records = records.len(),
        warnings = warnings.len(),
        "normalized raw table onto canonical schema"
    );

    Ok((records, warnings))
}
