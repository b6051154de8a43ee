use pretty_assertions::assert_eq;

use inca_core::ingest::{parse_csv_table, RawTable};
use inca_core::normalize::normalize_table;

fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect(),
    }
}

#[test]
fn maps_legacy_headers_onto_canonical_schema() {
    let table = table(
        &[
            "Number",
            "incident_state",
            "opened",
            "priority",
            "short_description",
            "u_ci_type",
            "reassignment_count",
        ],
        &[&[
            "INC0001",
            "In Progress",
            "2026-01-05 09:00:00",
            "2 - High",
            "WiFi down in building A",
            "access point",
            "2",
        ]],
    );

    let (records, warnings) = normalize_table(&table).expect("normalize");
    assert_eq!(records.len(), 1);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let rec = &records[0];
    assert_eq!(rec.number, "INC0001");
    assert_eq!(rec.state, "In Progress");
    assert_eq!(rec.opened_at.as_deref(), Some("2026-01-05 09:00:00"));
    assert_eq!(rec.priority, "2 - High");
    assert_eq!(rec.ci_type, "access point");
    assert_eq!(rec.reassignment_count, 2);

    // Unmapped optionals fall back to documented defaults.
    assert_eq!(rec.description, "");
    assert_eq!(rec.resolved_at, None);
    assert_eq!(rec.assignment_group, "");
}

#[test]
fn first_recognized_alias_wins_on_duplicates() {
    let table = table(
        &["number", "priority", "opened", "incident_state", "state"],
        &[&["INC0001", "3 - Moderate", "2026-01-05 09:00:00", "New", "Closed"]],
    );

    let (records, _) = normalize_table(&table).expect("normalize");
    // incident_state precedes state in the alias list.
    assert_eq!(records[0].state, "New");
}

#[test]
fn unresolvable_required_field_is_fatal_and_names_the_field() {
    let table = table(
        &["number", "opened", "short_description"],
        &[&["INC0001", "2026-01-05 09:00:00", "something broke"]],
    );

    let err = normalize_table(&table).expect_err("priority column is missing");
    assert_eq!(err.code, "SCHEMA_REQUIRED_FIELD_UNRESOLVED");
    assert!(err.message.contains("priority"), "message: {}", err.message);
}

#[test]
fn per_row_anomalies_warn_without_dropping_records() {
    let table = table(
        &["number", "priority", "opened", "reassignment_count"],
        &[
            &["INC0001", "1 - Critical", "2026-01-05 09:00:00", "often"],
            &["INC0001", "1 - Critical", "2026-01-05 09:00:00", "1"],
            &["", "2 - High", "2026-01-06 10:00:00", "0"],
        ],
    );

    let (records, warnings) = normalize_table(&table).expect("normalize");
    assert_eq!(records.len(), 3, "anomalous rows must be retained");
    assert_eq!(records[0].reassignment_count, 0);

    assert!(warnings
        .iter()
        .any(|w| w.code == "NORMALIZE_REASSIGNMENT_COUNT_INVALID"));
    assert!(warnings
        .iter()
        .any(|w| w.code == "NORMALIZE_DUPLICATE_IDENTIFIER"));
    assert!(warnings
        .iter()
        .any(|w| w.code == "NORMALIZE_IDENTIFIER_MISSING"));
}

#[test]
fn csv_text_parses_into_a_raw_table() {
    let csv_text = "number,priority,opened\nINC0001,4 - Low,2026-01-05 09:00:00\n";
    let table = parse_csv_table(csv_text).expect("parse");
    assert_eq!(table.headers, vec!["number", "priority", "opened"]);
    assert_eq!(table.rows.len(), 1);

    let (records, _) = normalize_table(&table).expect("normalize");
    assert_eq!(records[0].number, "INC0001");
}
