use time::format_description::well_known::Rfc3339;
use time::{format_description, Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::domain::ValidationWarning;

pub fn canonical_rfc3339_utc(dt: OffsetDateTime) -> Option<String> {
    dt.to_offset(UtcOffset::UTC).format(&Rfc3339).ok()
}

fn parse_primitive_assume_utc(
    raw: &str,
    fmt: &str,
    field: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<OffsetDateTime> {
    let items = format_description::parse(fmt).ok()?;
    let pdt = PrimitiveDateTime::parse(raw, &items).ok()?;

    // This format carries no timezone. We assume UTC deterministically and say so.
    warnings.push(
        ValidationWarning::new(
            "ENRICH_TS_TZ_ASSUMED_UTC",
            format!("Assumed UTC timezone for {field}"),
        )
        .with_details(format!("value={raw}; fmt={fmt}")),
    );

    Some(pdt.assume_utc())
}

fn parse_date_only(raw: &str, field: &str, warnings: &mut Vec<ValidationWarning>) -> Option<OffsetDateTime> {
    let items = format_description::parse("[year]-[month]-[day]").ok()?;
    let date = Date::parse(raw, &items).ok()?;

    warnings.push(
        ValidationWarning::new(
            "ENRICH_TS_TZ_ASSUMED_UTC",
            format!("Assumed UTC midnight for date-only {field}"),
        )
        .with_details(format!("value={raw}")),
    );

    Some(date.midnight().assume_utc())
}

/// Parse a source timestamp against a deterministic allowlist (no fuzzy parsing).
///
/// Contract:
/// - RFC3339 inputs parse without warnings.
/// - ISO-like inputs without a timezone parse with an explicit assumed-UTC warning.
/// - Anything else returns `None` with an unparseable warning; callers null the derived
///   fields and keep the record.
pub fn parse_timestamp(
    field: &str,
    raw_input: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<OffsetDateTime> {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(dt);
    }

    for fmt in [
        "[year]-[month]-[day] [hour]:[minute]:[second]",
        "[year]-[month]-[day] [hour]:[minute]",
        "[year]-[month]-[day]T[hour]:[minute]:[second]",
        "[year]-[month]-[day]T[hour]:[minute]",
    ] {
        if let Some(dt) = parse_primitive_assume_utc(trimmed, fmt, field, warnings) {
            return Some(dt);
        }
    }

    if let Some(dt) = parse_date_only(trimmed, field, warnings) {
        return Some(dt);
    }

    warnings.push(
        ValidationWarning::new(
            "ENRICH_TS_UNPARSEABLE",
            format!("Unparseable timestamp for {field}"),
        )
        .with_details(format!("raw={trimmed}")),
    );

    None
}
