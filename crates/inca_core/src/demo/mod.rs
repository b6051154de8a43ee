use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{IncidentRecord, ValidationWarning};
use crate::error::EngineError;
use crate::ingest::parse_csv_table;
use crate::normalize::normalize_table;

/// Snapshot instant the demo dataset is designed around; pass it as `now` so ages and
/// predictive SLA margins are reproducible.
pub const DEMO_SNAPSHOT_TS: &str = "2026-02-01T00:00:00Z";

pub fn demo_now() -> Result<OffsetDateTime, EngineError> {
    OffsetDateTime::parse(DEMO_SNAPSHOT_TS, &Rfc3339).map_err(|e| {
        EngineError::new("DEMO_SNAPSHOT_INVALID", "Failed to parse demo snapshot instant")
            .with_details(e.to_string())
    })
}

/// Deterministic sample export, large enough to exercise every category, priority tier,
/// SLA outcome and quality flag. Column names are the legacy source names on purpose so
/// the demo also runs the alias resolution path.
pub fn demo_csv() -> String {
    let mut out = String::new();
    out.push_str(
        "number,short_description,description,priority,incident_state,opened,resolved,\
         assignment_group,assigned_to,caller_id,cmdb_ci,u_ci_type,u_scope,reassignment_count\n",
    );

    let priorities = [
        "1 - Critical",
        "2 - High",
        "3 - Moderate",
        "4 - Low",
        "5 - Planning",
    ];
    let summaries = [
        "WiFi outage in building A",
        "VPN tunnel drops for remote staff",
        "Print queue stuck on floor 2",
        "Application server slow response",
        "DNS resolution failures reported",
        "Firewall blocked required port",
        "Connectivity loss between offices",
        "Core switch hardware fault",
    ];
    let assets = ["wap-bldg-a-01", "vpn-gw-02", "app-srv-11", "core-sw-01"];
    let ci_types = ["access point", "vpn gateway", "server", "switch"];
    let scopes = ["", "site", "", "enterprise"];
    let active_states = ["In Progress", "On Hold", "New"];
    let assignees = ["rlee", "mpatel", "jchen"];

    for i in 1usize..=40 {
        let priority = priorities[(i - 1) % priorities.len()];
        let summary = if i % 10 == 0 {
            "net down"
        } else {
            summaries[(i - 1) % summaries.len()]
        };
        let description = if i % 10 == 0 {
            ""
        } else {
            "Reported by multiple users; investigating with the on-site team."
        };
        let asset = assets[(i - 1) % assets.len()];
        let ci_type = ci_types[(i - 1) % ci_types.len()];
        let scope = scopes[(i - 1) % scopes.len()];
        let assignee = assignees[(i - 1) % assignees.len()];

        // Two incidents per day through January 2026, morning and afternoon.
        let day = (i - 1) / 2 + 1;
        let hour = 6 + ((i - 1) % 2) * 8;
        let opened = format!("2026-01-{day:02} {hour:02}:15:00");

        let (state, resolved) = if i % 4 == 0 {
            (active_states[(i / 4 - 1) % active_states.len()], String::new())
        } else {
            let resolution_hrs = (i % 6) * 10 + 1;
            let total = hour + resolution_hrs;
            let rday = day + total / 24;
            let rhour = total % 24;
            ("Resolved", format!("2026-01-{rday:02} {rhour:02}:15:00"))
        };

        let reassignments = i % 6;

        out.push_str(&format!(
            "INC{:07},{summary},{description},{priority},{state},{opened},{resolved},\
             Network Operations,{assignee},user{:03},{asset},{ci_type},{scope},{reassignments}\n",
            1000 + i,
            i
        ));
    }

    out
}

/// The demo export parsed and normalized onto the canonical schema.
pub fn demo_records() -> Result<(Vec<IncidentRecord>, Vec<ValidationWarning>), EngineError> {
    let table = parse_csv_table(&demo_csv())?;
    normalize_table(&table)
}
