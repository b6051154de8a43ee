/// Deterministic user-impact estimate from configuration-item type, priority ordinal and
/// scope indicator. Pure and replayable: outputs feed major-incident thresholds, so no
/// sampling or perturbation is permitted here.
pub fn estimate_user_impact(ci_type: &str, priority_score: Option<u8>, scope: &str) -> i64 {
    let ci = ci_type.to_lowercase();
    let base: f64 = if ci.contains("server") || ci.contains("firewall") {
        100.0
    } else if ci.contains("access point") || ci.contains("wifi") || ci.contains("wireless") {
        50.0
    } else if ci.contains("router") || ci.contains("switch") {
        75.0
    } else if ci.contains("printer") {
        15.0
    } else {
        25.0
    };

    let priority_factor = match priority_score {
        Some(1) => 2.0,
        Some(2) => 1.5,
        Some(4) => 0.5,
        Some(5) => 0.25,
        _ => 1.0,
    };

    let scope_lower = scope.to_lowercase();
    let scope_factor = if scope_lower.contains("enterprise") || scope_lower.contains("global") {
        4.0
    } else if scope_lower.contains("site") || scope_lower.contains("campus") {
        2.0
    } else if scope_lower.contains("department") || scope_lower.contains("floor") {
        1.5
    } else {
        1.0
    };

    (base * priority_factor * scope_factor).round() as i64
}
