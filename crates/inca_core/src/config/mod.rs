use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One categorization rule: a category name and the case-insensitive substring keywords
/// that select it. Rules are evaluated in declaration order; the first match wins, so
/// ordering is part of the product configuration, not an implementation detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Allowed resolution time in hours for one priority label. Priorities without a rule
/// get null SLA fields; there is deliberately no catch-all threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlaRule {
    pub priority: String,
    pub threshold_hrs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityConfig {
    /// Minimum combined description length (chars, after trimming).
    pub min_description_len: usize,
    /// Reassignment counts strictly above this flag the record.
    pub reassignment_threshold: i64,
    /// Hours a record may sit in an on-hold state before it is flagged.
    pub on_hold_threshold_hrs: f64,
    /// State labels treated as "on hold" (case-insensitive).
    pub on_hold_states: Vec<String>,
    /// Percentile of the per-tier resolution-time distribution used by the
    /// priority-mismatch detector. Default is the median.
    pub mismatch_percentile: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_description_len: 20,
            reassignment_threshold: 3,
            on_hold_threshold_hrs: 72.0,
            on_hold_states: vec!["On Hold".to_string()],
            mismatch_percentile: 50.0,
        }
    }
}

/// Reporting timezone and business-hours window. Calendar fields are derived after
/// shifting opened timestamps by `utc_offset_minutes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportingCalendar {
    pub utc_offset_minutes: i32,
    /// Weekday indices, 0 = Monday .. 6 = Sunday.
    pub business_days: Vec<u8>,
    /// Half-open hour window: start <= hour < end.
    pub business_start_hour: u8,
    pub business_end_hour: u8,
}

impl Default for ReportingCalendar {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            business_days: vec![0, 1, 2, 3, 4],
            business_start_hour: 8,
            business_end_hour: 18,
        }
    }
}

/// Complete engine configuration. Treated as read-only for the duration of a batch call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// State labels that end an incident's active life (case-insensitive).
    pub terminal_states: Vec<String>,
    pub categorization: Vec<CategoryRule>,
    pub sla: Vec<SlaRule>,
    pub quality: QualityConfig,
    pub calendar: ReportingCalendar,
    /// Minimum (category, asset) occurrences before a group counts as recurring.
    pub min_recurrence: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            terminal_states: vec![
                "Resolved".to_string(),
                "Closed".to_string(),
                "Canceled".to_string(),
            ],
            categorization: default_categorization(),
            sla: vec![
                sla_rule("1 - Critical", 4.0),
                sla_rule("2 - High", 24.0),
                sla_rule("3 - Moderate", 72.0),
                sla_rule("4 - Low", 120.0),
            ],
            quality: QualityConfig::default(),
            calendar: ReportingCalendar::default(),
            min_recurrence: 3,
        }
    }
}

fn sla_rule(priority: &str, threshold_hrs: f64) -> SlaRule {
    SlaRule {
        priority: priority.to_string(),
        threshold_hrs,
    }
}

fn category(name: &str, keywords: &[&str]) -> CategoryRule {
    CategoryRule {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

/// Default network-incident categorization rules, in tie-break order.
fn default_categorization() -> Vec<CategoryRule> {
    vec![
        category(
            "WiFi/Wireless",
            &["wifi", "wireless", "access point", "wap", "ssid"],
        ),
        category(
            "VPN/Remote Access",
            &["vpn", "remote", "zscaler", "remote access", "remote desktop"],
        ),
        category("Network Printing", &["printer", "print", "printing"]),
        category(
            "Server/Performance",
            &["server", "performance", "slow", "application"],
        ),
        category("DNS/Resolution", &["dns", "resolution", "nslookup"]),
        category(
            "Firewall/Security",
            &["firewall", "blocked", "security", "access denied"],
        ),
        category(
            "Connectivity",
            &["connectivity", "connection", "network", "ping", "unreachable"],
        ),
        category(
            "Hardware",
            &["hardware", "device", "router", "switch", "equipment failure"],
        ),
    ]
}

impl EngineConfig {
    /// Decode a configuration from JSON text and validate it.
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(text).map_err(|e| {
            EngineError::new("CONFIG_DECODE_FAILED", "Failed to decode engine configuration")
                .with_details(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// SLA threshold for a priority label, exact match. `None` means "no rule", which
    /// callers must surface as null SLA fields rather than assume a default.
    pub fn sla_threshold_for(&self, priority: &str) -> Option<f64> {
        self.sla
            .iter()
            .find(|r| r.priority == priority)
            .map(|r| r.threshold_hrs)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let mut seen_categories = Vec::new();
        for rule in &self.categorization {
            if rule.name.trim().is_empty() {
                return Err(EngineError::new(
                    "CONFIG_CATEGORY_RULE_INVALID",
                    "Category rule has an empty name",
                ));
            }
            if seen_categories.contains(&rule.name) {
                return Err(EngineError::new(
                    "CONFIG_CATEGORY_RULE_INVALID",
                    "Duplicate category rule",
                )
                .with_details(format!("name={}", rule.name)));
            }
            if rule.keywords.is_empty() || rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(EngineError::new(
                    "CONFIG_CATEGORY_RULE_INVALID",
                    "Category rule needs at least one non-blank keyword",
                )
                .with_details(format!("name={}", rule.name)));
            }
            seen_categories.push(rule.name.clone());
        }

        let mut seen_priorities = Vec::new();
        for rule in &self.sla {
            if !rule.threshold_hrs.is_finite() || rule.threshold_hrs <= 0.0 {
                return Err(EngineError::new(
                    "CONFIG_SLA_RULE_INVALID",
                    "SLA threshold must be a positive number of hours",
                )
                .with_details(format!(
                    "priority={}; threshold_hrs={}",
                    rule.priority, rule.threshold_hrs
                )));
            }
            if seen_priorities.contains(&rule.priority) {
                return Err(EngineError::new(
                    "CONFIG_SLA_RULE_INVALID",
                    "Duplicate SLA rule for priority",
                )
                .with_details(format!("priority={}", rule.priority)));
            }
            seen_priorities.push(rule.priority.clone());
        }

        if self.quality.min_description_len == 0 {
            return Err(EngineError::new(
                "CONFIG_QUALITY_RULE_INVALID",
                "min_description_len must be at least 1",
            ));
        }
        if !self.quality.on_hold_threshold_hrs.is_finite()
            || self.quality.on_hold_threshold_hrs <= 0.0
        {
            return Err(EngineError::new(
                "CONFIG_QUALITY_RULE_INVALID",
                "on_hold_threshold_hrs must be a positive number of hours",
            ));
        }
        if !self.quality.mismatch_percentile.is_finite()
            || self.quality.mismatch_percentile <= 0.0
            || self.quality.mismatch_percentile > 100.0
        {
            return Err(EngineError::new(
                "CONFIG_QUALITY_RULE_INVALID",
                "mismatch_percentile must be in (0, 100]",
            )
            .with_details(format!("value={}", self.quality.mismatch_percentile)));
        }

        let cal = &self.calendar;
        if cal.business_start_hour >= cal.business_end_hour || cal.business_end_hour > 24 {
            return Err(EngineError::new(
                "CONFIG_CALENDAR_INVALID",
                "Business-hours window must satisfy start < end <= 24",
            )
            .with_details(format!(
                "start={}; end={}",
                cal.business_start_hour, cal.business_end_hour
            )));
        }
        if cal.business_days.iter().any(|d| *d > 6) {
            return Err(EngineError::new(
                "CONFIG_CALENDAR_INVALID",
                "Business-day indices must be 0 (Monday) through 6 (Sunday)",
            ));
        }
        // UTC offsets beyond +/-14h do not exist.
        if cal.utc_offset_minutes.abs() > 14 * 60 {
            return Err(EngineError::new(
                "CONFIG_CALENDAR_INVALID",
                "Reporting UTC offset out of range",
            )
            .with_details(format!("utc_offset_minutes={}", cal.utc_offset_minutes)));
        }

        if self.min_recurrence == 0 {
            return Err(EngineError::new(
                "CONFIG_RECURRENCE_INVALID",
                "min_recurrence must be at least 1",
            ));
        }

        Ok(())
    }
}
