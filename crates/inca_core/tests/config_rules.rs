use pretty_assertions::assert_eq;

use inca_core::config::{EngineConfig, SlaRule};

#[test]
fn default_config_is_valid_and_carries_the_product_rule_tables() {
    let config = EngineConfig::default();
    config.validate().expect("defaults must validate");

    assert_eq!(config.sla_threshold_for("1 - Critical"), Some(4.0));
    assert_eq!(config.sla_threshold_for("4 - Low"), Some(120.0));
    assert_eq!(config.sla_threshold_for("5 - Planning"), None);

    assert_eq!(config.categorization[0].name, "WiFi/Wireless");
    assert_eq!(config.quality.min_description_len, 20);
    assert_eq!(config.quality.reassignment_threshold, 3);
    assert_eq!(config.quality.on_hold_threshold_hrs, 72.0);
}

#[test]
fn non_positive_sla_threshold_is_a_configuration_error() {
    let mut config = EngineConfig::default();
    config.sla.push(SlaRule {
        priority: "0 - Emergency".to_string(),
        threshold_hrs: -2.0,
    });

    let err = config.validate().expect_err("negative threshold");
    assert_eq!(err.code, "CONFIG_SLA_RULE_INVALID");
}

#[test]
fn duplicate_category_names_are_rejected() {
    let mut config = EngineConfig::default();
    let first = config.categorization[0].clone();
    config.categorization.push(first);

    let err = config.validate().expect_err("duplicate category");
    assert_eq!(err.code, "CONFIG_CATEGORY_RULE_INVALID");
}

#[test]
fn percentile_must_stay_in_range() {
    let mut config = EngineConfig::default();
    config.quality.mismatch_percentile = 0.0;
    assert_eq!(
        config.validate().expect_err("zero percentile").code,
        "CONFIG_QUALITY_RULE_INVALID"
    );

    config.quality.mismatch_percentile = 100.5;
    assert_eq!(
        config.validate().expect_err("oversized percentile").code,
        "CONFIG_QUALITY_RULE_INVALID"
    );
}

#[test]
fn json_round_trip_decodes_and_validates() {
    let config = EngineConfig::default();
    let json = serde_json::to_string(&config).expect("encode");
    let decoded = EngineConfig::from_json(&json).expect("decode");
    assert_eq!(decoded, config);
}

#[test]
fn malformed_json_reports_a_decode_error() {
    let err = EngineConfig::from_json("{not json").expect_err("malformed");
    assert_eq!(err.code, "CONFIG_DECODE_FAILED");
}

#[test]
fn inverted_business_hours_are_rejected() {
    let mut config = EngineConfig::default();
    config.calendar.business_start_hour = 18;
    config.calendar.business_end_hour = 8;

    let err = config.validate().expect_err("inverted window");
    assert_eq!(err.code, "CONFIG_CALENDAR_INVALID");
}
