use crate::config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlaOutcome {
    pub breach: Option<bool>,
    /// Positive = hours of headroom, negative = hours over the deadline.
    pub margin_hrs: Option<f64>,
}

/// Evaluate SLA status for one record.
///
/// Returns `None` when the record's priority has no configured threshold; the caller
/// surfaces that through a diagnostic counter instead of assuming a catch-all rule.
///
/// Resolved records are judged on their resolution time. Active records are judged on
/// elapsed age, which yields a predictive margin: `breach` turns true once the margin has
/// gone negative without a resolution.
pub fn evaluate(
    config: &EngineConfig,
    priority: &str,
    resolution_time_hrs: Option<f64>,
    age_hrs: Option<f64>,
) -> Option<SlaOutcome> {
    let threshold = config.sla_threshold_for(priority)?;

    if let Some(rt) = resolution_time_hrs {
        return Some(SlaOutcome {
            breach: Some(rt > threshold),
            margin_hrs: Some(threshold - rt),
        });
    }

    if let Some(age) = age_hrs {
        let margin = threshold - age;
        return Some(SlaOutcome {
            breach: Some(margin < 0.0),
            margin_hrs: Some(margin),
        });
    }

    // Threshold exists but no duration is computable (e.g. unparsable opened timestamp).
    Some(SlaOutcome {
        breach: None,
        margin_hrs: None,
    })
}
