//! Configuration boundary checks.
//!
//! RULE: settings are validated here before they reach the metrics
//! engine. The engine itself never panics on bad input, but it only
//! promises meaningful numbers for settings that pass `validate`.

use crate::{
    campaign::CampaignSettings,
    config::SegmentWeighting,
    error::{ConfigIssue, ProjectionError, ProjectionResult},
};
use std::collections::HashSet;

/// Segment percentages may drift from 100 by this much.
pub const SEGMENT_SHARE_TOLERANCE: f64 = 0.01;

/// Collect every problem with `settings`. Empty means valid.
pub fn issues(settings: &CampaignSettings) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if settings.end_date <= settings.start_date {
        issues.push(ConfigIssue::DateRange {
            start: settings.start_date,
            end: settings.end_date,
        });
    }

    non_negative(&mut issues, "campaign", "total_budget", settings.total_budget);
    non_negative(&mut issues, "campaign", "overhead_costs", settings.overhead_costs);
    rate(&mut issues, "campaign", "discount_rate", settings.discount_rate);

    for (month, &factor) in settings.seasonality_factors.iter().enumerate() {
        if !factor.is_finite() {
            issues.push(ConfigIssue::NonFinite {
                owner: "campaign".into(),
                field: format!("seasonality_factors[{month}]"),
            });
        } else if factor < 0.0 {
            issues.push(ConfigIssue::NegativeSeasonality { month: month + 1, value: factor });
        }
    }

    let mut seen = HashSet::new();
    for channel in &settings.channels {
        check_id(&mut issues, &mut seen, "channel", &channel.id);
        let owner = format!("channel '{}'", channel.id);

        if !channel.cac.is_finite() {
            issues.push(ConfigIssue::NonFinite { owner: owner.clone(), field: "cac".into() });
        } else if channel.cac <= 0.0 {
            issues.push(ConfigIssue::NonPositiveCac {
                channel_id: channel.id.clone(),
                value: channel.cac,
            });
        }
        non_negative(&mut issues, &owner, "budget", channel.budget);
        non_negative(&mut issues, &owner, "cost_per_click", channel.cost_per_click);
        non_negative(&mut issues, &owner, "average_order_value", channel.average_order_value);
        rate(&mut issues, &owner, "conversion_rate", channel.conversion_rate);
        rate(&mut issues, &owner, "click_through_rate", channel.click_through_rate);
    }

    let mut seen = HashSet::new();
    for segment in &settings.segments {
        check_id(&mut issues, &mut seen, "segment", &segment.id);
        let owner = format!("segment '{}'", segment.id);

        rate(&mut issues, &owner, "percentage", segment.percentage);
        rate(&mut issues, &owner, "churn_rate", segment.churn_rate);
        non_negative(&mut issues, &owner, "average_order_value", segment.average_order_value);
        non_negative(&mut issues, &owner, "purchase_frequency", segment.purchase_frequency);
        non_negative(&mut issues, &owner, "lifetime_months", segment.lifetime_months);
    }

    if !settings.segments.is_empty() {
        let total = settings.segment_share_total();
        if (total - 100.0).abs() > SEGMENT_SHARE_TOLERANCE {
            issues.push(ConfigIssue::SegmentShareTotal { total });
        }
    }

    issues
}

/// Reject `settings` with every issue found.
pub fn validate(settings: &CampaignSettings) -> ProjectionResult<()> {
    let issues = issues(settings);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ProjectionError::InvalidConfiguration { issues })
    }
}

/// Apply the segment weighting policy, then validate.
///
/// With `SegmentWeighting::Normalize`, percentages that do not total
/// 100 are rescaled and a warning is logged. A zero total cannot be
/// rescaled and is still rejected.
pub fn prepare(
    mut settings: CampaignSettings,
    weighting: SegmentWeighting,
) -> ProjectionResult<CampaignSettings> {
    if weighting == SegmentWeighting::Normalize {
        normalize_segments(&mut settings);
    }
    validate(&settings)?;

    let planned = settings.total_budget;
    let active = settings.active_budget();
    if active > planned {
        log::warn!(
            "{}: enabled channel budgets {:.2} exceed planned total {:.2}",
            settings.name,
            active,
            planned
        );
    }

    Ok(settings)
}

fn normalize_segments(settings: &mut CampaignSettings) {
    let total = settings.segment_share_total();
    if settings.segments.is_empty()
        || !total.is_finite()
        || total <= 0.0
        || (total - 100.0).abs() <= SEGMENT_SHARE_TOLERANCE
    {
        return;
    }

    log::warn!(
        "{}: segment percentages total {:.2}, rescaling to 100",
        settings.name,
        total
    );
    for segment in &mut settings.segments {
        segment.percentage = segment.percentage / total * 100.0;
    }
}

fn check_id(issues: &mut Vec<ConfigIssue>, seen: &mut HashSet<String>, kind: &str, id: &str) {
    if id.trim().is_empty() {
        issues.push(ConfigIssue::EmptyId { kind: kind.into() });
    } else if !seen.insert(id.to_string()) {
        issues.push(ConfigIssue::DuplicateId {
            kind: kind.into(),
            id: id.into(),
        });
    }
}

fn non_negative(issues: &mut Vec<ConfigIssue>, owner: &str, field: &str, value: f64) {
    if !value.is_finite() {
        issues.push(ConfigIssue::NonFinite { owner: owner.into(), field: field.into() });
    } else if value < 0.0 {
        issues.push(ConfigIssue::NegativeValue {
            owner: owner.into(),
            field: field.into(),
            value,
        });
    }
}

fn rate(issues: &mut Vec<ConfigIssue>, owner: &str, field: &str, value: f64) {
    if !value.is_finite() {
        issues.push(ConfigIssue::NonFinite { owner: owner.into(), field: field.into() });
    } else if !(0.0..=100.0).contains(&value) {
        issues.push(ConfigIssue::RateOutOfRange {
            owner: owner.into(),
            field: field.into(),
            value,
        });
    }
}
