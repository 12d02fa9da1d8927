//! Campaign configuration checks.

use chrono::NaiveDate;
use projection_core::{
    campaign::CampaignSettings,
    config::SegmentWeighting,
    error::{ConfigIssue, ProjectionError},
    validation,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn issues_of(settings: &CampaignSettings) -> Vec<ConfigIssue> {
    validation::issues(settings)
}

fn has(issues: &[ConfigIssue], pred: impl Fn(&ConfigIssue) -> bool) -> bool {
    issues.iter().any(pred)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The reference campaign is valid as shipped.
#[test]
fn reference_defaults_are_valid() {
    let issues = issues_of(&CampaignSettings::reference_defaults());
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

/// End on or before start is rejected.
#[test]
fn date_range_must_be_positive() {
    let mut settings = CampaignSettings::reference_defaults();
    settings.end_date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let issues = issues_of(&settings);
    assert!(has(&issues, |i| matches!(i, ConfigIssue::DateRange { .. })), "{issues:?}");
}

/// A channel CAC of zero is a configuration error.
#[test]
fn zero_cac_is_rejected() {
    let mut settings = CampaignSettings::reference_defaults();
    settings.channels[0].cac = 0.0;
    let issues = issues_of(&settings);
    assert!(has(&issues, |i| matches!(
        i,
        ConfigIssue::NonPositiveCac { channel_id, .. } if channel_id == "google_ads"
    )));
}

/// Rates must be percentages; amounts must not be negative or NaN.
#[test]
fn rates_and_amounts_are_bounded() {
    let mut settings = CampaignSettings::reference_defaults();
    settings.channels[1].conversion_rate = 120.0;
    settings.channels[2].budget = -1.0;
    settings.segments[0].churn_rate = f64::NAN;
    settings.discount_rate = -5.0;
    let issues = issues_of(&settings);

    assert!(has(&issues, |i| matches!(i, ConfigIssue::RateOutOfRange { field, .. } if field == "conversion_rate")));
    assert!(has(&issues, |i| matches!(i, ConfigIssue::NegativeValue { field, .. } if field == "budget")));
    assert!(has(&issues, |i| matches!(i, ConfigIssue::NonFinite { field, .. } if field == "churn_rate")));
    assert!(has(&issues, |i| matches!(i, ConfigIssue::RateOutOfRange { field, .. } if field == "discount_rate")));
}

/// Every problem is reported at once, not just the first.
#[test]
fn all_issues_are_collected() {
    let mut settings = CampaignSettings::reference_defaults();
    settings.channels[0].cac = -1.0;
    settings.segments[0].percentage = 10.0;
    settings.seasonality_factors[3] = -0.5;

    match validation::validate(&settings) {
        Err(ProjectionError::InvalidConfiguration { issues }) => {
            assert_eq!(issues.len(), 3, "{issues:?}");
            assert!(has(&issues, |i| matches!(i, ConfigIssue::NegativeSeasonality { month: 4, .. })));
        }
        other => panic!("expected InvalidConfiguration; got {other:?}"),
    }
}

/// Ids must be present and unique within their kind.
#[test]
fn ids_are_unique_and_non_empty() {
    let mut settings = CampaignSettings::reference_defaults();
    settings.channels[1].id = "google_ads".into();
    settings.segments[2].id = " ".into();
    let issues = issues_of(&settings);

    assert!(has(&issues, |i| matches!(i, ConfigIssue::DuplicateId { id, .. } if id == "google_ads")));
    assert!(has(&issues, |i| matches!(i, ConfigIssue::EmptyId { kind } if kind == "segment")));
}

/// Segment shares must total 100 within tolerance.
#[test]
fn segment_shares_must_total_hundred() {
    let mut settings = CampaignSettings::reference_defaults();
    settings.segments[0].percentage += 0.005;
    assert!(issues_of(&settings).is_empty(), "within tolerance");

    settings.segments[0].percentage += 5.0;
    let issues = issues_of(&settings);
    assert!(has(&issues, |i| matches!(i, ConfigIssue::SegmentShareTotal { .. })));
}

/// With the normalize policy, shares are rescaled instead of rejected.
#[test]
fn normalize_policy_rescales_shares() {
    let mut settings = CampaignSettings::reference_defaults();
    for segment in &mut settings.segments {
        segment.percentage *= 2.0;
    }

    let rejected = validation::prepare(settings.clone(), SegmentWeighting::Reject);
    assert!(matches!(rejected, Err(ProjectionError::InvalidConfiguration { .. })));

    let prepared = validation::prepare(settings, SegmentWeighting::Normalize).unwrap();
    let shares: Vec<f64> = prepared.segments.iter().map(|s| s.percentage).collect();
    for (share, expected) in shares.iter().zip([20.0, 50.0, 30.0]) {
        assert!((share - expected).abs() < 1e-9, "share {share} != {expected}");
    }
}

/// Issues serialize with a tag naming the kind of problem.
#[test]
fn issues_serialize_with_tag() {
    let issue = ConfigIssue::SegmentShareTotal { total: 90.0 };
    let json = serde_json::to_value(&issue).unwrap();
    assert_eq!(json["issue"], "segment_share_total");
    assert_eq!(issue.to_string(), "segment percentages total 90.00, expected 100");
}
