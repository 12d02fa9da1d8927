//! Sensitivity sweeps over the reference campaign.

use projection_core::{
    campaign::CampaignSettings,
    config::{Criticality, ModelConfig, SensitivityConfig},
    metrics,
    sensitivity::{self, SensitivityData, SensitivityResponse, SensitivityVariable},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn analyze(settings: &CampaignSettings) -> Vec<SensitivityData> {
    let config = ModelConfig::default();
    let base = metrics::compute(settings);
    sensitivity::analyze(settings, &base, &config.sensitivity)
}

fn find(data: &[SensitivityData], variable: SensitivityVariable) -> &SensitivityData {
    data.iter()
        .find(|d| d.variable == variable)
        .unwrap_or_else(|| panic!("no sweep for {variable:?}"))
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Every configured variable is swept for a fully determinate campaign.
#[test]
fn all_variables_are_swept() {
    let data = analyze(&CampaignSettings::reference_defaults());
    assert_eq!(data.len(), SensitivityVariable::ALL.len());
    for (d, variable) in data.iter().zip(SensitivityVariable::ALL) {
        assert_eq!(d.variable, variable, "sweeps should keep config order");
        assert_eq!(d.label, variable.label());
        assert_eq!(d.points.len(), 11);
        assert_eq!(d.impact.len(), 11);
    }
}

/// CAC is swept from half to one and a half times its base value.
#[test]
fn cac_sweep_spans_relative_range() {
    let settings = CampaignSettings::reference_defaults();
    let base_cac = metrics::compute(&settings).cac.unwrap();
    let data = analyze(&settings);
    let cac = find(&data, SensitivityVariable::Cac);

    assert_eq!(cac.base_value, base_cac);
    assert_eq!(cac.points[0], base_cac * 0.5, "first point is the low end");
    assert_eq!(cac.points[10], base_cac * 1.5, "last point is the high end");
    assert_eq!(cac.range, [base_cac * 0.5, base_cac * 1.5]);
    assert!((cac.step - base_cac * 0.1).abs() < 1e-9);
    assert_eq!(cac.criticality, Criticality::High);
    assert_eq!(cac.response, SensitivityResponse::CltvToCacRatio);
}

/// Raising CAC lowers the CLTV:CAC ratio; the midpoint is the base.
#[test]
fn cac_impact_falls_as_cac_rises() {
    let data = analyze(&CampaignSettings::reference_defaults());
    let cac = find(&data, SensitivityVariable::Cac);

    assert!(cac.impact.windows(2).all(|w| w[1] < w[0]), "impact must fall: {:?}", cac.impact);
    assert!(cac.impact[5].abs() < 1e-9, "midpoint impact {}", cac.impact[5]);
    assert!((cac.impact[0] - 100.0).abs() < 1e-9, "halving CAC doubles the ratio");
}

/// CLTV and order value both move the ratio linearly.
#[test]
fn cltv_and_order_value_scale_linearly() {
    let data = analyze(&CampaignSettings::reference_defaults());
    for variable in [SensitivityVariable::Cltv, SensitivityVariable::AverageOrderValue] {
        let d = find(&data, variable);
        assert!((d.impact[0] + 50.0).abs() < 1e-9, "{variable:?} low end {}", d.impact[0]);
        assert!((d.impact[10] - 50.0).abs() < 1e-9, "{variable:?} high end {}", d.impact[10]);
    }
}

/// Churn is swept over absolute rates; less churn is worth more.
#[test]
fn churn_sweep_uses_absolute_range() {
    let data = analyze(&CampaignSettings::reference_defaults());
    let churn = find(&data, SensitivityVariable::ChurnRate);

    assert!((churn.base_value - 14.5).abs() < 1e-9, "weighted churn {}", churn.base_value);
    assert_eq!(churn.range, [0.0, 20.0]);
    assert!(churn.impact[0] > 0.0);
    assert!(churn.impact[10] < 0.0);
}

/// Conversion responds through ROI from a full recomputation.
#[test]
fn conversion_moves_roi() {
    let data = analyze(&CampaignSettings::reference_defaults());
    let conv = find(&data, SensitivityVariable::ConversionRate);

    assert_eq!(conv.response, SensitivityResponse::Roi);
    assert!(conv.impact[0] < 0.0, "halving conversion must hurt ROI");
    assert!(conv.impact[10] > 0.0, "raising conversion must help ROI");
    assert!(conv.impact[5].abs() < 1e-6, "midpoint impact {}", conv.impact[5]);
}

/// Variables whose base or response cannot be computed are left out.
#[test]
fn indeterminate_variables_are_omitted() {
    let mut settings = CampaignSettings::reference_defaults();
    for ch in &mut settings.channels {
        ch.enabled = false;
    }
    assert!(analyze(&settings).is_empty());
}

/// Sample count comes from config, never below two.
#[test]
fn sample_count_follows_config() {
    let settings = CampaignSettings::reference_defaults();
    let base = metrics::compute(&settings);
    let mut config: SensitivityConfig = ModelConfig::default().sensitivity;
    config.samples = 5;

    let data = sensitivity::analyze(&settings, &base, &config);
    assert!(data.iter().all(|d| d.points.len() == 5));

    config.samples = 0;
    let data = sensitivity::analyze(&settings, &base, &config);
    assert!(data.iter().all(|d| d.points.len() == 2));
}
