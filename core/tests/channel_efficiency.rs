//! Channel efficiency and band classification.

use projection_core::{
    campaign::{CampaignSettings, MarketingChannel},
    channel::{self, EfficiencyBand},
    config::{BandThresholds, ModelConfig},
    error::Indeterminate,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_channel(cac: f64, conversion_rate: f64, average_order_value: f64) -> MarketingChannel {
    MarketingChannel {
        id: "test_channel".into(),
        name: "Test Channel".into(),
        budget: 1_000.0,
        cac,
        conversion_rate,
        cost_per_click: 1.0,
        click_through_rate: 2.0,
        average_order_value,
        enabled: true,
    }
}

fn thresholds() -> BandThresholds {
    ModelConfig::default().optimization.thresholds
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// efficiency = aov × conversion / 100 / cac.
#[test]
fn efficiency_is_order_value_per_acquisition_dollar() {
    let ch = make_channel(4.0, 5.0, 120.0);
    let eff = channel::efficiency(&ch).unwrap();
    assert!((eff - 1.5).abs() < 1e-12, "Expected efficiency 1.5; got {eff}");
}

/// A zero CAC has no defined efficiency rather than an infinite one.
#[test]
fn zero_cac_is_indeterminate() {
    let ch = make_channel(0.0, 5.0, 120.0);
    assert_eq!(channel::efficiency(&ch), Err(Indeterminate::ZeroCac));

    let ch = make_channel(f64::NAN, 5.0, 120.0);
    assert_eq!(channel::efficiency(&ch), Err(Indeterminate::ZeroCac));
}

/// Thresholds are inclusive at the lower edge of each band.
#[test]
fn classification_follows_thresholds() {
    let t = thresholds();
    assert_eq!(channel::classify(1.5, &t), EfficiencyBand::High);
    assert_eq!(channel::classify(1.2, &t), EfficiencyBand::High);
    assert_eq!(channel::classify(1.0, &t), EfficiencyBand::Medium);
    assert_eq!(channel::classify(0.8, &t), EfficiencyBand::Medium);
    assert_eq!(channel::classify(0.79, &t), EfficiencyBand::Low);
}

/// Every reference channel converts well below one dollar per acquisition
/// dollar, so all five land in the low band.
#[test]
fn reference_channels_are_all_low_band() {
    let settings = CampaignSettings::reference_defaults();
    let t = thresholds();
    for ch in &settings.channels {
        let eff = channel::efficiency(ch).unwrap();
        assert_eq!(
            channel::classify(eff, &t),
            EfficiencyBand::Low,
            "channel {} with efficiency {eff} should be low",
            ch.id
        );
    }
}
