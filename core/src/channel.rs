//! Channel efficiency: per-channel unit economics.
//!
//! efficiency = (average_order_value × conversion_rate / 100) / cac
//!
//! A channel whose efficiency reaches the high threshold earns a budget
//! increase, one below the low threshold a cut. Everything here is a
//! pure function of one channel.

use crate::{
    campaign::MarketingChannel,
    config::BandThresholds,
    error::Indeterminate,
    types::Metric,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyBand {
    High,
    Medium,
    Low,
}

/// Return per acquisition dollar. A CAC of zero (or below) has no
/// defined efficiency.
pub fn efficiency(channel: &MarketingChannel) -> Metric<f64> {
    // Also rejects NaN.
    if !(channel.cac > 0.0) {
        return Err(Indeterminate::ZeroCac);
    }
    let value = channel.average_order_value * (channel.conversion_rate / 100.0) / channel.cac;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Indeterminate::ZeroCac)
    }
}

pub fn classify(efficiency: f64, thresholds: &BandThresholds) -> EfficiencyBand {
    if efficiency >= thresholds.high {
        EfficiencyBand::High
    } else if efficiency >= thresholds.low {
        EfficiencyBand::Medium
    } else {
        EfficiencyBand::Low
    }
}

/// How far `efficiency` sits from the nearest edge of its own band.
pub fn band_margin(efficiency: f64, thresholds: &BandThresholds) -> f64 {
    match classify(efficiency, thresholds) {
        EfficiencyBand::High => efficiency - thresholds.high,
        EfficiencyBand::Low => thresholds.low - efficiency,
        EfficiencyBand::Medium => (efficiency - thresholds.low).min(thresholds.high - efficiency),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> BandThresholds {
        BandThresholds { high: 1.2, low: 0.8 }
    }

    #[test]
    fn band_edges_are_inclusive_below() {
        assert_eq!(classify(1.2, &thresholds()), EfficiencyBand::High);
        assert_eq!(classify(0.8, &thresholds()), EfficiencyBand::Medium);
        assert_eq!(classify(0.799, &thresholds()), EfficiencyBand::Low);
    }

    #[test]
    fn margin_is_distance_to_nearest_edge() {
        let t = thresholds();
        assert!((band_margin(1.5, &t) - 0.3).abs() < 1e-12);
        assert!((band_margin(0.5, &t) - 0.3).abs() < 1e-12);
        assert!((band_margin(0.9, &t) - 0.1).abs() < 1e-12);
        assert!((band_margin(1.1, &t) - 0.1).abs() < 1e-12);
    }
}
