//! Sensitivity analysis: how the projection responds to each input.
//!
//! Each tracked variable is swept across its configured range. At every
//! sample point the analyzer re-derives the affected quantity and
//! reports its percentage change against the base:
//!   - CAC, CLTV, average order value, churn → the CLTV:CAC ratio
//!   - conversion rate → ROI, from a full recomputation of the metrics
//!
//! Read-only: the campaign settings are never mutated.

use crate::{
    campaign::CampaignSettings,
    config::{Criticality, SensitivityConfig, SweepRange, SweepSpec},
    error::Indeterminate,
    metrics::{self, checked_div, lerp, MarketingMetrics},
    segment,
    types::Metric,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityVariable {
    Cac,
    Cltv,
    ConversionRate,
    ChurnRate,
    AverageOrderValue,
}

impl SensitivityVariable {
    pub const ALL: [Self; 5] = [
        Self::Cac,
        Self::Cltv,
        Self::ConversionRate,
        Self::ChurnRate,
        Self::AverageOrderValue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cac => "CAC",
            Self::Cltv => "CLTV",
            Self::ConversionRate => "Conversion Rate",
            Self::ChurnRate => "Churn Rate",
            Self::AverageOrderValue => "Average Order Value",
        }
    }

    pub fn response(&self) -> SensitivityResponse {
        match self {
            Self::ConversionRate => SensitivityResponse::Roi,
            _ => SensitivityResponse::CltvToCacRatio,
        }
    }
}

/// The derived quantity whose change is reported as impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityResponse {
    CltvToCacRatio,
    Roi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityData {
    pub variable:    SensitivityVariable,
    pub label:       String,
    pub base_value:  f64,
    pub range:       [f64; 2],
    pub step:        f64,
    /// Sampled values of the variable, `range[0]` to `range[1]`.
    pub points:      Vec<f64>,
    /// Percentage change of the response at each point.
    pub impact:      Vec<f64>,
    pub criticality: Criticality,
    pub response:    SensitivityResponse,
}

/// Base-case quantities shared by every sweep.
struct Baseline<'a> {
    settings: &'a CampaignSettings,
    cac: Metric<f64>,
    cltv: Metric<f64>,
    ratio: Metric<f64>,
    roi: Metric<f64>,
}

/// Sweep every configured variable. Variables whose base value or
/// response cannot be computed are left out.
pub fn analyze(
    settings: &CampaignSettings,
    base: &MarketingMetrics,
    config: &SensitivityConfig,
) -> Vec<SensitivityData> {
    let baseline = Baseline {
        settings,
        cac: base.cac,
        cltv: base.cltv,
        ratio: base.cac_to_cltv_ratio,
        roi: base.roi,
    };

    config
        .sweeps
        .iter()
        .filter_map(|plan| match sweep(&baseline, plan, config.samples) {
            Ok(data) => Some(data),
            Err(reason) => {
                log::debug!("sensitivity: skipping {} ({reason})", plan.variable.label());
                None
            }
        })
        .collect()
}

fn sweep(baseline: &Baseline<'_>, plan: &SweepSpec, samples: usize) -> Metric<SensitivityData> {
    let base_value = base_value(baseline, plan.variable)?;
    let (lo, hi) = match plan.range {
        SweepRange::Relative { lo, hi } => (base_value * lo, base_value * hi),
        SweepRange::Absolute { lo, hi } => (lo, hi),
    };
    let samples = samples.max(2);
    let last = (samples - 1) as f64;
    let points: Vec<f64> = (0..samples)
        .map(|i| lerp(lo, hi, i as f64 / last))
        .collect();

    let impact = points
        .iter()
        .map(|&value| impact_at(baseline, plan.variable, base_value, value))
        .collect::<Metric<Vec<f64>>>()?;

    Ok(SensitivityData {
        variable: plan.variable,
        label: plan.variable.label().to_string(),
        base_value,
        range: [lo, hi],
        step: (hi - lo) / last,
        points,
        impact,
        criticality: plan.criticality,
        response: plan.variable.response(),
    })
}

fn base_value(baseline: &Baseline<'_>, variable: SensitivityVariable) -> Metric<f64> {
    let settings = baseline.settings;
    match variable {
        SensitivityVariable::Cac => baseline.cac,
        SensitivityVariable::Cltv => baseline.cltv,
        SensitivityVariable::ConversionRate => metrics::weighted_conversion_rate(settings),
        SensitivityVariable::ChurnRate => metrics::segment_weighted(settings, |s| s.churn_rate),
        SensitivityVariable::AverageOrderValue => {
            metrics::segment_weighted(settings, |s| s.average_order_value)
        }
    }
}

/// Percentage change of the response when `variable` moves from
/// `base_value` to `value`.
fn impact_at(
    baseline: &Baseline<'_>,
    variable: SensitivityVariable,
    base_value: f64,
    value: f64,
) -> Metric<f64> {
    match variable.response() {
        SensitivityResponse::CltvToCacRatio => {
            let ratio = ratio_at(baseline, variable, base_value, value)?;
            percent_change(baseline.ratio?, ratio)
        }
        SensitivityResponse::Roi => {
            let roi = roi_at_conversion(baseline.settings, base_value, value)?;
            percent_change(baseline.roi?, roi)
        }
    }
}

fn ratio_at(
    baseline: &Baseline<'_>,
    variable: SensitivityVariable,
    base_value: f64,
    value: f64,
) -> Metric<f64> {
    let cac = baseline.cac?;
    let cltv = baseline.cltv?;
    match variable {
        SensitivityVariable::Cac => checked_div(cltv, value, Indeterminate::ZeroCac),
        SensitivityVariable::Cltv => checked_div(value, cac, Indeterminate::ZeroCac),
        SensitivityVariable::AverageOrderValue => {
            // CLTV is linear in order value.
            let scale = checked_div(value, base_value, Indeterminate::ZeroBase)?;
            checked_div(cltv * scale, cac, Indeterminate::ZeroCac)
        }
        SensitivityVariable::ChurnRate => {
            let shift = value - base_value;
            let shifted = metrics::segment_weighted(baseline.settings, |s| {
                segment::lifetime_value_with_churn_shift(s, shift)
            })?;
            checked_div(shifted, cac, Indeterminate::ZeroCac)
        }
        SensitivityVariable::ConversionRate => Err(Indeterminate::ZeroBase),
    }
}

/// ROI with every enabled channel's conversion rate scaled so the
/// budget-weighted rate moves from `base_value` to `value`.
fn roi_at_conversion(settings: &CampaignSettings, base_value: f64, value: f64) -> Metric<f64> {
    let scale = checked_div(value, base_value, Indeterminate::ZeroBase)?;
    let mut perturbed = settings.clone();
    for channel in perturbed.channels.iter_mut().filter(|c| c.enabled) {
        channel.conversion_rate *= scale;
    }
    metrics::compute(&perturbed).roi
}

fn percent_change(base: f64, value: f64) -> Metric<f64> {
    checked_div(value - base, base.abs(), Indeterminate::ZeroBase).map(|d| d * 100.0)
}
