//! Aggregate metrics engine: the campaign-level P&L projection.
//!
//! Combines channel and segment inputs into one immutable snapshot:
//!   1. Spend: total budget and budget-weighted CAC (enabled channels)
//!   2. Value: percentage-weighted CLTV across segments
//!   3. Volume: customers from clicks × CTR × conversion
//!   4. Bottom line: revenue, cost, profit, ROI, margin
//!   5. Time: break-even, payback, NPV, profitability date
//!
//! RULE: every division goes through `checked_div`. A zero divisor or
//! a non-positive time span becomes an `Indeterminate` value, never
//! NaN, Infinity or a made-up date.

use crate::{
    campaign::{CampaignSettings, CustomerSegment},
    error::Indeterminate,
    segment,
    timeline::{self, ProjectionTimeline},
    types::Metric,
};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Average Gregorian month length (365.25 / 12).
pub const DAYS_PER_MONTH: f64 = 30.4375;

/// Break-even further out than this is reported as beyond the calendar.
const MAX_BREAK_EVEN_DAYS: f64 = 3_650_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingMetrics {
    /// Budget-weighted CAC across enabled channels.
    pub cac:                 Metric<f64>,
    /// Percentage-weighted CLTV across segments.
    pub cltv:                Metric<f64>,
    /// CLTV divided by CAC.
    pub cac_to_cltv_ratio:   Metric<f64>,
    pub roi:                 Metric<f64>,
    pub break_even_point:    Metric<NaiveDate>,
    /// Months of customer value needed to recover one CAC.
    pub payback_period:      Metric<f64>,
    pub npv:                 Metric<f64>,
    /// Approximated as roi / 2. See `ProjectionTimeline::cash_flow_irr`
    /// for a solved rate.
    pub irr:                 Metric<f64>,
    pub total_profit:        Metric<f64>,
    pub total_revenue:       Metric<f64>,
    pub margin_contribution: Metric<f64>,
    pub profitability_date:  Metric<NaiveDate>,
    // Supporting totals
    pub total_budget:        f64,
    pub total_cost:          f64,
    pub total_customers:     Metric<f64>,
}

/// Metrics plus the month-by-month schedule they were read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub metrics: MarketingMetrics,
    pub timeline: ProjectionTimeline,
}

/// Compute the full snapshot for `settings`.
pub fn compute(settings: &CampaignSettings) -> MarketingMetrics {
    project(settings).metrics
}

/// Compute the snapshot together with its seasonal timeline.
pub fn project(settings: &CampaignSettings) -> Projection {
    // ── Spend ──────────────────────────────────────────────────

    let total_budget = settings.active_budget();
    let cac = weighted_cac(settings, total_budget);

    // ── Value ──────────────────────────────────────────────────

    let cltv = weighted_cltv(settings);
    let cac_to_cltv_ratio = cltv
        .and_then(|value| cac.and_then(|cost| checked_div(value, cost, Indeterminate::ZeroCac)));

    // ── Volume ─────────────────────────────────────────────────

    let total_customers = customers(settings, total_budget);

    // ── Bottom line ────────────────────────────────────────────

    let total_revenue = total_customers.and_then(|n| cltv.map(|value| n * value));
    let total_cost = total_budget + settings.overhead_costs;
    let total_profit = total_revenue.map(|revenue| revenue - total_cost);
    let roi = total_profit
        .and_then(|profit| checked_div(profit, total_cost, Indeterminate::ZeroTotalCost))
        .map(|r| r * 100.0);
    let irr = roi.map(|r| r / 2.0);
    let margin_contribution = total_profit
        .and_then(|profit| {
            total_revenue.and_then(|revenue| checked_div(profit, revenue, Indeterminate::ZeroRevenue))
        })
        .map(|m| m * 100.0);

    // ── Time ───────────────────────────────────────────────────

    let break_even_point = total_profit.and_then(|profit| break_even(settings, profit, total_cost));
    let payback_period = payback(settings, cac, cltv);
    let npv = total_revenue.and_then(|revenue| {
        discount_divisor(settings)
            .and_then(|divisor| checked_div(revenue, divisor, Indeterminate::BeyondCalendar))
            .map(|present| -total_cost + present)
    });

    let timeline = timeline::build(settings, total_budget, total_revenue);
    let profitability_date = timeline.profitability_date;

    log::debug!(
        "{}: budget={:.2} cost={:.2} customers={:?} revenue={:?} roi={:?}",
        settings.name,
        total_budget,
        total_cost,
        total_customers,
        total_revenue,
        roi
    );

    Projection {
        metrics: MarketingMetrics {
            cac,
            cltv,
            cac_to_cltv_ratio,
            roi,
            break_even_point,
            payback_period,
            npv,
            irr,
            total_profit,
            total_revenue,
            margin_contribution,
            profitability_date,
            total_budget,
            total_cost,
            total_customers,
        },
        timeline,
    }
}

/// (1 + monthly_rate) ^ duration_months, the divisor applied to
/// end-of-campaign revenue.
pub fn discount_divisor(settings: &CampaignSettings) -> Metric<f64> {
    let months = duration_months(settings)?;
    let monthly_rate = settings.discount_rate / 12.0 / 100.0;
    let divisor = (1.0 + monthly_rate).powf(months);
    if divisor.is_finite() && divisor > 0.0 {
        Ok(divisor)
    } else {
        Err(Indeterminate::BeyondCalendar)
    }
}

pub fn duration_months(settings: &CampaignSettings) -> Metric<f64> {
    let days = settings.duration_days();
    if days <= 0 {
        return Err(Indeterminate::NonPositiveDuration);
    }
    Ok(days as f64 / DAYS_PER_MONTH)
}

pub fn weighted_cac(settings: &CampaignSettings, total_budget: f64) -> Metric<f64> {
    if !(total_budget > 0.0) {
        return Err(Indeterminate::NoActiveSpend);
    }
    Ok(settings
        .enabled_channels()
        .map(|c| c.cac * (c.budget / total_budget))
        .sum())
}

pub fn weighted_cltv(settings: &CampaignSettings) -> Metric<f64> {
    segment_weighted(settings, segment::lifetime_value)
}

/// Budget-weighted conversion rate across enabled channels.
pub fn weighted_conversion_rate(settings: &CampaignSettings) -> Metric<f64> {
    let total_budget = settings.active_budget();
    if !(total_budget > 0.0) {
        return Err(Indeterminate::NoActiveSpend);
    }
    Ok(settings
        .enabled_channels()
        .map(|c| c.conversion_rate * (c.budget / total_budget))
        .sum())
}

/// Percentage-weighted average of a per-segment field.
pub fn segment_weighted(
    settings: &CampaignSettings,
    field: impl Fn(&CustomerSegment) -> f64,
) -> Metric<f64> {
    if settings.segments.is_empty() {
        return Err(Indeterminate::NoSegments);
    }
    Ok(settings
        .segments
        .iter()
        .map(|s| field(s) * (s.percentage / 100.0))
        .sum())
}

fn customers(settings: &CampaignSettings, total_budget: f64) -> Metric<f64> {
    if !(total_budget > 0.0) {
        return Err(Indeterminate::NoActiveSpend);
    }
    Ok(settings
        .enabled_channels()
        // Free clicks would mean infinite visitors.
        .filter(|c| c.cost_per_click > 0.0)
        .map(|c| {
            let visitors = (c.budget / c.cost_per_click) * (c.click_through_rate / 100.0);
            visitors * (c.conversion_rate / 100.0)
        })
        .sum())
}

fn break_even(settings: &CampaignSettings, profit: f64, total_cost: f64) -> Metric<NaiveDate> {
    let days = settings.duration_days();
    if days <= 0 {
        return Err(Indeterminate::NonPositiveDuration);
    }
    let daily_profit = profit / days as f64;
    if !(daily_profit > 0.0) {
        return Err(Indeterminate::NeverBreaksEven);
    }
    // Partial days are dropped.
    let days_to_break_even = (total_cost / daily_profit).floor();
    add_days(settings.start_date, days_to_break_even)
}

fn payback(settings: &CampaignSettings, cac: Metric<f64>, cltv: Metric<f64>) -> Metric<f64> {
    let lifetime = segment_weighted(settings, |s| s.lifetime_months)?;
    let monthly_value = checked_div(cltv?, lifetime, Indeterminate::ZeroLifetimeValue)?;
    checked_div(cac?, monthly_value, Indeterminate::ZeroLifetimeValue)
}

/// `start + days`, with `days` a non-negative whole number of days.
pub fn add_days(start: NaiveDate, days: f64) -> Metric<NaiveDate> {
    if !days.is_finite() || !(0.0..=MAX_BREAK_EVEN_DAYS).contains(&days) {
        return Err(Indeterminate::BeyondCalendar);
    }
    start
        .checked_add_days(Days::new(days as u64))
        .ok_or(Indeterminate::BeyondCalendar)
}

/// Divide, reporting `when_undefined` instead of a non-finite result.
pub fn checked_div(numerator: f64, denominator: f64, when_undefined: Indeterminate) -> Metric<f64> {
    if denominator == 0.0 {
        return Err(when_undefined);
    }
    let value = numerator / denominator;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(when_undefined)
    }
}

/// a·(1 − t) + b·t. Lands exactly on `a` at t = 0 and on `b` at t = 1.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}
