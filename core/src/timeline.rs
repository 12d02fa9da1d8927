//! Seasonal projection timeline: the campaign P&L month by month.
//!
//! Revenue is spread across campaign months by each calendar month's
//! seasonality factor. Channel spend is spread evenly and overhead is
//! booked in the first month. The timeline yields the profitability
//! date and a cash-flow IRR solved by bisection.

use crate::{
    campaign::CampaignSettings,
    error::Indeterminate,
    metrics::DAYS_PER_MONTH,
    types::Metric,
};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Longer campaigns are not broken down month by month.
pub const MAX_TIMELINE_MONTHS: u32 = 1_200;

/// Lower bracket candidates, tried in order. Long flow series overflow
/// the discount at rates near -1.
const IRR_LOWER_BOUNDS: [f64; 5] = [-0.99, -0.9, -0.5, -0.1, 0.0];
const IRR_UPPER_BOUND: f64 = 10.0;
const IRR_MAX_ITERATIONS: u32 = 200;
const IRR_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProjection {
    pub index:             u32,
    pub month_start:       NaiveDate,
    pub seasonality:       f64,
    pub revenue:           f64,
    pub spend:             f64,
    pub overhead:          f64,
    pub profit:            f64,
    pub cumulative_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTimeline {
    pub months: Vec<MonthProjection>,
    /// End of the first month whose cumulative profit is not negative.
    pub profitability_date: Metric<NaiveDate>,
    /// Annualised rate, in percent, at which the monthly cash flows
    /// have zero net present value.
    pub cash_flow_irr: Metric<f64>,
}

impl ProjectionTimeline {
    fn indeterminate(reason: Indeterminate) -> Self {
        Self {
            months: Vec::new(),
            profitability_date: Err(reason),
            cash_flow_irr: Err(reason),
        }
    }
}

pub fn build(
    settings: &CampaignSettings,
    total_budget: f64,
    total_revenue: Metric<f64>,
) -> ProjectionTimeline {
    let total_revenue = match total_revenue {
        Ok(revenue) => revenue,
        Err(reason) => return ProjectionTimeline::indeterminate(reason),
    };
    let month_count = match month_count(settings) {
        Ok(n) => n,
        Err(reason) => return ProjectionTimeline::indeterminate(reason),
    };

    let mut month_starts = Vec::with_capacity(month_count as usize);
    for index in 0..month_count {
        match settings.start_date.checked_add_months(Months::new(index)) {
            Some(date) => month_starts.push(date),
            None => return ProjectionTimeline::indeterminate(Indeterminate::BeyondCalendar),
        }
    }

    let factors: Vec<f64> = month_starts
        .iter()
        .map(|d| settings.seasonality_factors[d.month0() as usize])
        .collect();
    let factor_total: f64 = factors.iter().sum();
    let uniform = !(factor_total > 0.0);

    let spend = total_budget / month_count as f64;
    let mut cumulative = 0.0;
    let mut months = Vec::with_capacity(month_starts.len());

    for (index, (month_start, factor)) in month_starts.into_iter().zip(factors).enumerate() {
        let share = if uniform {
            1.0 / month_count as f64
        } else {
            factor / factor_total
        };
        let revenue = total_revenue * share;
        let overhead = if index == 0 { settings.overhead_costs } else { 0.0 };
        let profit = revenue - spend - overhead;
        cumulative += profit;

        months.push(MonthProjection {
            index: index as u32,
            month_start,
            seasonality: factor,
            revenue,
            spend,
            overhead,
            profit,
            cumulative_profit: cumulative,
        });
    }

    let profitability_date = profitability_date(settings, &months);
    let flows: Vec<f64> = months.iter().map(|m| m.profit).collect();
    let cash_flow_irr = solve_irr(&flows).map(|monthly| ((1.0 + monthly).powi(12) - 1.0) * 100.0);

    ProjectionTimeline {
        months,
        profitability_date,
        cash_flow_irr,
    }
}

fn month_count(settings: &CampaignSettings) -> Metric<u32> {
    let days = settings.duration_days();
    if days <= 0 {
        return Err(Indeterminate::NonPositiveDuration);
    }
    let months = (days as f64 / DAYS_PER_MONTH).ceil().max(1.0);
    if months > MAX_TIMELINE_MONTHS as f64 {
        return Err(Indeterminate::BeyondCalendar);
    }
    Ok(months as u32)
}

fn profitability_date(
    settings: &CampaignSettings,
    months: &[MonthProjection],
) -> Metric<NaiveDate> {
    let month = months
        .iter()
        .find(|m| m.cumulative_profit >= 0.0)
        .ok_or(Indeterminate::NeverBreaksEven)?;
    let month_end = settings
        .start_date
        .checked_add_months(Months::new(month.index + 1))
        .ok_or(Indeterminate::BeyondCalendar)?;
    Ok(month_end.min(settings.end_date))
}

/// Net present value of `flows` at a per-period `rate`; the first flow
/// is undiscounted.
pub fn present_value(flows: &[f64], rate: f64) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Per-period rate at which `flows` have zero present value.
pub fn solve_irr(flows: &[f64]) -> Metric<f64> {
    let has_inflow = flows.iter().any(|&cf| cf > 0.0);
    let has_outflow = flows.iter().any(|&cf| cf < 0.0);
    if !(has_inflow && has_outflow) {
        return Err(Indeterminate::NoSignChange);
    }

    let mut hi = IRR_UPPER_BOUND;
    let pv_hi = present_value(flows, hi);
    if !pv_hi.is_finite() {
        return Err(Indeterminate::NoSignChange);
    }
    let (mut lo, mut pv_lo) = IRR_LOWER_BOUNDS
        .iter()
        .map(|&rate| (rate, present_value(flows, rate)))
        .find(|(_, pv)| pv.is_finite())
        .ok_or(Indeterminate::NoSignChange)?;
    if pv_lo.signum() == pv_hi.signum() {
        return Err(Indeterminate::NoSignChange);
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let pv_mid = present_value(flows, mid);
        if pv_mid == 0.0 || (hi - lo) / 2.0 < IRR_TOLERANCE {
            return Ok(mid);
        }
        if pv_mid.signum() == pv_lo.signum() {
            lo = mid;
            pv_lo = pv_mid;
        } else {
            hi = mid;
        }
    }
    Ok((lo + hi) / 2.0)
}
