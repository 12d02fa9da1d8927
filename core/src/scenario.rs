//! Scenario generation and comparison.
//!
//! Two kinds of scenario, both re-derived from the current base metrics
//! on every recomputation:
//!   - Preset: fixed multipliers on CAC, CLTV, ROI, profit and revenue.
//!     These are curated illustrative deltas and are reproduced exactly.
//!   - Custom: four user-authored percentage adjustments (budget, CAC,
//!     CLTV, conversion) pushed through an approximate re-derivation.
//!
//! The scenario book is the in-memory list the session edits.

use crate::{
    config::{Adjustments, MetricMultipliers, ScenarioPreset},
    error::{Indeterminate, ProjectionError, ProjectionResult},
    metrics::{checked_div, MarketingMetrics},
    types::{Metric, ScenarioId},
};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioOrigin {
    Preset { multipliers: MetricMultipliers },
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    pub id:          ScenarioId,
    pub name:        String,
    pub description: String,
    pub origin:      ScenarioOrigin,
    pub adjustments: Adjustments,
    pub metrics:     MarketingMetrics,
}

/// A user-authored scenario before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub adjustments: Adjustments,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPatch {
    pub name:        Option<String>,
    pub description: Option<String>,
    pub budget:      Option<f64>,
    pub cac:         Option<f64>,
    pub cltv:        Option<f64>,
    pub conversion:  Option<f64>,
}

/// What a scenario is derived from: the base metrics and the divisor
/// that discounts end-of-campaign revenue.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioBase<'a> {
    pub metrics: &'a MarketingMetrics,
    pub discount_divisor: Metric<f64>,
}

// ── Derivation ─────────────────────────────────────────────────────

/// Apply preset multipliers. Ratio, IRR and margin are re-derived from
/// the multiplied figures; dates, payback and NPV carry over.
pub fn apply_multipliers(base: &MarketingMetrics, m: &MetricMultipliers) -> MarketingMetrics {
    let cac = base.cac.map(|v| v * m.cac);
    let cltv = base.cltv.map(|v| v * m.cltv);
    let roi = base.roi.map(|v| v * m.roi);
    let total_profit = base.total_profit.map(|v| v * m.profit);
    let total_revenue = base.total_revenue.map(|v| v * m.revenue);

    MarketingMetrics {
        cac,
        cltv,
        cac_to_cltv_ratio: ratio(cltv, cac),
        roi,
        irr: roi.map(|r| r / 2.0),
        total_profit,
        total_revenue,
        margin_contribution: margin(total_profit, total_revenue),
        ..base.clone()
    }
}

/// Approximate the metrics of a custom scenario from the base.
pub fn apply_adjustments(base: ScenarioBase<'_>, adj: &Adjustments) -> MarketingMetrics {
    let metrics = base.metrics;
    let budget_factor = 1.0 + adj.budget / 100.0;
    let revenue_factor = budget_factor * (1.0 + adj.conversion / 100.0);

    let cac = metrics.cac.map(|v| v * (1.0 + adj.cac / 100.0));
    let cltv = metrics.cltv.map(|v| v * (1.0 + adj.cltv / 100.0));

    let total_revenue = metrics.total_revenue.map(|r| r * revenue_factor);
    let adjusted_cost = metrics
        .total_revenue
        .and_then(|r| metrics.total_profit.map(|p| (r - p) * budget_factor));
    let total_profit = total_revenue.and_then(|r| adjusted_cost.map(|c| r - c));
    let roi = total_profit
        .and_then(|p| adjusted_cost.and_then(|c| checked_div(p, c, Indeterminate::ZeroTotalCost)))
        .map(|r| r * 100.0);
    let total_cost = adjusted_cost.unwrap_or(metrics.total_cost * budget_factor);

    // Halves round up: -2.5 shifts by -2.
    let shift = ((adj.budget - adj.conversion) / 10.0 + 0.5).floor();
    let npv = total_revenue.and_then(|r| {
        base.discount_divisor
            .and_then(|d| checked_div(r, d, Indeterminate::BeyondCalendar))
            .map(|present| -total_cost + present)
    });

    MarketingMetrics {
        cac,
        cltv,
        cac_to_cltv_ratio: ratio(cltv, cac),
        roi,
        break_even_point: metrics.break_even_point.and_then(|d| shift_months(d, shift)),
        payback_period: metrics
            .payback_period
            .map(|p| p * (1.0 + (adj.cac - adj.cltv) / 100.0)),
        npv,
        irr: roi.map(|r| r / 2.0),
        total_profit,
        total_revenue,
        margin_contribution: margin(total_profit, total_revenue),
        profitability_date: metrics.profitability_date.and_then(|d| shift_months(d, shift)),
        total_budget: metrics.total_budget * budget_factor,
        total_cost,
        total_customers: metrics.total_customers.map(|n| n * revenue_factor),
    }
}

fn derive(origin: &ScenarioOrigin, adjustments: &Adjustments, base: ScenarioBase<'_>) -> MarketingMetrics {
    match origin {
        ScenarioOrigin::Preset { multipliers } => apply_multipliers(base.metrics, multipliers),
        ScenarioOrigin::Custom => apply_adjustments(base, adjustments),
    }
}

fn ratio(cltv: Metric<f64>, cac: Metric<f64>) -> Metric<f64> {
    cltv.and_then(|l| cac.and_then(|c| checked_div(l, c, Indeterminate::ZeroCac)))
}

fn margin(profit: Metric<f64>, revenue: Metric<f64>) -> Metric<f64> {
    profit
        .and_then(|p| revenue.and_then(|r| checked_div(p, r, Indeterminate::ZeroRevenue)))
        .map(|m| m * 100.0)
}

/// Move `date` by a whole (possibly negative) number of months.
fn shift_months(date: NaiveDate, months: f64) -> Metric<NaiveDate> {
    if !months.is_finite() || months.abs() > u32::MAX as f64 {
        return Err(Indeterminate::BeyondCalendar);
    }
    let shifted = if months >= 0.0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new((-months) as u32))
    };
    shifted.ok_or(Indeterminate::BeyondCalendar)
}

pub fn preset_id(name: &str) -> ScenarioId {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("preset-{slug}")
}

/// Build one scenario per preset, in preset order.
pub fn generate_presets(presets: &[ScenarioPreset], base: ScenarioBase<'_>) -> Vec<ScenarioData> {
    presets
        .iter()
        .map(|preset| {
            let origin = ScenarioOrigin::Preset { multipliers: preset.multipliers };
            ScenarioData {
                id: preset_id(&preset.name),
                name: preset.name.clone(),
                description: preset.description.clone(),
                metrics: derive(&origin, &preset.adjustments, base),
                origin,
                adjustments: preset.adjustments,
            }
        })
        .collect()
}

// ── Scenario book ──────────────────────────────────────────────────

/// The in-memory scenario list. Create, edit and delete operate here;
/// `rederive` refreshes every entry against a new base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBook {
    scenarios: Vec<ScenarioData>,
}

impl ScenarioBook {
    pub fn from_presets(presets: &[ScenarioPreset], base: ScenarioBase<'_>) -> Self {
        Self {
            scenarios: generate_presets(presets, base),
        }
    }

    /// Rebuild a book from saved scenarios, re-deriving their metrics.
    pub fn restore(scenarios: Vec<ScenarioData>, base: ScenarioBase<'_>) -> Self {
        let mut book = Self { scenarios };
        book.rederive(base);
        book
    }

    pub fn scenarios(&self) -> &[ScenarioData] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioData> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn rederive(&mut self, base: ScenarioBase<'_>) {
        for scenario in &mut self.scenarios {
            scenario.metrics = derive(&scenario.origin, &scenario.adjustments, base);
        }
    }

    pub fn create(&mut self, draft: ScenarioDraft, base: ScenarioBase<'_>) -> ScenarioId {
        let id = uuid::Uuid::new_v4().to_string();
        let origin = ScenarioOrigin::Custom;
        let metrics = derive(&origin, &draft.adjustments, base);
        self.scenarios.push(ScenarioData {
            id: id.clone(),
            name: draft.name,
            description: draft.description,
            origin,
            adjustments: draft.adjustments,
            metrics,
        });
        id
    }

    pub fn edit(
        &mut self,
        id: &str,
        patch: &ScenarioPatch,
        base: ScenarioBase<'_>,
    ) -> ProjectionResult<()> {
        let scenario = self
            .scenarios
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ProjectionError::ScenarioNotFound { id: id.into() })?;

        if let Some(name) = &patch.name {
            scenario.name = name.clone();
        }
        if let Some(description) = &patch.description {
            scenario.description = description.clone();
        }
        let touches_adjustments = patch.budget.is_some()
            || patch.cac.is_some()
            || patch.cltv.is_some()
            || patch.conversion.is_some();
        // An edited preset stops following its multipliers.
        if touches_adjustments {
            scenario.origin = ScenarioOrigin::Custom;
        }
        let adj = &mut scenario.adjustments;
        adj.budget = patch.budget.unwrap_or(adj.budget);
        adj.cac = patch.cac.unwrap_or(adj.cac);
        adj.cltv = patch.cltv.unwrap_or(adj.cltv);
        adj.conversion = patch.conversion.unwrap_or(adj.conversion);

        scenario.metrics = derive(&scenario.origin, &scenario.adjustments, base);
        Ok(())
    }

    /// Remove a scenario. The book never becomes empty.
    pub fn delete(&mut self, id: &str) -> ProjectionResult<ScenarioData> {
        let index = self
            .scenarios
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ProjectionError::ScenarioNotFound { id: id.into() })?;
        if self.scenarios.len() == 1 {
            return Err(ProjectionError::LastScenario { id: id.into() });
        }
        Ok(self.scenarios.remove(index))
    }

    /// Drop custom scenarios and restore every preset.
    pub fn reset(&mut self, presets: &[ScenarioPreset], base: ScenarioBase<'_>) {
        self.scenarios = generate_presets(presets, base);
    }
}

// ── Comparison ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub scenario_id:   ScenarioId,
    pub name:          String,
    pub roi:           Metric<f64>,
    /// Percentage points against the base ROI.
    pub roi_delta:     Metric<f64>,
    pub profit_delta:  Metric<f64>,
    pub revenue_delta: Metric<f64>,
    pub cac_to_cltv_ratio: Metric<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub rows: Vec<ComparisonRow>,
    pub best_roi: Option<ScenarioId>,
    pub best_profit: Option<ScenarioId>,
}

/// Compare each scenario against `base`. Ties go to the earlier entry.
pub fn compare(scenarios: &[ScenarioData], base: &MarketingMetrics) -> ScenarioComparison {
    let delta = |value: Metric<f64>, reference: Metric<f64>| {
        value.and_then(|v| reference.map(|r| v - r))
    };

    let rows = scenarios
        .iter()
        .map(|s| ComparisonRow {
            scenario_id: s.id.clone(),
            name: s.name.clone(),
            roi: s.metrics.roi,
            roi_delta: delta(s.metrics.roi, base.roi),
            profit_delta: delta(s.metrics.total_profit, base.total_profit),
            revenue_delta: delta(s.metrics.total_revenue, base.total_revenue),
            cac_to_cltv_ratio: s.metrics.cac_to_cltv_ratio,
        })
        .collect();

    ScenarioComparison {
        rows,
        best_roi: best_by(scenarios, |m| m.roi),
        best_profit: best_by(scenarios, |m| m.total_profit),
    }
}

fn best_by(
    scenarios: &[ScenarioData],
    key: impl Fn(&MarketingMetrics) -> Metric<f64>,
) -> Option<ScenarioId> {
    let mut best: Option<(&ScenarioData, f64)> = None;
    for scenario in scenarios {
        if let Ok(value) = key(&scenario.metrics) {
            if best.map_or(true, |(_, top)| value > top) {
                best = Some((scenario, value));
            }
        }
    }
    best.map(|(s, _)| s.id.clone())
}
