//! Optimization recommender: budget reallocation by channel efficiency.
//!
//! Every enabled channel with a defined efficiency gets one
//! recommendation: high band +step, medium unchanged, low −step.
//! Recommendations are ranked by expected ROI improvement.
//!
//! Confidence is deterministic by default (distance from the nearest
//! band edge). The seeded model draws a uniform confidence between its
//! floor and ceiling from a fixed seed, so it is still repeatable.

use crate::{
    campaign::CampaignSettings,
    channel::{self, EfficiencyBand},
    config::{ConfidenceModel, LevelFactors, OptimizationConfig},
    error::{ProjectionError, ProjectionResult},
    metrics::lerp,
    rng::{JitterRng, JitterStream},
    types::ChannelId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecommendation {
    pub channel_id:               ChannelId,
    pub band:                     EfficiencyBand,
    pub efficiency:               f64,
    pub current_budget:           f64,
    pub recommended_budget:       f64,
    /// Percent.
    pub expected_roi_improvement: f64,
    /// Percent.
    pub confidence:               f64,
    pub reasoning:                String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationLevel {
    Conservative,
    Moderate,
    Aggressive,
}

impl OptimizationLevel {
    pub fn blend_factor(&self, factors: &LevelFactors) -> f64 {
        match self {
            Self::Conservative => factors.conservative,
            Self::Moderate => factors.moderate,
            Self::Aggressive => factors.aggressive,
        }
    }
}

/// Recommend a budget for every enabled channel. No enabled channels
/// means no recommendations.
pub fn recommend(
    settings: &CampaignSettings,
    config: &OptimizationConfig,
) -> Vec<OptimizationRecommendation> {
    let thresholds = &config.thresholds;
    let mut jitter = match config.confidence {
        ConfidenceModel::Seeded { seed, .. } => Some(JitterRng::new(seed, JitterStream::Confidence)),
        ConfidenceModel::ThresholdDistance { .. } => None,
    };

    let mut recommendations = Vec::new();
    for ch in settings.enabled_channels() {
        let efficiency = match channel::efficiency(ch) {
            Ok(e) => e,
            Err(reason) => {
                log::debug!("optimization: skipping channel {} ({reason})", ch.id);
                continue;
            }
        };
        let band = channel::classify(efficiency, thresholds);
        let delta = match band {
            EfficiencyBand::High => config.budget_step,
            EfficiencyBand::Medium => 0.0,
            EfficiencyBand::Low => -config.budget_step,
        };

        let margin = channel::band_margin(efficiency, thresholds);
        let confidence = match (&config.confidence, jitter.as_mut()) {
            (ConfidenceModel::Seeded { floor, ceiling, .. }, Some(rng)) => rng.uniform(*floor, *ceiling),
            (ConfidenceModel::ThresholdDistance { floor, ceiling, saturation }, _) => {
                distance_confidence(margin, *floor, *ceiling, *saturation)
            }
            (ConfidenceModel::Seeded { floor, .. }, None) => *floor,
        };

        recommendations.push(OptimizationRecommendation {
            channel_id: ch.id.clone(),
            band,
            efficiency,
            current_budget: ch.budget,
            recommended_budget: ch.budget * (1.0 + delta),
            expected_roi_improvement: expected_improvement(efficiency, delta),
            confidence,
            reasoning: reasoning(band, efficiency, config),
        });
    }

    recommendations.sort_by(|a, b| {
        b.expected_roi_improvement
            .total_cmp(&a.expected_roi_improvement)
            .then_with(|| a.channel_id.cmp(&b.channel_id))
    });
    recommendations
}

/// (efficiency − 1) × budget change, in percent. Non-negative for
/// high and low bands, zero for medium.
fn expected_improvement(efficiency: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }
    (efficiency - 1.0) * delta * 100.0
}

fn distance_confidence(margin: f64, floor: f64, ceiling: f64, saturation: f64) -> f64 {
    let reach = if saturation > 0.0 {
        (margin / saturation).clamp(0.0, 1.0)
    } else {
        1.0
    };
    floor + (ceiling - floor) * reach
}

fn reasoning(band: EfficiencyBand, efficiency: f64, config: &OptimizationConfig) -> String {
    let t = &config.thresholds;
    let step = config.budget_step * 100.0;
    match band {
        EfficiencyBand::High => format!(
            "Efficiency {efficiency:.2} is at or above {:.2}; increase budget by {step:.0}%",
            t.high
        ),
        EfficiencyBand::Medium => format!(
            "Efficiency {efficiency:.2} is between {:.2} and {:.2}; keep the current budget",
            t.low, t.high
        ),
        EfficiencyBand::Low => format!(
            "Efficiency {efficiency:.2} is below {:.2}; reduce budget by {step:.0}%",
            t.low
        ),
    }
}

/// Move selected channel budgets toward their recommendations.
///
/// new = current × (1 − f) + recommended × f, with f from `level`.
/// `channel_ids = None` applies every recommendation. Returns the
/// updated settings; the input is left untouched.
pub fn apply_recommendations(
    settings: &CampaignSettings,
    recommendations: &[OptimizationRecommendation],
    channel_ids: Option<&[ChannelId]>,
    level: OptimizationLevel,
    factors: &LevelFactors,
) -> ProjectionResult<CampaignSettings> {
    if let Some(ids) = channel_ids {
        for id in ids {
            if !recommendations.iter().any(|r| r.channel_id == *id) {
                return Err(ProjectionError::ChannelNotFound { id: id.clone() });
            }
        }
    }
    let selected: Option<HashSet<&str>> =
        channel_ids.map(|ids| ids.iter().map(String::as_str).collect());

    let factor = level.blend_factor(factors);
    let mut updated = settings.clone();
    for rec in recommendations {
        if selected.as_ref().is_some_and(|ids| !ids.contains(rec.channel_id.as_str())) {
            continue;
        }
        let channel = updated
            .channel_mut(&rec.channel_id)
            .ok_or_else(|| ProjectionError::ChannelNotFound { id: rec.channel_id.clone() })?;
        channel.budget = lerp(channel.budget, rec.recommended_budget, factor);
    }
    Ok(updated)
}
