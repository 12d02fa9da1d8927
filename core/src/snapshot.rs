//! The projection snapshot: everything derived from one revision of
//! the campaign settings.
//!
//! A snapshot is built whole and swapped in with a single assignment.
//! Consumers never see a half-updated projection.

use crate::{
    metrics::MarketingMetrics,
    optimization::OptimizationRecommendation,
    scenario::{ScenarioComparison, ScenarioData},
    sensitivity::SensitivityData,
    timeline::ProjectionTimeline,
    types::Revision,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSnapshot {
    pub revision:        Revision,
    pub metrics:         MarketingMetrics,
    pub timeline:        ProjectionTimeline,
    pub sensitivity:     Vec<SensitivityData>,
    pub scenarios:       Vec<ScenarioData>,
    pub comparison:      ScenarioComparison,
    pub recommendations: Vec<OptimizationRecommendation>,
}
