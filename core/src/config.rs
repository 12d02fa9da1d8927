use crate::{campaign::CampaignSettings, sensitivity::SensitivityVariable};
use serde::{Deserialize, Serialize};

// ── Optimization ───────────────────────────────────────────────────

/// Efficiency cut-offs for the high/medium/low channel bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    /// Efficiency at or above this is "high".
    pub high: f64,
    /// Efficiency below this is "low".
    pub low: f64,
}

/// How recommendation confidence is scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ConfidenceModel {
    /// floor + (ceiling - floor) * min(distance / saturation, 1), where
    /// distance is how far efficiency sits from the nearest band edge.
    ThresholdDistance {
        floor: f64,
        ceiling: f64,
        saturation: f64,
    },
    /// Uniform jitter in [floor, ceiling), drawn from a seeded stream.
    Seeded { seed: u64, floor: f64, ceiling: f64 },
}

/// Blend factor per optimization level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFactors {
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    pub thresholds: BandThresholds,
    /// Fractional budget change for high/low channels (0.20 = ±20%).
    pub budget_step: f64,
    pub confidence: ConfidenceModel,
    pub level_factors: LevelFactors,
}

// ── Sensitivity ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Low,
    Medium,
    High,
}

/// The interval a variable is swept across.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SweepRange {
    /// Multiples of the base value.
    Relative { lo: f64, hi: f64 },
    /// Absolute values in the variable's own unit.
    Absolute { lo: f64, hi: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub variable: SensitivityVariable,
    pub range: SweepRange,
    pub criticality: Criticality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Points per sweep, endpoints included.
    pub samples: usize,
    pub sweeps: Vec<SweepSpec>,
}

// ── Scenarios ──────────────────────────────────────────────────────

/// Percentage adjustments a scenario applies to the campaign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    pub budget: f64,
    pub cac: f64,
    pub cltv: f64,
    pub conversion: f64,
}

/// Fixed multipliers a preset scenario applies to the base metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricMultipliers {
    pub cac: f64,
    pub cltv: f64,
    pub roi: f64,
    pub profit: f64,
    pub revenue: f64,
}

impl MetricMultipliers {
    pub const IDENTITY: Self = Self {
        cac: 1.0,
        cltv: 1.0,
        roi: 1.0,
        profit: 1.0,
        revenue: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPreset {
    pub name: String,
    pub description: String,
    pub adjustments: Adjustments,
    pub multipliers: MetricMultipliers,
}

// ── Validation policy ──────────────────────────────────────────────

/// What to do when segment percentages do not total 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentWeighting {
    Reject,
    /// Rescale percentages to total 100, logging a warning.
    Normalize,
}

// ── Model config ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub optimization: OptimizationConfig,
    pub sensitivity: SensitivityConfig,
    pub scenario_presets: Vec<ScenarioPreset>,
    pub segment_weighting: SegmentWeighting,
}

impl ModelConfig {
    /// Load from the data/ directory.
    /// In tests, use ModelConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/model/model_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ModelConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.sensitivity.samples < 2 {
            anyhow::bail!("{path}: sensitivity.samples must be at least 2");
        }
        Ok(config)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        let sweep = |variable, range, criticality| SweepSpec {
            variable,
            range,
            criticality,
        };
        let preset = |name: &str, description: &str, adjustments, multipliers| ScenarioPreset {
            name: name.into(),
            description: description.into(),
            adjustments,
            multipliers,
        };

        Self {
            optimization: OptimizationConfig {
                thresholds: BandThresholds { high: 1.2, low: 0.8 },
                budget_step: 0.20,
                confidence: ConfidenceModel::ThresholdDistance {
                    floor: 65.0,
                    ceiling: 90.0,
                    saturation: 0.4,
                },
                level_factors: LevelFactors {
                    conservative: 0.50,
                    moderate: 0.75,
                    aggressive: 1.00,
                },
            },
            sensitivity: SensitivityConfig {
                samples: 11,
                sweeps: vec![
                    sweep(
                        SensitivityVariable::Cac,
                        SweepRange::Relative { lo: 0.5, hi: 1.5 },
                        Criticality::High,
                    ),
                    sweep(
                        SensitivityVariable::Cltv,
                        SweepRange::Relative { lo: 0.5, hi: 1.5 },
                        Criticality::High,
                    ),
                    sweep(
                        SensitivityVariable::ConversionRate,
                        SweepRange::Relative { lo: 0.5, hi: 1.5 },
                        Criticality::Medium,
                    ),
                    sweep(
                        SensitivityVariable::ChurnRate,
                        SweepRange::Absolute { lo: 0.0, hi: 20.0 },
                        Criticality::Medium,
                    ),
                    sweep(
                        SensitivityVariable::AverageOrderValue,
                        SweepRange::Relative { lo: 0.5, hi: 1.5 },
                        Criticality::Medium,
                    ),
                ],
            },
            scenario_presets: vec![
                preset(
                    "Base",
                    "Current configuration with no adjustments",
                    Adjustments::default(),
                    MetricMultipliers::IDENTITY,
                ),
                preset(
                    "Optimistic",
                    "Stronger conversion and retention at the same spend",
                    Adjustments { budget: 0.0, cac: -15.0, cltv: 10.0, conversion: 20.0 },
                    MetricMultipliers { cac: 0.85, cltv: 1.10, roi: 1.4, profit: 1.4, revenue: 1.2 },
                ),
                preset(
                    "Conservative",
                    "Softer demand and higher acquisition costs",
                    Adjustments { budget: 0.0, cac: 15.0, cltv: -10.0, conversion: -15.0 },
                    MetricMultipliers { cac: 1.15, cltv: 0.90, roi: 0.6, profit: 0.6, revenue: 0.85 },
                ),
                preset(
                    "Aggressive",
                    "Half again the budget with diminishing returns on acquisition",
                    Adjustments { budget: 50.0, cac: 10.0, cltv: 0.0, conversion: 0.0 },
                    MetricMultipliers { cac: 1.10, cltv: 1.00, roi: 1.2, profit: 1.6, revenue: 1.5 },
                ),
                preset(
                    "Efficiency",
                    "Budget cut to the best-performing channels",
                    Adjustments { budget: -20.0, cac: -20.0, cltv: 5.0, conversion: 5.0 },
                    MetricMultipliers { cac: 0.80, cltv: 1.05, roi: 1.5, profit: 1.1, revenue: 0.9 },
                ),
            ],
            segment_weighting: SegmentWeighting::Reject,
        }
    }
}

/// Load a campaign file (a plain `CampaignSettings` JSON document).
pub fn load_campaign(path: &str) -> anyhow::Result<CampaignSettings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    let settings: CampaignSettings = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
    Ok(settings)
}
