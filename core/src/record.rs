//! Saved campaign records.
//!
//! A record is the campaign settings plus the scenario list, tagged with
//! a format version. Metrics are never trusted from a record; the session
//! recomputes them on load.

use crate::{
    campaign::CampaignSettings,
    error::{ProjectionError, ProjectionResult},
    scenario::ScenarioData,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const RECORD_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub format_version: u32,
    pub settings:       CampaignSettings,
    #[serde(default)]
    pub scenarios:      Vec<ScenarioData>,
}

impl CampaignRecord {
    pub fn new(settings: CampaignSettings, scenarios: Vec<ScenarioData>) -> Self {
        Self {
            format_version: RECORD_FORMAT_VERSION,
            settings,
            scenarios,
        }
    }

    pub fn to_value(&self) -> ProjectionResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse a record, rejecting any other format version.
    pub fn from_value(value: Value) -> ProjectionResult<Self> {
        let record: Self = serde_json::from_value(value)?;
        record.check_version()
    }

    pub fn to_json(&self) -> ProjectionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> ProjectionResult<Self> {
        let record: Self = serde_json::from_str(raw)?;
        record.check_version()
    }

    fn check_version(self) -> ProjectionResult<Self> {
        if self.format_version != RECORD_FORMAT_VERSION {
            return Err(ProjectionError::RecordVersion {
                expected: RECORD_FORMAT_VERSION,
                actual:   self.format_version,
            });
        }
        Ok(self)
    }
}
