//! The session event log.
//!
//! RULE: every command leaves at least one entry describing its
//! outcome, plus a `MetricsRecomputed` entry when the snapshot was
//! rebuilt.

use crate::{
    optimization::OptimizationLevel,
    types::{Revision, ScenarioId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted {
        revision: Revision,
        campaign: String,
    },
    SettingsChanged {
        revision: Revision,
        command: String,
    },
    /// The command changed nothing, so nothing was recomputed.
    SettingsUnchanged {
        revision: Revision,
        command: String,
    },
    CommandRejected {
        revision: Revision,
        command: String,
        reason: String,
    },
    MetricsRecomputed {
        revision: Revision,
        roi: Option<f64>,
        total_profit: Option<f64>,
        recommendations: usize,
    },
    ScenarioCreated {
        revision: Revision,
        scenario_id: ScenarioId,
        name: String,
    },
    ScenarioEdited {
        revision: Revision,
        scenario_id: ScenarioId,
    },
    ScenarioDeleted {
        revision: Revision,
        scenario_id: ScenarioId,
    },
    ScenariosReset {
        revision: Revision,
    },
    RecommendationsApplied {
        revision: Revision,
        level: OptimizationLevel,
        channels: usize,
    },
}
