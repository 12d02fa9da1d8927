use crate::{
    campaign::{CampaignPatch, CampaignSettings, ChannelPatch, CustomerSegment, MarketingChannel, SegmentPatch},
    optimization::OptimizationLevel,
    scenario::{ScenarioDraft, ScenarioPatch},
    types::{ChannelId, ScenarioId, SegmentId},
};
use serde::{Deserialize, Serialize};

/// Every edit a session accepts.
/// Settings edits trigger a full recomputation; scenario edits only
/// touch the scenario book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum SessionCommand {
    // ── Campaign ──────────────────────────────────
    UpdateCampaign { patch: CampaignPatch },
    ReplaceSettings { settings: CampaignSettings },

    // ── Channels ──────────────────────────────────
    UpdateChannel { channel_id: ChannelId, patch: ChannelPatch },
    SetChannelBudget { channel_id: ChannelId, budget: f64 },
    ToggleChannel { channel_id: ChannelId, enabled: bool },
    AddChannel { channel: MarketingChannel },
    RemoveChannel { channel_id: ChannelId },

    // ── Segments ──────────────────────────────────
    UpdateSegment { segment_id: SegmentId, patch: SegmentPatch },
    AddSegment { segment: CustomerSegment },
    RemoveSegment { segment_id: SegmentId },

    // ── Scenarios ─────────────────────────────────
    CreateScenario { draft: ScenarioDraft },
    EditScenario { scenario_id: ScenarioId, patch: ScenarioPatch },
    DeleteScenario { scenario_id: ScenarioId },
    ResetScenarios,

    // ── Optimization ──────────────────────────────
    ApplyRecommendations {
        #[serde(default)]
        channel_ids: Option<Vec<ChannelId>>,
        level: OptimizationLevel,
    },
}

impl SessionCommand {
    /// Stable name for the event log.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateCampaign { .. }       => "update_campaign",
            Self::ReplaceSettings { .. }      => "replace_settings",
            Self::UpdateChannel { .. }        => "update_channel",
            Self::SetChannelBudget { .. }     => "set_channel_budget",
            Self::ToggleChannel { .. }        => "toggle_channel",
            Self::AddChannel { .. }           => "add_channel",
            Self::RemoveChannel { .. }        => "remove_channel",
            Self::UpdateSegment { .. }        => "update_segment",
            Self::AddSegment { .. }           => "add_segment",
            Self::RemoveSegment { .. }        => "remove_segment",
            Self::CreateScenario { .. }       => "create_scenario",
            Self::EditScenario { .. }         => "edit_scenario",
            Self::DeleteScenario { .. }       => "delete_scenario",
            Self::ResetScenarios              => "reset_scenarios",
            Self::ApplyRecommendations { .. } => "apply_recommendations",
        }
    }
}
