//! The projection session, the single writer over one campaign.
//!
//! RECOMPUTATION ORDER (fixed, documented, never reordered):
//!   1. Aggregate metrics + seasonal timeline
//!   2. Sensitivity analysis
//!   3. Scenario book re-derivation and comparison
//!   4. Optimization recommendations
//!
//! RULES:
//!   - Every settings edit is applied to a candidate copy and validated
//!     before it replaces the current settings.
//!   - A rejected command leaves settings, scenarios and snapshot as
//!     they were.
//!   - The snapshot is rebuilt whole and swapped in with one assignment.
//!   - An edit that leaves the settings unchanged does not recompute.
//!   - Nothing here reads ambient state; the config is passed in.

use crate::{
    campaign::{CampaignSettings, MarketingChannel},
    command::SessionCommand,
    config::ModelConfig,
    error::{ProjectionError, ProjectionResult},
    event::SessionEvent,
    metrics::{self, MarketingMetrics, Projection},
    optimization,
    record::CampaignRecord,
    scenario::{self, ScenarioBase, ScenarioBook, ScenarioData},
    sensitivity,
    snapshot::ProjectionSnapshot,
    types::{Metric, Revision},
    validation,
};

pub struct ProjectionSession {
    config:    ModelConfig,
    settings:  CampaignSettings,
    scenarios: ScenarioBook,
    snapshot:  ProjectionSnapshot,
    revision:  Revision,
    events:    Vec<SessionEvent>,
}

impl ProjectionSession {
    /// Validate `settings` and compute the first snapshot. The scenario
    /// book starts with every configured preset.
    pub fn new(settings: CampaignSettings, config: ModelConfig) -> ProjectionResult<Self> {
        Self::start(settings, None, config)
    }

    /// Session over the reference campaign with default config.
    pub fn reference() -> ProjectionResult<Self> {
        Self::new(CampaignSettings::reference_defaults(), ModelConfig::default())
    }

    /// Resume from a saved record. Saved scenarios are re-derived
    /// against the recomputed base.
    pub fn from_record(record: CampaignRecord, config: ModelConfig) -> ProjectionResult<Self> {
        let scenarios = if record.scenarios.is_empty() {
            None
        } else {
            Some(record.scenarios)
        };
        Self::start(record.settings, scenarios, config)
    }

    fn start(
        settings: CampaignSettings,
        saved: Option<Vec<ScenarioData>>,
        config: ModelConfig,
    ) -> ProjectionResult<Self> {
        let settings = validation::prepare(settings, config.segment_weighting)?;
        let projection = metrics::project(&settings);
        let base = scenario_base(&projection.metrics, &settings);
        let mut scenarios = match saved {
            Some(saved) => ScenarioBook::restore(saved, base),
            None => ScenarioBook::from_presets(&config.scenario_presets, base),
        };
        let snapshot = build_snapshot(0, &settings, &config, projection, &mut scenarios);

        let mut session = Self {
            config,
            settings,
            scenarios,
            snapshot,
            revision: 0,
            events: Vec::new(),
        };
        session.events.push(SessionEvent::SessionStarted {
            revision: 0,
            campaign: session.settings.name.clone(),
        });
        session.log_recompute();
        Ok(session)
    }

    pub fn settings(&self) -> &CampaignSettings {
        &self.settings
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &ProjectionSnapshot {
        &self.snapshot
    }

    pub fn scenarios(&self) -> &ScenarioBook {
        &self.scenarios
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn export_record(&self) -> CampaignRecord {
        CampaignRecord::new(self.settings.clone(), self.scenarios.scenarios().to_vec())
    }

    /// Apply one command. On error nothing changes except the event log.
    pub fn apply(&mut self, command: SessionCommand) -> ProjectionResult<&ProjectionSnapshot> {
        let name = command.name();
        if let Err(err) = self.execute(command) {
            log::warn!("{}: {name} rejected: {err}", self.settings.name);
            self.events.push(SessionEvent::CommandRejected {
                revision: self.revision,
                command: name.into(),
                reason: err.to_string(),
            });
            return Err(err);
        }
        Ok(&self.snapshot)
    }

    fn execute(&mut self, command: SessionCommand) -> ProjectionResult<()> {
        let name = command.name();
        match command {
            SessionCommand::UpdateCampaign { patch } => self.edit_settings(name, |s| {
                patch.apply_to(s);
                Ok(())
            }),
            SessionCommand::ReplaceSettings { settings } => self.edit_settings(name, |s| {
                *s = settings;
                Ok(())
            }),
            SessionCommand::UpdateChannel { channel_id, patch } => self.edit_settings(name, |s| {
                patch.apply_to(find_channel(s, &channel_id)?);
                Ok(())
            }),
            SessionCommand::SetChannelBudget { channel_id, budget } => {
                self.edit_settings(name, |s| {
                    find_channel(s, &channel_id)?.budget = budget;
                    Ok(())
                })
            }
            SessionCommand::ToggleChannel { channel_id, enabled } => {
                self.edit_settings(name, |s| {
                    find_channel(s, &channel_id)?.enabled = enabled;
                    Ok(())
                })
            }
            SessionCommand::AddChannel { channel } => self.edit_settings(name, |s| {
                s.channels.push(channel);
                Ok(())
            }),
            SessionCommand::RemoveChannel { channel_id } => self.edit_settings(name, |s| {
                let index = s
                    .channels
                    .iter()
                    .position(|c| c.id == channel_id)
                    .ok_or(ProjectionError::ChannelNotFound { id: channel_id })?;
                s.channels.remove(index);
                Ok(())
            }),
            SessionCommand::UpdateSegment { segment_id, patch } => self.edit_settings(name, |s| {
                let segment = s
                    .segment_mut(&segment_id)
                    .ok_or_else(|| ProjectionError::SegmentNotFound { id: segment_id.clone() })?;
                patch.apply_to(segment);
                Ok(())
            }),
            SessionCommand::AddSegment { segment } => self.edit_settings(name, |s| {
                s.segments.push(segment);
                Ok(())
            }),
            SessionCommand::RemoveSegment { segment_id } => self.edit_settings(name, |s| {
                let index = s
                    .segments
                    .iter()
                    .position(|seg| seg.id == segment_id)
                    .ok_or(ProjectionError::SegmentNotFound { id: segment_id })?;
                s.segments.remove(index);
                Ok(())
            }),

            // ── Scenarios ──────────────────────────────────────

            SessionCommand::CreateScenario { draft } => {
                let name = draft.name.clone();
                let base = scenario_base(&self.snapshot.metrics, &self.settings);
                let scenario_id = self.scenarios.create(draft, base);
                self.events.push(SessionEvent::ScenarioCreated {
                    revision: self.revision,
                    scenario_id,
                    name,
                });
                self.refresh_scenarios();
                Ok(())
            }
            SessionCommand::EditScenario { scenario_id, patch } => {
                let base = scenario_base(&self.snapshot.metrics, &self.settings);
                self.scenarios.edit(&scenario_id, &patch, base)?;
                self.events.push(SessionEvent::ScenarioEdited {
                    revision: self.revision,
                    scenario_id,
                });
                self.refresh_scenarios();
                Ok(())
            }
            SessionCommand::DeleteScenario { scenario_id } => {
                self.scenarios.delete(&scenario_id)?;
                self.events.push(SessionEvent::ScenarioDeleted {
                    revision: self.revision,
                    scenario_id,
                });
                self.refresh_scenarios();
                Ok(())
            }
            SessionCommand::ResetScenarios => {
                let base = scenario_base(&self.snapshot.metrics, &self.settings);
                self.scenarios.reset(&self.config.scenario_presets, base);
                self.events.push(SessionEvent::ScenariosReset {
                    revision: self.revision,
                });
                self.refresh_scenarios();
                Ok(())
            }

            // ── Optimization ───────────────────────────────────

            SessionCommand::ApplyRecommendations { channel_ids, level } => {
                let updated = optimization::apply_recommendations(
                    &self.settings,
                    &self.snapshot.recommendations,
                    channel_ids.as_deref(),
                    level,
                    &self.config.optimization.level_factors,
                )?;
                let channels = channel_ids
                    .as_ref()
                    .map_or(self.snapshot.recommendations.len(), Vec::len);
                self.edit_settings(name, |s| {
                    *s = updated;
                    Ok(())
                })?;
                self.events.push(SessionEvent::RecommendationsApplied {
                    revision: self.revision,
                    level,
                    channels,
                });
                Ok(())
            }
        }
    }

    /// Apply `edit` to a candidate copy, validate it, then commit and
    /// recompute.
    fn edit_settings(
        &mut self,
        command: &str,
        edit: impl FnOnce(&mut CampaignSettings) -> ProjectionResult<()>,
    ) -> ProjectionResult<()> {
        let mut candidate = self.settings.clone();
        edit(&mut candidate)?;

        if candidate == self.settings {
            log::debug!("{}: {command} left settings unchanged", self.settings.name);
            self.events.push(SessionEvent::SettingsUnchanged {
                revision: self.revision,
                command: command.into(),
            });
            return Ok(());
        }

        let candidate = validation::prepare(candidate, self.config.segment_weighting)?;
        self.revision += 1;
        self.settings = candidate;
        self.events.push(SessionEvent::SettingsChanged {
            revision: self.revision,
            command: command.into(),
        });
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        let projection = metrics::project(&self.settings);
        self.snapshot = build_snapshot(
            self.revision,
            &self.settings,
            &self.config,
            projection,
            &mut self.scenarios,
        );
        self.log_recompute();
    }

    /// Scenario edits do not change the base; only the scenario part of
    /// the snapshot is refreshed.
    fn refresh_scenarios(&mut self) {
        self.snapshot.scenarios = self.scenarios.scenarios().to_vec();
        self.snapshot.comparison = scenario::compare(self.scenarios.scenarios(), &self.snapshot.metrics);
    }

    fn log_recompute(&mut self) {
        let m = &self.snapshot.metrics;
        log::info!(
            "{} r{}: ROI={} Profit={} Revenue={} CAC={} CLTV={} Recs={}",
            self.settings.name,
            self.revision,
            show(&m.roi, "%"),
            show(&m.total_profit, ""),
            show(&m.total_revenue, ""),
            show(&m.cac, ""),
            show(&m.cltv, ""),
            self.snapshot.recommendations.len()
        );
        self.events.push(SessionEvent::MetricsRecomputed {
            revision: self.revision,
            roi: m.roi.ok(),
            total_profit: m.total_profit.ok(),
            recommendations: self.snapshot.recommendations.len(),
        });
    }
}

fn scenario_base<'a>(metrics: &'a MarketingMetrics, settings: &CampaignSettings) -> ScenarioBase<'a> {
    ScenarioBase {
        metrics,
        discount_divisor: metrics::discount_divisor(settings),
    }
}

fn build_snapshot(
    revision: Revision,
    settings: &CampaignSettings,
    config: &ModelConfig,
    projection: Projection,
    scenarios: &mut ScenarioBook,
) -> ProjectionSnapshot {
    let Projection { metrics, timeline } = projection;
    let sensitivity = sensitivity::analyze(settings, &metrics, &config.sensitivity);
    scenarios.rederive(scenario_base(&metrics, settings));
    let comparison = scenario::compare(scenarios.scenarios(), &metrics);
    let recommendations = optimization::recommend(settings, &config.optimization);

    ProjectionSnapshot {
        revision,
        metrics,
        timeline,
        sensitivity,
        scenarios: scenarios.scenarios().to_vec(),
        comparison,
        recommendations,
    }
}

fn find_channel<'a>(
    settings: &'a mut CampaignSettings,
    id: &str,
) -> ProjectionResult<&'a mut MarketingChannel> {
    settings
        .channel_mut(id)
        .ok_or_else(|| ProjectionError::ChannelNotFound { id: id.into() })
}

fn show(metric: &Metric<f64>, unit: &str) -> String {
    match metric {
        Ok(v) => format!("{v:.2}{unit}"),
        Err(reason) => format!("n/a ({reason})"),
    }
}
