//! Campaign configuration: channels, segments and the campaign window.
//!
//! These are plain value types. Nothing here computes metrics; the
//! evaluators in `channel`, `segment` and `metrics` read them.

use crate::types::{ChannelId, SegmentId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of seasonality factors, one per calendar month.
pub const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingChannel {
    pub id:                  ChannelId,
    pub name:                String,
    pub budget:              f64,
    pub cac:                 f64,
    /// Percent of visitors who convert.
    pub conversion_rate:     f64,
    pub cost_per_click:      f64,
    /// Percent of paid impressions that click through.
    pub click_through_rate:  f64,
    pub average_order_value: f64,
    pub enabled:             bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSegment {
    pub id:                  SegmentId,
    pub name:                String,
    /// Share of the customer base, 0–100.
    pub percentage:          f64,
    /// Percent of customers lost over the lifetime window.
    pub churn_rate:          f64,
    pub average_order_value: f64,
    /// Purchases per year.
    pub purchase_frequency:  f64,
    pub lifetime_months:     f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSettings {
    pub name:                String,
    /// Planned spend. The metrics engine derives the effective budget
    /// from enabled channels; this figure is only checked against it.
    pub total_budget:        f64,
    pub start_date:          NaiveDate,
    pub end_date:            NaiveDate,
    pub target_audience:     String,
    pub channels:            Vec<MarketingChannel>,
    pub segments:            Vec<CustomerSegment>,
    pub overhead_costs:      f64,
    /// Annual discount rate in percent.
    pub discount_rate:       f64,
    pub seasonality_factors: [f64; MONTHS_PER_YEAR],
}

impl CampaignSettings {
    pub fn enabled_channels(&self) -> impl Iterator<Item = &MarketingChannel> {
        self.channels.iter().filter(|c| c.enabled)
    }

    pub fn channel(&self, id: &str) -> Option<&MarketingChannel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn channel_mut(&mut self, id: &str) -> Option<&mut MarketingChannel> {
        self.channels.iter_mut().find(|c| c.id == id)
    }

    pub fn segment_mut(&mut self, id: &str) -> Option<&mut CustomerSegment> {
        self.segments.iter_mut().find(|s| s.id == id)
    }

    /// Signed length of the campaign window in whole days.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Sum of enabled channel budgets.
    pub fn active_budget(&self) -> f64 {
        self.enabled_channels().map(|c| c.budget).sum()
    }

    pub fn segment_share_total(&self) -> f64 {
        self.segments.iter().map(|s| s.percentage).sum()
    }

    /// The five-channel reference campaign: 16 500 of channel budget
    /// and 2 000 of overhead across calendar year 2025.
    pub fn reference_defaults() -> Self {
        let channel = |id: &str, name: &str, budget, cac, conv, cpc, ctr, aov| MarketingChannel {
            id: id.into(),
            name: name.into(),
            budget,
            cac,
            conversion_rate: conv,
            cost_per_click: cpc,
            click_through_rate: ctr,
            average_order_value: aov,
            enabled: true,
        };
        let segment = |id: &str, name: &str, pct, churn, aov, freq, lifetime| CustomerSegment {
            id: id.into(),
            name: name.into(),
            percentage: pct,
            churn_rate: churn,
            average_order_value: aov,
            purchase_frequency: freq,
            lifetime_months: lifetime,
        };

        Self {
            name: "Reference Campaign".into(),
            total_budget: 16_500.0,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or(NaiveDate::MIN),
            target_audience: "Small and mid-sized businesses".into(),
            channels: vec![
                channel("google_ads", "Google Ads", 5_000.0, 45.0, 3.2, 2.50, 3.5, 120.0),
                channel("facebook_ads", "Facebook Ads", 4_000.0, 35.0, 2.8, 1.80, 2.1, 95.0),
                channel("linkedin_ads", "LinkedIn Ads", 3_000.0, 85.0, 1.9, 5.50, 0.9, 250.0),
                channel("email_marketing", "Email Marketing", 1_500.0, 15.0, 4.5, 0.50, 5.2, 110.0),
                channel("content_marketing", "Content Marketing", 3_000.0, 25.0, 3.8, 1.20, 4.1, 130.0),
            ],
            segments: vec![
                segment("enterprise", "Enterprise", 20.0, 5.0, 500.0, 4.0, 36.0),
                segment("smb", "Small Business", 50.0, 12.0, 150.0, 6.0, 24.0),
                segment("individual", "Individual", 30.0, 25.0, 60.0, 8.0, 12.0),
            ],
            overhead_costs: 2_000.0,
            discount_rate: 10.0,
            seasonality_factors: [
                0.80, 0.85, 0.95, 1.00, 1.05, 1.00, 0.90, 0.95, 1.05, 1.10, 1.25, 1.30,
            ],
        }
    }
}

// ── Typed partial edits ─────────────────────────────────────────────

/// Field-by-field edit of a channel. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelPatch {
    pub name:                Option<String>,
    pub budget:              Option<f64>,
    pub cac:                 Option<f64>,
    pub conversion_rate:     Option<f64>,
    pub cost_per_click:      Option<f64>,
    pub click_through_rate:  Option<f64>,
    pub average_order_value: Option<f64>,
    pub enabled:             Option<bool>,
}

impl ChannelPatch {
    pub fn apply_to(&self, channel: &mut MarketingChannel) {
        if let Some(name) = &self.name {
            channel.name = name.clone();
        }
        set(&mut channel.budget, self.budget);
        set(&mut channel.cac, self.cac);
        set(&mut channel.conversion_rate, self.conversion_rate);
        set(&mut channel.cost_per_click, self.cost_per_click);
        set(&mut channel.click_through_rate, self.click_through_rate);
        set(&mut channel.average_order_value, self.average_order_value);
        set(&mut channel.enabled, self.enabled);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentPatch {
    pub name:                Option<String>,
    pub percentage:          Option<f64>,
    pub churn_rate:          Option<f64>,
    pub average_order_value: Option<f64>,
    pub purchase_frequency:  Option<f64>,
    pub lifetime_months:     Option<f64>,
}

impl SegmentPatch {
    pub fn apply_to(&self, segment: &mut CustomerSegment) {
        if let Some(name) = &self.name {
            segment.name = name.clone();
        }
        set(&mut segment.percentage, self.percentage);
        set(&mut segment.churn_rate, self.churn_rate);
        set(&mut segment.average_order_value, self.average_order_value);
        set(&mut segment.purchase_frequency, self.purchase_frequency);
        set(&mut segment.lifetime_months, self.lifetime_months);
    }
}

/// Edit of the campaign-level fields. Channels and segments have
/// their own patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignPatch {
    pub name:                Option<String>,
    pub total_budget:        Option<f64>,
    pub start_date:          Option<NaiveDate>,
    pub end_date:            Option<NaiveDate>,
    pub target_audience:     Option<String>,
    pub overhead_costs:      Option<f64>,
    pub discount_rate:       Option<f64>,
    pub seasonality_factors: Option<[f64; MONTHS_PER_YEAR]>,
}

impl CampaignPatch {
    pub fn apply_to(&self, settings: &mut CampaignSettings) {
        if let Some(name) = &self.name {
            settings.name = name.clone();
        }
        if let Some(audience) = &self.target_audience {
            settings.target_audience = audience.clone();
        }
        set(&mut settings.total_budget, self.total_budget);
        set(&mut settings.start_date, self.start_date);
        set(&mut settings.end_date, self.end_date);
        set(&mut settings.overhead_costs, self.overhead_costs);
        set(&mut settings.discount_rate, self.discount_rate);
        set(&mut settings.seasonality_factors, self.seasonality_factors);
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}
