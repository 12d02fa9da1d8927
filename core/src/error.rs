use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("Invalid configuration: {}", describe_issues(.issues))]
    InvalidConfiguration { issues: Vec<ConfigIssue> },

    #[error("Channel '{id}' not found")]
    ChannelNotFound { id: String },

    #[error("Segment '{id}' not found")]
    SegmentNotFound { id: String },

    #[error("Scenario '{id}' not found")]
    ScenarioNotFound { id: String },

    #[error("Scenario '{id}' is the last one and cannot be deleted")]
    LastScenario { id: String },

    #[error("Unsupported record format version: expected {expected}, got {actual}")]
    RecordVersion { expected: u32, actual: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ProjectionResult<T> = Result<T, ProjectionError>;

fn describe_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single reason a campaign configuration was rejected.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ConfigIssue {
    #[error("end date {end} is not after start date {start}")]
    DateRange { start: NaiveDate, end: NaiveDate },

    #[error("channel '{channel_id}': CAC must be greater than zero (got {value})")]
    NonPositiveCac { channel_id: String, value: f64 },

    #[error("{owner}: {field} must not be negative (got {value})")]
    NegativeValue {
        owner: String,
        field: String,
        value: f64,
    },

    #[error("{owner}: {field} must be a percentage in [0, 100] (got {value})")]
    RateOutOfRange {
        owner: String,
        field: String,
        value: f64,
    },

    #[error("{owner}: {field} is not a finite number")]
    NonFinite { owner: String, field: String },

    #[error("segment percentages total {total:.2}, expected 100")]
    SegmentShareTotal { total: f64 },

    #[error("{kind} id must not be empty")]
    EmptyId { kind: String },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: String, id: String },

    #[error("seasonality factor for month {month} must not be negative (got {value})")]
    NegativeSeasonality { month: usize, value: f64 },
}

/// Why a derived metric cannot be computed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indeterminate {
    #[error("channel CAC is zero")]
    ZeroCac,

    #[error("no enabled channel carries budget")]
    NoActiveSpend,

    #[error("campaign has no customer segments")]
    NoSegments,

    #[error("total cost is zero")]
    ZeroTotalCost,

    #[error("total revenue is zero")]
    ZeroRevenue,

    #[error("campaign duration is not positive")]
    NonPositiveDuration,

    #[error("daily profit is not positive, break-even is never reached")]
    NeverBreaksEven,

    #[error("date falls outside the supported calendar")]
    BeyondCalendar,

    #[error("customer lifetime value is zero")]
    ZeroLifetimeValue,

    #[error("base value is zero")]
    ZeroBase,

    #[error("cash flows never change sign")]
    NoSignChange,
}
