//! Shared primitive types used across the projection model.

use crate::error::Indeterminate;

/// Monotonic counter bumped on every accepted settings change.
pub type Revision = u64;

/// Stable identifier of a marketing channel within a campaign.
pub type ChannelId = String;

/// Stable identifier of a customer segment within a campaign.
pub type SegmentId = String;

/// Identifier of a scenario held by the scenario book.
pub type ScenarioId = String;

/// A derived value that may be impossible to compute.
///
/// Every division or time span in the model goes through this type so
/// that "cannot compute" travels as a value and never as NaN, Infinity
/// or an invalid date.
pub type Metric<T> = Result<T, Indeterminate>;
