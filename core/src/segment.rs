//! Segment lifetime value.
//!
//! cltv = average_order_value × purchase_frequency
//!        × (lifetime_months / 12) × (1 − churn_rate / 100)

use crate::campaign::CustomerSegment;

/// Fraction of customers retained. Churn is clamped to [0, 100] so a
/// bad rate can never flip the sign of a lifetime value.
pub fn retention_factor(churn_rate: f64) -> f64 {
    1.0 - churn_rate.clamp(0.0, 100.0) / 100.0
}

pub fn lifetime_value(segment: &CustomerSegment) -> f64 {
    segment.average_order_value
        * segment.purchase_frequency
        * (segment.lifetime_months / 12.0)
        * retention_factor(segment.churn_rate)
}

/// Lifetime value with the segment's churn shifted by `churn_delta`
/// percentage points.
pub fn lifetime_value_with_churn_shift(segment: &CustomerSegment, churn_delta: f64) -> f64 {
    segment.average_order_value
        * segment.purchase_frequency
        * (segment.lifetime_months / 12.0)
        * retention_factor(segment.churn_rate + churn_delta)
}
