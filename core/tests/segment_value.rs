//! Segment lifetime value.

use projection_core::{campaign::CustomerSegment, segment};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_segment(churn_rate: f64) -> CustomerSegment {
    CustomerSegment {
        id: "seg".into(),
        name: "Segment".into(),
        percentage: 100.0,
        churn_rate,
        average_order_value: 200.0,
        purchase_frequency: 6.0,
        lifetime_months: 24.0,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// 200 × 6 × (24 / 12) × 0.95 = 2280.
#[test]
fn lifetime_value_matches_formula() {
    let value = segment::lifetime_value(&make_segment(5.0));
    assert!(approx(value, 2_280.0), "Expected CLTV 2280; got {value}");
}

/// Zero churn keeps the full gross value.
#[test]
fn zero_churn_keeps_everything() {
    let value = segment::lifetime_value(&make_segment(0.0));
    assert!(approx(value, 2_400.0), "Expected CLTV 2400; got {value}");
}

/// Churn above 100 is clamped so the value never goes negative.
#[test]
fn churn_above_hundred_never_goes_negative() {
    let value = segment::lifetime_value(&make_segment(150.0));
    assert_eq!(value, 0.0, "Expected CLTV 0 at churn > 100; got {value}");
    assert_eq!(segment::retention_factor(-10.0), 1.0);
}

/// Shifting churn by a delta equals evaluating at the shifted rate.
#[test]
fn churn_shift_matches_direct_evaluation() {
    let shifted = segment::lifetime_value_with_churn_shift(&make_segment(5.0), 10.0);
    let direct = segment::lifetime_value(&make_segment(15.0));
    assert!(approx(shifted, direct), "shifted {shifted} != direct {direct}");
}

/// Value is linear in order value: doubling it doubles CLTV.
#[test]
fn doubling_order_value_doubles_lifetime_value() {
    let base = segment::lifetime_value(&make_segment(5.0));
    let doubled = segment::lifetime_value(&CustomerSegment {
        average_order_value: 400.0,
        ..make_segment(5.0)
    });
    assert!(approx(doubled, 2.0 * base), "Expected {}; got {doubled}", 2.0 * base);
}

/// Value is linear in purchase frequency: doubling it doubles CLTV.
#[test]
fn doubling_purchase_frequency_doubles_lifetime_value() {
    let base = segment::lifetime_value(&make_segment(5.0));
    let doubled = segment::lifetime_value(&CustomerSegment {
        purchase_frequency: 12.0,
        ..make_segment(5.0)
    });
    assert!(approx(doubled, 2.0 * base), "Expected {}; got {doubled}", 2.0 * base);
}
