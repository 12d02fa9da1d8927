//! Seasonal month-by-month timeline.

use projection_core::{
    campaign::CampaignSettings,
    error::Indeterminate,
    metrics,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

/// A calendar year projects to twelve months starting on the 1st.
#[test]
fn reference_year_has_twelve_months() {
    let settings = CampaignSettings::reference_defaults();
    let projection = metrics::project(&settings);
    let months = &projection.timeline.months;

    assert_eq!(months.len(), 12, "Expected 12 months; got {}", months.len());
    assert_eq!(months[0].month_start, settings.start_date);
    for (i, m) in months.iter().enumerate() {
        assert_eq!(m.index as usize, i);
        assert_eq!(m.seasonality, settings.seasonality_factors[i]);
    }
}

/// Monthly revenue and spend add back up to the campaign totals, and
/// overhead is charged once, up front.
#[test]
fn months_sum_to_totals() {
    let settings = CampaignSettings::reference_defaults();
    let projection = metrics::project(&settings);
    let months = &projection.timeline.months;

    let revenue: f64 = months.iter().map(|m| m.revenue).sum();
    let spend: f64 = months.iter().map(|m| m.spend).sum();
    let overhead: f64 = months.iter().map(|m| m.overhead).sum();

    assert!(approx(revenue, projection.metrics.total_revenue.unwrap()), "revenue {revenue}");
    assert!(approx(spend, 16_500.0), "spend {spend}");
    assert_eq!(overhead, 2_000.0);
    assert_eq!(months[0].overhead, 2_000.0);

    let last = months.last().unwrap();
    assert!(approx(last.cumulative_profit, projection.metrics.total_profit.unwrap()));
}

/// Revenue follows the seasonality factors: December out-earns January.
#[test]
fn revenue_tracks_seasonality() {
    let projection = metrics::project(&CampaignSettings::reference_defaults());
    let months = &projection.timeline.months;
    assert!(months[11].revenue > months[0].revenue);
    assert!(approx(months[11].revenue / months[0].revenue, 1.30 / 0.80));
}

/// All-zero seasonality falls back to an even split.
#[test]
fn zero_seasonality_spreads_evenly() {
    let mut settings = CampaignSettings::reference_defaults();
    settings.seasonality_factors = [0.0; 12];
    let projection = metrics::project(&settings);
    let months = &projection.timeline.months;

    let first = months[0].revenue;
    for m in months {
        assert!(approx(m.revenue, first), "month {} revenue {}", m.index, m.revenue);
    }
}

/// The profitability date is the end of the first month with
/// non-negative cumulative profit.
#[test]
fn profitability_date_is_first_cumulative_break_even() {
    let settings = CampaignSettings::reference_defaults();
    let projection = metrics::project(&settings);
    let timeline = &projection.timeline;

    let first = timeline
        .months
        .iter()
        .position(|m| m.cumulative_profit >= 0.0)
        .expect("reference campaign turns a profit");
    assert!(timeline.months[..first].iter().all(|m| m.cumulative_profit < 0.0));

    let date = timeline.profitability_date.unwrap();
    assert_eq!(Ok(date), projection.metrics.profitability_date);
    assert!(date > timeline.months[first].month_start);
    assert!(date <= settings.end_date);
}

/// The solved cash-flow IRR exists for a campaign that starts in the red
/// and ends in the black.
#[test]
fn cash_flow_irr_is_solved() {
    let projection = metrics::project(&CampaignSettings::reference_defaults());
    let irr = projection.timeline.cash_flow_irr.unwrap();
    assert!(irr > 0.0, "Expected positive annualised IRR; got {irr}");
}

/// A campaign running past 2040 still solves: the lower rate bracket
/// is raised until the discounted flows stay finite.
#[test]
fn cash_flow_irr_is_solved_for_long_campaign() {
    let mut settings = CampaignSettings::reference_defaults();
    settings.end_date = chrono::NaiveDate::from_ymd_opt(2040, 12, 31).unwrap();
    let projection = metrics::project(&settings);
    let timeline = &projection.timeline;

    assert!(timeline.months.len() > 160, "Expected a long timeline; got {}", timeline.months.len());
    assert!(timeline.months.iter().any(|m| m.profit < 0.0));
    assert!(timeline.months.iter().any(|m| m.profit > 0.0));
    let irr = timeline.cash_flow_irr.unwrap();
    assert!(irr.is_finite() && irr > 0.0, "Expected positive annualised IRR; got {irr}");
}

/// Without revenue there is no timeline.
#[test]
fn indeterminate_revenue_gives_empty_timeline() {
    let mut settings = CampaignSettings::reference_defaults();
    settings.segments.clear();
    let projection = metrics::project(&settings);

    assert!(projection.timeline.months.is_empty());
    assert_eq!(projection.timeline.profitability_date, Err(Indeterminate::NoSegments));
}
