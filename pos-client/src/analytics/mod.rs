//! Analytics Aggregator
//!
//! Derived series computed from the past-year order collection, plus the
//! earnings figures fetched straight from the backend.

mod aggregate;
mod earnings;
mod plot;
mod view;

pub use aggregate::{
    AggregatedPoint, Aggregation, HOURS_PER_DAY, HourlyDistribution, aggregate, aggregate_in,
};
pub use earnings::{
    EARNINGS_DAYS, EarningsPerDay, EarningsSeries, YearToDateEarnings, fetch_earnings_per_day,
};
pub use plot::{HexbinInput, HistogramInput, Plotter};
pub use view::AnalyticsView;
