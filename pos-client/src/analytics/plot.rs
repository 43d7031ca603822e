//! Inputs for the plotting collaborator
//!
//! Rendering lives outside this crate; a [`Plotter`] turns aggregated data
//! into whatever graph object the UI draws.

use super::aggregate::{Aggregation, HOURS_PER_DAY};

/// Hexagonal binning of orders: x = hour of day, y = order total,
/// fill = number of orders per bin
#[derive(Debug, Clone, PartialEq)]
pub struct HexbinInput {
    pub points: Vec<(f64, f64)>,
    pub y_domain: Option<(f64, f64)>,
}

/// Order count per hour of day
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramInput {
    pub counts: [u32; HOURS_PER_DAY],
    pub y_label: &'static str,
}

impl From<&Aggregation> for HexbinInput {
    fn from(agg: &Aggregation) -> Self {
        Self {
            points: agg
                .points
                .iter()
                .map(|p| (f64::from(p.time_of_day), p.total))
                .collect(),
            y_domain: agg.earnings_axis,
        }
    }
}

impl From<&Aggregation> for HistogramInput {
    fn from(agg: &Aggregation) -> Self {
        Self {
            counts: *agg.hourly.buckets(),
            y_label: "Amount of orders",
        }
    }
}

/// Pure function from aggregated data to a drawable graph
pub trait Plotter {
    type Graph;

    fn hexbin(&self, input: &HexbinInput) -> Self::Graph;

    fn histogram(&self, input: &HistogramInput) -> Self::Graph;
}
