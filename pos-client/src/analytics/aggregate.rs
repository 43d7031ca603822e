use chrono::{Local, TimeZone, Timelike};
use shared::Order;

pub const HOURS_PER_DAY: usize = 24;

/// One order reduced to what the charts plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedPoint {
    pub order_id: u64,
    /// Hour of creation, 0-23, in the aggregation's time zone
    pub time_of_day: u32,
    pub total: f64,
    pub products_len: usize,
}

impl AggregatedPoint {
    pub fn from_order<Tz: TimeZone>(order: &Order, tz: &Tz) -> Self {
        Self {
            order_id: order.id,
            time_of_day: order.created_at.with_timezone(tz).hour(),
            total: order.total(),
            products_len: order.products_len(),
        }
    }
}

/// Order count per hour of day, empty hours included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HourlyDistribution([u32; HOURS_PER_DAY]);

impl HourlyDistribution {
    pub fn from_points(points: &[AggregatedPoint]) -> Self {
        let mut buckets = [0u32; HOURS_PER_DAY];
        for point in points {
            // hour() is always < 24
            buckets[point.time_of_day as usize % HOURS_PER_DAY] += 1;
        }
        Self(buckets)
    }

    pub fn bucket(&self, hour: usize) -> u32 {
        self.0.get(hour).copied().unwrap_or(0)
    }

    pub fn buckets(&self) -> &[u32; HOURS_PER_DAY] {
        &self.0
    }

    /// Total number of orders counted
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Busiest hour, earliest one on ties; `None` when empty
    pub fn peak_hour(&self) -> Option<usize> {
        let max = *self.0.iter().max()?;
        (max > 0).then(|| self.0.iter().position(|&c| c == max)).flatten()
    }
}

/// Everything the charts need, recomputed from scratch on every change
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    pub points: Vec<AggregatedPoint>,
    pub hourly: HourlyDistribution,
    /// `(min, max)` of per-order totals, the y-domain of the charts
    pub earnings_axis: Option<(f64, f64)>,
}

/// Aggregate in the machine's local time zone
pub fn aggregate(orders: &[Order]) -> Aggregation {
    aggregate_in(orders, &Local)
}

pub fn aggregate_in<Tz: TimeZone>(orders: &[Order], tz: &Tz) -> Aggregation {
    let points: Vec<AggregatedPoint> = orders
        .iter()
        .map(|o| AggregatedPoint::from_order(o, tz))
        .collect();
    let hourly = HourlyDistribution::from_points(&points);
    let earnings_axis = points.iter().map(|p| p.total).fold(None, |axis, total| {
        Some(match axis {
            None => (total, total),
            Some((lo, hi)) => (f64::min(lo, total), f64::max(hi, total)),
        })
    });

    Aggregation {
        points,
        hourly,
        earnings_axis,
    }
}
