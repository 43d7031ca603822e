use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::PosApi;
use crate::http::{HttpClient, NetworkHttpClient};

/// Number of days in the earnings chart (today and the four days before)
pub const EARNINGS_DAYS: usize = 5;

/// Earnings per day, index = days ago (0 = today)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EarningsSeries([f64; EARNINGS_DAYS]);

impl EarningsSeries {
    pub fn new(values: [f64; EARNINGS_DAYS]) -> Self {
        Self(values)
    }

    pub fn get(&self, days_ago: usize) -> Option<f64> {
        self.0.get(days_ago).copied()
    }

    /// Out-of-range days are ignored
    pub fn set(&mut self, days_ago: usize, amount: f64) {
        if let Some(slot) = self.0.get_mut(days_ago) {
            *slot = amount;
        }
    }

    pub fn as_array(&self) -> &[f64; EARNINGS_DAYS] {
        &self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// Fan out one request per day and join the results into `previous`.
///
/// Each day fails on its own: a failed slot keeps its previous value and the
/// batch as a whole always succeeds.
pub async fn fetch_earnings_per_day<H: HttpClient>(
    api: &PosApi<H>,
    previous: EarningsSeries,
) -> EarningsSeries {
    let calls = (0..EARNINGS_DAYS).map(|day| async move {
        // EARNINGS_DAYS fits in u8
        (day, api.earnings_for_day(day as u8).await)
    });

    let mut series = previous;
    for (day, result) in join_all(calls).await {
        match result {
            Ok(amount) => series.set(day, amount),
            Err(e) => {
                tracing::warn!(day, error = %e, "earnings slot kept its previous value");
            }
        }
    }
    series
}

/// Earnings-per-day series with observable state
pub struct EarningsPerDay<H: HttpClient = NetworkHttpClient> {
    api: PosApi<H>,
    series: watch::Sender<EarningsSeries>,
}

impl<H: HttpClient> EarningsPerDay<H> {
    pub fn new(api: PosApi<H>) -> Self {
        let (series, _) = watch::channel(EarningsSeries::default());
        Self { api, series }
    }

    pub fn current(&self) -> EarningsSeries {
        *self.series.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<EarningsSeries> {
        self.series.subscribe()
    }

    pub async fn refresh(&self) -> EarningsSeries {
        let next = fetch_earnings_per_day(&self.api, self.current()).await;
        self.series.send_replace(next);
        next
    }
}

/// Year-to-date earnings.
///
/// Failures are logged and otherwise silent: the previous figure stays on
/// screen. Refreshes happen only when asked for, either directly or through
/// the interval task from [`YearToDateEarnings::spawn_refresh`].
pub struct YearToDateEarnings<H: HttpClient = NetworkHttpClient> {
    api: PosApi<H>,
    value: watch::Sender<f64>,
}

impl<H: HttpClient + 'static> YearToDateEarnings<H> {
    pub fn new(api: PosApi<H>) -> Self {
        let (value, _) = watch::channel(0.0);
        Self { api, value }
    }

    pub fn current(&self) -> f64 {
        *self.value.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.value.subscribe()
    }

    /// Fetch once; overwrite on success, keep the old value on failure
    pub async fn refresh(&self) -> f64 {
        match self.api.total_earnings().await {
            Ok(total) => {
                self.value.send_replace(total);
                total
            }
            Err(e) => {
                tracing::warn!(error = %e, "year-to-date earnings refresh failed");
                self.current()
            }
        }
    }

    /// Refresh immediately, then every `interval`, until `cancel` fires
    pub fn spawn_refresh(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        this.refresh().await;
                    }
                }
            }
            tracing::debug!("year-to-date earnings refresh stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_defaults_to_zero() {
        let series = EarningsSeries::default();
        assert_eq!(series.as_array(), &[0.0; EARNINGS_DAYS]);
        assert_eq!(series.sum(), 0.0);
    }

    #[test]
    fn test_series_set_ignores_out_of_range() {
        let mut series = EarningsSeries::default();
        series.set(4, 12.0);
        series.set(5, 99.0);
        assert_eq!(series.get(4), Some(12.0));
        assert_eq!(series.get(5), None);
        assert_eq!(series.sum(), 12.0);
    }
}
