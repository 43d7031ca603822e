use std::sync::Arc;

use chrono::{Local, TimeZone};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::aggregate::{Aggregation, aggregate_in};
use super::plot::{HexbinInput, HistogramInput, Plotter};
use crate::http::HttpClient;
use crate::store::PastYearOrderStore;

/// Aggregation kept in sync with a past-year order store.
///
/// A background task recomputes the whole aggregation each time the store's
/// state changes; it stops when the store is closed or dropped, or when the
/// view itself is dropped.
pub struct AnalyticsView {
    aggregation: watch::Receiver<Aggregation>,
    task: JoinHandle<()>,
}

impl AnalyticsView {
    /// Follow `store`, bucketing hours in local time
    pub fn spawn<H: HttpClient + 'static>(store: &Arc<PastYearOrderStore<H>>) -> Self {
        Self::spawn_in(store, Local)
    }

    pub fn spawn_in<H, Tz>(store: &Arc<PastYearOrderStore<H>>, tz: Tz) -> Self
    where
        H: HttpClient + 'static,
        Tz: TimeZone + Send + Sync + 'static,
        Tz::Offset: Send + Sync,
    {
        let mut orders = store.subscribe();
        let initial = aggregate_in(orders.borrow_and_update().data(), &tz);
        let (tx, aggregation) = watch::channel(initial);
        let lifetime = store.lifetime();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = lifetime.cancelled() => break,
                    changed = orders.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let next = aggregate_in(orders.borrow_and_update().data(), &tz);
                        tx.send_replace(next);
                    }
                }
            }
            tracing::debug!("analytics view stopped");
        });

        Self { aggregation, task }
    }

    /// Latest aggregation
    pub fn current(&self) -> Aggregation {
        self.aggregation.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Aggregation> {
        self.aggregation.clone()
    }

    /// Orders binned by hour and total
    pub fn hex_graph<P: Plotter>(&self, plotter: &P) -> P::Graph {
        plotter.hexbin(&HexbinInput::from(&*self.aggregation.borrow()))
    }

    /// Order count per hour
    pub fn histogram_graph<P: Plotter>(&self, plotter: &P) -> P::Graph {
        plotter.histogram(&HistogramInput::from(&*self.aggregation.borrow()))
    }
}

impl Drop for AnalyticsView {
    fn drop(&mut self) {
        self.task.abort();
    }
}
