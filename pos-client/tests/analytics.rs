mod common;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;
use chrono::Utc;
use common::{Hits, api, fail, ok, spawn_backend};
use pos_client::ResourceStatus;
use pos_client::analytics::{
    AnalyticsView, EarningsPerDay, EarningsSeries, HexbinInput, HistogramInput, Plotter,
    YearToDateEarnings, fetch_earnings_per_day,
};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
struct Backend {
    /// Day whose earnings call fails, `u64::MAX` = none
    failing_day: Arc<AtomicU64>,
    /// Added to every day's earnings
    bump: Arc<AtomicU64>,
    ytd_down: Arc<AtomicBool>,
    ytd_hits: Hits,
    second_batch: Arc<AtomicBool>,
    slow_past_year: Arc<AtomicBool>,
}

fn order(id: u64, created_at: &str, prices: &[f64]) -> Value {
    let products: Vec<Value> = prices
        .iter()
        .map(|p| json!({ "id": 1, "name": "Item", "price": p }))
        .collect();
    json!({ "id": id, "created_at": created_at, "products": products })
}

fn router(backend: Backend) -> Router {
    Router::new()
        .route(
            "/api/orders/earnings/{day}",
            get(|State(b): State<Backend>, Path(day): Path<u64>| async move {
                if b.failing_day.load(Ordering::SeqCst) == day {
                    return fail(Some("Database unavailable"));
                }
                let base = [10.0, 20.0, 25.0, 30.0, 40.0][day as usize];
                ok(base + b.bump.load(Ordering::SeqCst) as f64)
            }),
        )
        .route(
            "/api/orders/earnings",
            get(|State(b): State<Backend>| async move {
                b.ytd_hits.hit();
                if b.ytd_down.load(Ordering::SeqCst) {
                    fail(None)
                } else {
                    ok(1234.5)
                }
            }),
        )
        .route(
            "/api/orders/past_year",
            get(|State(b): State<Backend>| async move {
                if b.slow_past_year.load(Ordering::SeqCst) {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
                if b.second_batch.load(Ordering::SeqCst) {
                    ok(vec![order(5, "2024-01-02T09:30:00Z", &[4.0])])
                } else {
                    ok(vec![
                        order(1, "2024-01-01T01:00:00Z", &[1.0, 2.0]),
                        order(2, "2024-01-01T01:45:00Z", &[3.0]),
                        order(3, "2024-01-01T03:10:00Z", &[8.0]),
                        order(4, "2024-01-01T23:59:00Z", &[]),
                    ])
                }
            }),
        )
        .with_state(backend)
}

async fn setup() -> (Backend, pos_client::PosApi) {
    let backend = Backend::default();
    backend.failing_day.store(u64::MAX, Ordering::SeqCst);
    let base = spawn_backend(router(backend.clone())).await;
    (backend, api(&base))
}

#[tokio::test]
async fn test_earnings_join_tolerates_one_failed_day() {
    let (backend, api) = setup().await;
    backend.failing_day.store(2, Ordering::SeqCst);

    let series = fetch_earnings_per_day(&api, EarningsSeries::default()).await;
    assert_eq!(series.as_array(), &[10.0, 20.0, 0.0, 30.0, 40.0]);
}

#[tokio::test]
async fn test_failed_day_keeps_previous_value() {
    let (backend, api) = setup().await;
    let earnings = EarningsPerDay::new(api);

    let first = earnings.refresh().await;
    assert_eq!(first.as_array(), &[10.0, 20.0, 25.0, 30.0, 40.0]);

    backend.bump.store(100, Ordering::SeqCst);
    backend.failing_day.store(2, Ordering::SeqCst);
    let second = earnings.refresh().await;
    assert_eq!(second.as_array(), &[110.0, 120.0, 25.0, 130.0, 140.0]);
    assert_eq!(earnings.current(), second);
}

#[tokio::test]
async fn test_year_to_date_failure_is_silent() {
    let (backend, api) = setup().await;
    let ytd = YearToDateEarnings::new(api);
    assert_eq!(ytd.current(), 0.0);

    assert_eq!(ytd.refresh().await, 1234.5);

    backend.ytd_down.store(true, Ordering::SeqCst);
    assert_eq!(ytd.refresh().await, 1234.5);
    assert_eq!(ytd.current(), 1234.5);
}

#[tokio::test]
async fn test_year_to_date_refresh_is_bounded_by_interval() {
    let (backend, api) = setup().await;
    let ytd = Arc::new(YearToDateEarnings::new(api));
    let cancel = CancellationToken::new();

    let task = ytd.spawn_refresh(Duration::from_millis(100), cancel.clone());
    tokio::time::sleep(Duration::from_millis(250)).await;
    cancel.cancel();
    task.await.unwrap();

    let hits = backend.ytd_hits.count();
    assert!((2..=4).contains(&hits), "unexpected refresh count {}", hits);
    assert_eq!(ytd.current(), 1234.5);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(backend.ytd_hits.count(), hits, "no refresh after cancel");
}

struct CountingPlotter;

impl Plotter for CountingPlotter {
    type Graph = (usize, u32);

    fn hexbin(&self, input: &HexbinInput) -> Self::Graph {
        (input.points.len(), input.points.iter().filter(|(x, _)| *x == 1.0).count() as u32)
    }

    fn histogram(&self, input: &HistogramInput) -> Self::Graph {
        (input.counts.len(), input.counts.iter().sum())
    }
}

#[tokio::test]
async fn test_analytics_view_follows_store() {
    let (backend, api) = setup().await;
    let store = Arc::new(api.past_year_order_store());
    let view = AnalyticsView::spawn_in(&store, Utc);
    let mut updates = view.subscribe();

    assert_eq!(view.current().hourly.total(), 0);

    store.fetch(()).await;
    loop {
        if updates.borrow_and_update().hourly.total() == 4 {
            break;
        }
        tokio::time::timeout(Duration::from_secs(1), updates.changed())
            .await
            .expect("aggregation should update")
            .unwrap();
    }

    let agg = view.current();
    assert_eq!(agg.hourly.bucket(1), 2);
    assert_eq!(agg.hourly.bucket(3), 1);
    assert_eq!(agg.hourly.bucket(23), 1);
    assert_eq!(agg.earnings_axis, Some((0.0, 8.0)));
    assert_eq!(agg.points[0].total, 3.0);
    assert_eq!(agg.points[0].products_len, 2);

    assert_eq!(view.hex_graph(&CountingPlotter), (4, 2));
    assert_eq!(view.histogram_graph(&CountingPlotter), (24, 4));

    backend.second_batch.store(true, Ordering::SeqCst);
    store.refresh().await;
    loop {
        let agg = updates.borrow_and_update().clone();
        if agg.points.len() == 1 && agg.hourly.bucket(9) == 1 {
            break;
        }
        tokio::time::timeout(Duration::from_secs(1), updates.changed())
            .await
            .expect("aggregation should follow refresh")
            .unwrap();
    }
}

/// Resolves once the view's task has dropped its sender
async fn view_stopped(view: &AnalyticsView) {
    let mut updates = view.subscribe();
    tokio::time::timeout(Duration::from_secs(1), async move {
        while updates.changed().await.is_ok() {}
    })
    .await
    .expect("view task should stop");
}

#[tokio::test]
async fn test_analytics_view_stops_when_store_closes() {
    let (_backend, api) = setup().await;
    let store = Arc::new(api.past_year_order_store());
    let view = AnalyticsView::spawn_in(&store, Utc);

    store.fetch(()).await;
    store.close();
    view_stopped(&view).await;

    let frozen = view.current();
    store.fetch(()).await;
    assert_eq!(store.snapshot().status(), ResourceStatus::Idle);
    assert_eq!(view.current(), frozen);
}

#[tokio::test]
async fn test_analytics_view_stops_when_store_dropped() {
    let (_backend, api) = setup().await;
    let store = Arc::new(api.past_year_order_store());
    let view = AnalyticsView::spawn_in(&store, Utc);

    drop(store);
    view_stopped(&view).await;
}

#[tokio::test]
async fn test_teardown_mid_fetch_settles_idle() {
    let (backend, api) = setup().await;
    backend.slow_past_year.store(true, Ordering::SeqCst);
    let store = Arc::new(api.past_year_order_store());
    let view = AnalyticsView::spawn_in(&store, Utc);

    let pending = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.fetch(()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(store.snapshot().is_loading());

    drop(view);
    store.close();

    let settled = tokio::time::timeout(Duration::from_secs(1), pending)
        .await
        .expect("fetch should settle once the store closes")
        .unwrap();
    assert_eq!(settled.status(), ResourceStatus::Idle);
    assert!(settled.data().is_empty());
}
