// pos-client/tests/common/mod.rs
// Mock backend helpers shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Json, Router};
use pos_client::{ClientConfig, PosApi};
use serde::Serialize;
use serde_json::{Value, json};

/// Serve `router` on an ephemeral port, returns its base URL
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn api(base_url: &str) -> PosApi {
    init_tracing();
    ClientConfig::new(base_url)
        .with_timeout(5)
        .build_api()
        .unwrap()
}

/// Base URL where nothing is listening
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn ok<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data, "error": null }))
}

pub fn ok_empty() -> Json<Value> {
    Json(json!({ "success": true, "data": null, "error": null }))
}

pub fn fail(message: Option<&str>) -> Json<Value> {
    Json(json!({ "success": false, "data": null, "error": message }))
}

/// Request counter shared between a handler and the test body
#[derive(Debug, Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("pos_client=debug")
        .with_test_writer()
        .try_init();
}

pub fn rich_order(id: u64, names: &[&str]) -> Value {
    let products: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": i + 1, "name": name, "price": 2.5, "fulfilled": 0 }))
        .collect();
    json!({
        "order": { "id": id, "created_at": "2024-06-01T12:00:00Z", "cancelled": 0 },
        "products": products,
    })
}
