//! Mutation Dispatchers
//!
//! Each mutation issues exactly one request. On success the owning store is
//! re-fetched in full (read-after-write by re-query, never by local patch);
//! on failure the error goes back to the caller and the store is untouched.

use std::sync::Arc;

use shared::{Station, StationCreate, UserCreate};
use validator::Validate;

use crate::http::{HttpClient, NetworkHttpClient};
use crate::store::{Fetcher, OrderStore, ProductStore, ResourceStore, StationStore, UserStore};
use crate::{ClientResult, PosApi};

/// Refresh `store` if the mutation went through
async fn refresh_on_success<F: Fetcher, T>(
    store: &ResourceStore<F>,
    action: &'static str,
    result: ClientResult<T>,
) -> ClientResult<T> {
    match result {
        Ok(value) => {
            tracing::info!(action, "mutation accepted, refreshing collection");
            store.refresh().await;
            Ok(value)
        }
        Err(e) => {
            tracing::warn!(action, error = %e, "mutation rejected");
            Err(e)
        }
    }
}

// ============================================================================
// Stations
// ============================================================================

/// Station create/delete and station <-> product membership
pub struct StationMutations<H: HttpClient + 'static = NetworkHttpClient> {
    api: PosApi<H>,
    stations: Arc<StationStore<H>>,
}

impl<H: HttpClient + 'static> StationMutations<H> {
    pub fn new(api: PosApi<H>, stations: Arc<StationStore<H>>) -> Self {
        Self { api, stations }
    }

    pub fn store(&self) -> &Arc<StationStore<H>> {
        &self.stations
    }

    pub async fn create_station(&self, name: &str) -> ClientResult<Option<Station>> {
        let payload = StationCreate::new(name);
        payload.validate()?;
        let result = self.api.create_station(&payload).await;
        refresh_on_success(&*self.stations, "create_station", result).await
    }

    pub async fn delete_station(&self, station_id: u64) -> ClientResult<()> {
        let result = self.api.delete_station(station_id).await;
        refresh_on_success(&*self.stations, "delete_station", result).await
    }

    pub async fn add_product_to_station(&self, station_id: u64, product_id: u64) -> ClientResult<()> {
        let result = self.api.add_product_to_station(station_id, product_id).await;
        refresh_on_success(&*self.stations, "add_product_to_station", result).await
    }

    pub async fn remove_product_from_station(
        &self,
        station_id: u64,
        product_id: u64,
    ) -> ClientResult<()> {
        let result = self
            .api
            .remove_product_from_station(station_id, product_id)
            .await;
        refresh_on_success(&*self.stations, "remove_product_from_station", result).await
    }
}

// ============================================================================
// Users
// ============================================================================

pub struct UserMutations<H: HttpClient + 'static = NetworkHttpClient> {
    api: PosApi<H>,
    users: Arc<UserStore<H>>,
}

impl<H: HttpClient + 'static> UserMutations<H> {
    pub fn new(api: PosApi<H>, users: Arc<UserStore<H>>) -> Self {
        Self { api, users }
    }

    pub fn store(&self) -> &Arc<UserStore<H>> {
        &self.users
    }

    /// Create a user; `station_id = None` creates a sales (till) user
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        station_id: Option<u64>,
    ) -> ClientResult<()> {
        let payload = UserCreate::new(username, password, station_id);
        payload.validate()?;
        let result = self.api.create_user(&payload).await;
        refresh_on_success(&*self.users, "create_user", result).await
    }

    pub async fn delete_user(&self, user_id: u64) -> ClientResult<()> {
        let result = self.api.delete_user(user_id).await;
        refresh_on_success(&*self.users, "delete_user", result).await
    }
}

// ============================================================================
// Orders / Products
// ============================================================================

pub struct OrderMutations<H: HttpClient + 'static = NetworkHttpClient> {
    api: PosApi<H>,
    orders: Arc<OrderStore<H>>,
}

impl<H: HttpClient + 'static> OrderMutations<H> {
    pub fn new(api: PosApi<H>, orders: Arc<OrderStore<H>>) -> Self {
        Self { api, orders }
    }

    pub fn store(&self) -> &Arc<OrderStore<H>> {
        &self.orders
    }

    /// Cancel an order, or restore a cancelled one.
    ///
    /// The order store is re-queried in the mode it is showing: the current
    /// page in list mode, the same order in lookup mode.
    pub async fn toggle_cancelled(&self, order_id: u64) -> ClientResult<()> {
        let result = self.api.toggle_order_cancelled(order_id).await;
        refresh_on_success(&*self.orders, "toggle_order_cancelled", result).await
    }
}

pub struct ProductMutations<H: HttpClient + 'static = NetworkHttpClient> {
    api: PosApi<H>,
    products: Arc<ProductStore<H>>,
}

impl<H: HttpClient + 'static> ProductMutations<H> {
    pub fn new(api: PosApi<H>, products: Arc<ProductStore<H>>) -> Self {
        Self { api, products }
    }

    pub fn store(&self) -> &Arc<ProductStore<H>> {
        &self.products
    }

    pub async fn toggle_discontinued(&self, product_id: u64) -> ClientResult<()> {
        let result = self.api.toggle_product_discontinued(product_id).await;
        refresh_on_success(&*self.products, "toggle_product_discontinued", result).await
    }
}
