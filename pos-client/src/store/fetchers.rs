//! Fetchers for the backend collections

use async_trait::async_trait;
use shared::{Order, Product, RichOrder, Station, User};

use super::{Fetcher, ResourceStore};
use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientResult, PosApi};

/// Addressing mode for the order list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderQuery {
    /// Paged list
    Page(u32),
    /// Single order by id, yields zero or one element
    Lookup(u64),
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self::Page(1)
    }
}

/// Paged order list / single order lookup
pub struct OrdersFetcher<H: HttpClient = NetworkHttpClient> {
    api: PosApi<H>,
}

impl<H: HttpClient> OrdersFetcher<H> {
    pub fn new(api: PosApi<H>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<H: HttpClient + 'static> Fetcher for OrdersFetcher<H> {
    type Item = RichOrder;
    type Query = OrderQuery;
    const FALLBACK_MESSAGE: &'static str = "Unable to fetch orders";

    async fn load(&self, query: &OrderQuery) -> ClientResult<Vec<RichOrder>> {
        match *query {
            OrderQuery::Page(page) => self.api.orders_page(page).await,
            OrderQuery::Lookup(id) => Ok(vec![self.api.order(id).await?]),
        }
    }
}

/// Every order of the past year, input to the analytics
pub struct PastYearOrdersFetcher<H: HttpClient = NetworkHttpClient> {
    api: PosApi<H>,
}

impl<H: HttpClient> PastYearOrdersFetcher<H> {
    pub fn new(api: PosApi<H>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<H: HttpClient + 'static> Fetcher for PastYearOrdersFetcher<H> {
    type Item = Order;
    type Query = ();
    const FALLBACK_MESSAGE: &'static str = "Unable to fetch orders";

    async fn load(&self, _query: &()) -> ClientResult<Vec<Order>> {
        self.api.orders_past_year().await
    }
}

pub struct ProductsFetcher<H: HttpClient = NetworkHttpClient> {
    api: PosApi<H>,
}

impl<H: HttpClient> ProductsFetcher<H> {
    pub fn new(api: PosApi<H>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<H: HttpClient + 'static> Fetcher for ProductsFetcher<H> {
    type Item = Product;
    type Query = ();
    const FALLBACK_MESSAGE: &'static str = "Unable to fetch products";

    async fn load(&self, _query: &()) -> ClientResult<Vec<Product>> {
        self.api.products().await
    }
}

pub struct StationsFetcher<H: HttpClient = NetworkHttpClient> {
    api: PosApi<H>,
}

impl<H: HttpClient> StationsFetcher<H> {
    pub fn new(api: PosApi<H>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<H: HttpClient + 'static> Fetcher for StationsFetcher<H> {
    type Item = Station;
    type Query = ();
    const FALLBACK_MESSAGE: &'static str = "Unable to fetch stations";

    async fn load(&self, _query: &()) -> ClientResult<Vec<Station>> {
        self.api.stations().await
    }
}

pub struct UsersFetcher<H: HttpClient = NetworkHttpClient> {
    api: PosApi<H>,
}

impl<H: HttpClient> UsersFetcher<H> {
    pub fn new(api: PosApi<H>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<H: HttpClient + 'static> Fetcher for UsersFetcher<H> {
    type Item = User;
    type Query = ();
    const FALLBACK_MESSAGE: &'static str = "Unable to fetch users";

    async fn load(&self, _query: &()) -> ClientResult<Vec<User>> {
        self.api.users().await
    }
}

// ============================================================================
// Store aliases
// ============================================================================

pub type OrderStore<H = NetworkHttpClient> = ResourceStore<OrdersFetcher<H>>;
pub type PastYearOrderStore<H = NetworkHttpClient> = ResourceStore<PastYearOrdersFetcher<H>>;
pub type ProductStore<H = NetworkHttpClient> = ResourceStore<ProductsFetcher<H>>;
pub type StationStore<H = NetworkHttpClient> = ResourceStore<StationsFetcher<H>>;
pub type UserStore<H = NetworkHttpClient> = ResourceStore<UsersFetcher<H>>;

impl<H: HttpClient + 'static> ResourceStore<OrdersFetcher<H>> {
    /// List mode
    pub async fn fetch_page(&self, page: u32) -> super::Resource<RichOrder> {
        self.fetch(OrderQuery::Page(page)).await
    }

    /// Lookup mode; a missing or id-less order ends in `Error`
    pub async fn lookup(&self, order_id: u64) -> super::Resource<RichOrder> {
        self.fetch(OrderQuery::Lookup(order_id)).await
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl<H: HttpClient + 'static> PosApi<H> {
    pub fn order_store(&self) -> OrderStore<H> {
        ResourceStore::new(OrdersFetcher::new(self.clone()))
    }

    pub fn past_year_order_store(&self) -> PastYearOrderStore<H> {
        ResourceStore::new(PastYearOrdersFetcher::new(self.clone()))
    }

    pub fn product_store(&self) -> ProductStore<H> {
        ResourceStore::new(ProductsFetcher::new(self.clone()))
    }

    pub fn station_store(&self) -> StationStore<H> {
        ResourceStore::new(StationsFetcher::new(self.clone()))
    }

    pub fn user_store(&self) -> UserStore<H> {
        ResourceStore::new(UsersFetcher::new(self.clone()))
    }
}
