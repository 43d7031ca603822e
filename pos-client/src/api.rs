//! Typed backend endpoints
//!
//! One method per endpoint. Payload shape checks (absent data, missing ids)
//! happen here so callers only ever see a `ClientResult`.

use std::sync::Arc;

use serde::de::IgnoredAny;
use shared::{Order, Product, RichOrder, SessionUser, Station, StationCreate, User, UserCreate};

use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientError, ClientResult};

/// Typed client for the POS backend
pub struct PosApi<H: HttpClient = NetworkHttpClient> {
    http: Arc<H>,
}

impl<H: HttpClient> Clone for PosApi<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl<H: HttpClient> PosApi<H> {
    pub fn new(http: H) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    /// Underlying transport
    pub fn http(&self) -> &H {
        &self.http
    }

    // ========== Orders ==========

    /// One page of the order list
    pub async fn orders_page(&self, page: u32) -> ClientResult<Vec<RichOrder>> {
        let orders = self
            .http
            .get::<Vec<RichOrder>>(&format!("/api/orders?p={}", page))
            .await?;
        Ok(orders.unwrap_or_default())
    }

    /// Single order lookup.
    ///
    /// The backend answers unknown ids with `success=true` and an empty
    /// order object, so a missing id is treated as a failed lookup.
    pub async fn order(&self, order_id: u64) -> ClientResult<RichOrder> {
        let order = self
            .http
            .get::<RichOrder>(&format!("/api/order/{}", order_id))
            .await?
            .ok_or_else(|| ClientError::MissingData(format!("order {}", order_id)))?;
        if order.id().is_none() {
            return Err(ClientError::MissingData(format!("order {} has no id", order_id)));
        }
        Ok(order)
    }

    /// Every order created in the past year, for analytics
    pub async fn orders_past_year(&self) -> ClientResult<Vec<Order>> {
        let orders = self.http.get::<Vec<Order>>("/api/orders/past_year").await?;
        Ok(orders.unwrap_or_default())
    }

    /// Year-to-date earnings
    pub async fn total_earnings(&self) -> ClientResult<f64> {
        self.http
            .get::<f64>("/api/orders/earnings")
            .await?
            .ok_or_else(|| ClientError::MissingData("total earnings".into()))
    }

    /// Earnings for a single day, `days_ago = 0` being today
    pub async fn earnings_for_day(&self, days_ago: u8) -> ClientResult<f64> {
        self.http
            .get::<f64>(&format!("/api/orders/earnings/{}", days_ago))
            .await?
            .ok_or_else(|| ClientError::MissingData(format!("earnings for day {}", days_ago)))
    }

    /// Mark one order line fulfilled or not
    pub async fn set_fulfilled(
        &self,
        order_id: u64,
        product_id: u64,
        fulfilled: bool,
    ) -> ClientResult<()> {
        let path = format!(
            "/api/order/{}/product/{}/{}",
            order_id,
            product_id,
            u8::from(fulfilled)
        );
        self.http.put_empty::<IgnoredAny>(&path).await?;
        Ok(())
    }

    /// Flip the cancelled flag of an order
    pub async fn toggle_order_cancelled(&self, order_id: u64) -> ClientResult<()> {
        self.http
            .delete::<IgnoredAny>(&format!("/api/order/{}", order_id))
            .await?;
        Ok(())
    }

    // ========== Products ==========

    /// Full product list, discontinued products included
    pub async fn products(&self) -> ClientResult<Vec<Product>> {
        let products = self.http.get::<Vec<Product>>("/api/products?all=1").await?;
        Ok(products.unwrap_or_default())
    }

    /// Flip the discontinued flag of a product
    pub async fn toggle_product_discontinued(&self, product_id: u64) -> ClientResult<()> {
        self.http
            .delete::<IgnoredAny>(&format!("/api/product/{}", product_id))
            .await?;
        Ok(())
    }

    // ========== Stations ==========

    pub async fn stations(&self) -> ClientResult<Vec<Station>> {
        let stations = self.http.get::<Vec<Station>>("/api/stations").await?;
        Ok(stations.unwrap_or_default())
    }

    pub async fn station(&self, station_id: u64) -> ClientResult<Station> {
        self.http
            .get::<Station>(&format!("/api/station/{}", station_id))
            .await?
            .ok_or_else(|| ClientError::MissingData(format!("station {}", station_id)))
    }

    /// Create a station; the backend may or may not echo it back
    pub async fn create_station(&self, payload: &StationCreate) -> ClientResult<Option<Station>> {
        self.http
            .post_form::<Station>("/api/station", payload.form_fields())
            .await
    }

    pub async fn delete_station(&self, station_id: u64) -> ClientResult<()> {
        self.http
            .delete::<IgnoredAny>(&format!("/api/station/{}", station_id))
            .await?;
        Ok(())
    }

    pub async fn add_product_to_station(&self, station_id: u64, product_id: u64) -> ClientResult<()> {
        self.http
            .post_empty::<IgnoredAny>(&format!("/api/station/{}/{}", station_id, product_id))
            .await?;
        Ok(())
    }

    pub async fn remove_product_from_station(
        &self,
        station_id: u64,
        product_id: u64,
    ) -> ClientResult<()> {
        self.http
            .delete::<IgnoredAny>(&format!("/api/station/{}/{}", station_id, product_id))
            .await?;
        Ok(())
    }

    // ========== Users ==========

    pub async fn users(&self) -> ClientResult<Vec<User>> {
        let users = self.http.get::<Vec<User>>("/api/users").await?;
        Ok(users.unwrap_or_default())
    }

    pub async fn create_user(&self, payload: &UserCreate) -> ClientResult<()> {
        self.http
            .post_form::<IgnoredAny>("/api/user", payload.form_fields())
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, user_id: u64) -> ClientResult<()> {
        self.http
            .delete::<IgnoredAny>(&format!("/api/user/{}", user_id))
            .await?;
        Ok(())
    }

    /// The user owning the current session
    pub async fn current_user(&self) -> ClientResult<SessionUser> {
        self.http
            .get::<SessionUser>("/api/user")
            .await?
            .ok_or_else(|| ClientError::MissingData("session user".into()))
    }
}
