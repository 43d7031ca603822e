//! POS Client - data synchronization layer for the admin front end
//!
//! Talks to the POS backend over HTTP + JSON and keeps per-view state:
//! resource stores, mutation dispatchers, optimistic toggles and the
//! analytics derived from the order history.

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod mutation;
pub mod store;
pub mod toggle;

pub use api::PosApi;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use mutation::{OrderMutations, ProductMutations, StationMutations, UserMutations};
pub use store::{
    Fetcher, OrderQuery, OrderStore, PastYearOrderStore, ProductStore, Resource, ResourceStatus,
    ResourceStore, StationStore, UserStore,
};
pub use toggle::{FulfillmentToggle, TogglePhase, ToggleState};

// Re-export shared types for convenience
pub use shared::{ApiResponse, Order, Product, RichOrder, SessionUser, Station, User};
