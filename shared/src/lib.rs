//! Shared types for the POS admin client
//!
//! Wire models and the response envelope used by every backend endpoint.
//! Kept free of HTTP concerns so the same types can back fixtures and mocks.

pub mod models;
pub mod response;

// Re-exports
pub use models::*;
pub use response::ApiResponse;
pub use serde::{Deserialize, Serialize};
