//! Data models
//!
//! Shared between the HTTP client and test fixtures.
//! All IDs are `u64` (backend auto-increment keys, `0` = unset).

pub mod order;
pub mod product;
pub mod station;
pub mod user;

mod flag;

// Re-exports
pub use order::*;
pub use product::*;
pub use station::*;
pub use user::*;
