//! Station Model

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Preparation station (kitchen, bar, ...) and the products routed to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: u64,
    pub name: String,
    /// Product membership, unordered
    #[serde(default)]
    pub products: BTreeSet<u64>,
}

impl Station {
    pub fn has_product(&self, product_id: u64) -> bool {
        self.products.contains(&product_id)
    }
}

/// Create station payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StationCreate {
    #[validate(length(min = 1, max = 255, message = "Station name is required"))]
    pub name: String,
}

impl StationCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
        }
    }

    /// Multipart form fields, in submission order
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone())]
    }
}
