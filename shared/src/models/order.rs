//! Order Model

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::flag::{bool_flag, optional_id};
use super::product::Product;

/// Order with its line items, as returned by the analytics endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub created_at: DateTime<FixedOffset>,
    #[serde(default, deserialize_with = "bool_flag")]
    pub cancelled: bool,
    /// Line items, one entry per ordered unit
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Order {
    /// Sum of line prices (no tax or discount modeling)
    pub fn total(&self) -> f64 {
        self.products.iter().map(|p| p.price).sum()
    }

    /// Number of line items
    pub fn products_len(&self) -> usize {
        self.products.len()
    }
}

/// Order header inside a [`RichOrder`]
///
/// Every field is optional because the lookup endpoint answers unknown ids
/// with an empty object instead of an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderHeader {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "bool_flag")]
    pub cancelled: bool,
}

/// Order as shown in the order list: header plus resolved line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichOrder {
    #[serde(default)]
    pub order: OrderHeader,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl RichOrder {
    /// Order id, `None` when the backend returned an empty header
    pub fn id(&self) -> Option<u64> {
        self.order.id
    }

    /// Whether every line item has been fulfilled
    pub fn is_fulfilled(&self) -> bool {
        self.products.iter().all(|p| p.fulfilled)
    }

    pub fn total(&self) -> f64 {
        self.products.iter().map(|p| p.price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total_and_len() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": 9,
                "created_at": "2024-03-01T13:45:00+01:00",
                "products": [
                    {"id": 1, "name": "Burger", "price": 7.5},
                    {"id": 2, "name": "Fries", "price": 2.25}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(order.total(), 9.75);
        assert_eq!(order.products_len(), 2);
        assert!(!order.cancelled);
    }

    #[test]
    fn test_empty_header_has_no_id() {
        let rich: RichOrder = serde_json::from_str(r#"{"order":{}}"#).unwrap();
        assert_eq!(rich.id(), None);

        let zero: RichOrder = serde_json::from_str(r#"{"order":{"id":0}}"#).unwrap();
        assert_eq!(zero.id(), None);
    }

    #[test]
    fn test_rich_order_fulfilled() {
        let rich: RichOrder = serde_json::from_str(
            r#"{"order":{"id":4,"cancelled":0},"products":[
                {"id":1,"name":"A","price":1.0,"fulfilled":1},
                {"id":2,"name":"B","price":2.0,"fulfilled":0}
            ]}"#,
        )
        .unwrap();
        assert_eq!(rich.id(), Some(4));
        assert!(!rich.is_fulfilled());
        assert_eq!(rich.total(), 3.0);
    }
}
