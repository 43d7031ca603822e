//! Product Model

use serde::{Deserialize, Serialize};

use super::flag::bool_flag;

/// Product entity
///
/// The same shape is used for catalogue entries and for order lines; in the
/// latter case `fulfilled` carries the per-line status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    /// Order-line status, always `false` for catalogue entries
    #[serde(default, deserialize_with = "bool_flag")]
    pub fulfilled: bool,
    #[serde(default, deserialize_with = "bool_flag")]
    pub discontinued: bool,
    #[serde(default, deserialize_with = "bool_flag")]
    pub sold_out: bool,
    #[serde(default)]
    pub product_type_id: u64,
}

impl Product {
    /// Whether the product can currently be put on an order
    pub fn is_available(&self) -> bool {
        !self.discontinued && !self.sold_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_accepts_integer_flags() {
        let p: Product = serde_json::from_str(
            r#"{"id":3,"name":"Fries","price":2.5,"fulfilled":1,"discontinued":0,"sold_out":"1"}"#,
        )
        .unwrap();
        assert!(p.fulfilled);
        assert!(!p.discontinued);
        assert!(p.sold_out);
        assert!(!p.is_available());
    }

    #[test]
    fn test_product_flags_default_to_false() {
        let p: Product = serde_json::from_str(r#"{"id":1,"name":"Cola","price":1.0}"#).unwrap();
        assert!(!p.fulfilled);
        assert!(p.is_available());
        assert_eq!(p.product_type_id, 0);
    }
}
