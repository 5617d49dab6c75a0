//! Order models and status lifecycle
//!
//! An order is a header (price breakdown, payment descriptor, status)
//! plus immutable line items capturing quantity and price-at-purchase.
//! The status field walks a fixed sequence, with cancellation reachable
//! from any state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// Closed set: the store layer only accepts this enum; unrecognized
/// strings are rejected at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// The automatic next step in the fulfilment sequence.
    /// Terminal states have no successor.
    pub const fn next(&self) -> Option<OrderStatus> {
        match self {
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::Delivered),
            Self::Delivered => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Completed and Cancelled orders never change status again
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Processing
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when parsing an unrecognized status string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrderStatus(pub String);

impl fmt::Display for UnknownOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {}", self.0)
    }
}

impl std::error::Error for UnknownOrderStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// Payment descriptor stored with the order header (simulated payment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub method: String,
    pub status: String,
}

impl PaymentInfo {
    /// Descriptor for a freshly placed order
    pub fn pending(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            status: "pending".to_string(),
        }
    }
}

/// One product-quantity-price entry belonging to exactly one order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Price captured at order time, decoupled from the live product price
    pub price: f64,
}

/// Order header with its line items attached
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub payment_info: PaymentInfo,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub order_status: OrderStatus,
    pub created_at: i64,
    pub order_items: Vec<OrderItem>,
}

/// Line item as submitted by the client at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}

/// Order creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub items_price: Option<f64>,
    #[serde(default)]
    pub tax_price: Option<f64>,
    #[serde(default)]
    pub shipping_price: Option<f64>,
    pub total_price: f64,
    pub payment_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_sequence() {
        assert_eq!(OrderStatus::Processing.next(), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::Shipped.next(), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::Delivered.next(), Some(OrderStatus::Completed));
        assert_eq!(OrderStatus::Completed.next(), None);
        assert_eq!(OrderStatus::Cancelled.next(), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
        assert!(!OrderStatus::Delivered.is_terminal());
    }

    #[test]
    fn test_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Processing);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Processing".parse(), Ok(OrderStatus::Processing));
        assert_eq!("Shipped".parse(), Ok(OrderStatus::Shipped));
        assert_eq!("Cancelled".parse(), Ok(OrderStatus::Cancelled));

        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, UnknownOrderStatus("shipped".to_string()));

        assert!("Refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"Processing\"");

        let status: OrderStatus = serde_json::from_str("\"Delivered\"").unwrap();
        assert_eq!(status, OrderStatus::Delivered);

        assert!(serde_json::from_str::<OrderStatus>("\"Lost\"").is_err());
    }

    #[test]
    fn test_payment_info_pending() {
        let info = PaymentInfo::pending("card");
        assert_eq!(info.method, "card");
        assert_eq!(info.status, "pending");
    }

    #[test]
    fn test_order_create_deserialize() {
        let json = r#"{
            "items": [{"productId": 1, "quantity": 2, "price": 100.0}],
            "itemsPrice": 200.0,
            "taxPrice": 20.0,
            "shippingPrice": 10.0,
            "totalPrice": 230.0,
            "paymentMethod": "card"
        }"#;
        let create: OrderCreate = serde_json::from_str(json).unwrap();
        assert_eq!(create.items.len(), 1);
        assert_eq!(create.items[0].product_id, 1);
        assert_eq!(create.items[0].quantity, 2);
        assert_eq!(create.items_price, Some(200.0));
        assert_eq!(create.total_price, 230.0);
        assert_eq!(create.payment_method, "card");
    }
}
