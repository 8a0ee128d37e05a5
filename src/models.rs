use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

/// One user document: profile fields plus the embedded cart and wishlist.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub is_active: bool,
    pub cart: Json<Vec<CartLine>>,
    pub wishlist: Json<Vec<i64>>,
    pub created_at: DateTime<Utc>,
}

/// A cart entry. The price is a snapshot taken when the line was added and is
/// deliberately not reconciled with later catalog price changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub images: Vec<String>,
    pub quantity: u32,
}

/// An order line snapshot: product reference and quantity only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(PaymentStatus::Pending),
            "Paid" => Some(PaymentStatus::Paid),
            "Failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// A finalized order. Immutable after creation apart from the payment status
/// transition; no mutating endpoints are exposed for historical orders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
