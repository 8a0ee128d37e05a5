use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderLine, PaymentStatus, ShippingAddress};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    /// Submitted as `Paid` by the payment-success redirect page; defaults to
    /// `Pending`. See DESIGN.md for the trust caveat on this field.
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
