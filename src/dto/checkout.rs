use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ShippingAddress;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddress,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    /// Secret the browser needs to complete payment with the provider.
    pub client_secret: String,
    /// Opaque reference embedded in the provider metadata and the
    /// confirmation email.
    pub transaction_id: String,
}
