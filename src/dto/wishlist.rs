use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddWishlistRequest {
    pub product_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WishlistSnapshot {
    pub items: Vec<i64>,
}
