use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CartLine;

/// Full-cart replacement payload: the client pushes its whole snapshot on
/// every mutation (last write wins at cart granularity).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveCartRequest {
    pub cart_items: Vec<CartLine>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
}
