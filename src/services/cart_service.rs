use std::collections::HashSet;

use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::cart::{CartSnapshot, SaveCartRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartLine,
    response::{ApiResponse, Meta},
};

pub async fn load_cart(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<CartLine>> {
    let row: Option<(Json<Vec<CartLine>>,)> =
        sqlx::query_as("SELECT cart FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    match row {
        Some((cart,)) => Ok(cart.0),
        None => Err(AppError::NotFound),
    }
}

pub async fn get_cart(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<CartSnapshot>> {
    let items = load_cart(pool, user.user_id).await?;
    Ok(ApiResponse::success(
        "OK",
        CartSnapshot { items },
        Some(Meta::empty()),
    ))
}

/// The persisted cart must never hold a zero quantity or two lines for the
/// same product; snapshots that do are rejected before touching the document.
pub fn validate_cart_lines(lines: &[CartLine]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for line in lines {
        if line.quantity == 0 {
            return Err(AppError::BadRequest(format!(
                "quantity for product {} must be at least 1",
                line.product_id
            )));
        }
        if !line.price.is_finite() || line.price < 0.0 {
            return Err(AppError::BadRequest(format!(
                "invalid price for product {}",
                line.product_id
            )));
        }
        if !seen.insert(line.product_id) {
            return Err(AppError::BadRequest(format!(
                "duplicate cart line for product {}",
                line.product_id
            )));
        }
    }
    Ok(())
}

/// Replace the user's persisted cart with the submitted snapshot.
pub async fn save_cart(
    pool: &DbPool,
    user: &AuthUser,
    payload: SaveCartRequest,
) -> AppResult<ApiResponse<CartSnapshot>> {
    validate_cart_lines(&payload.cart_items)?;

    let result = sqlx::query("UPDATE users SET cart = $2 WHERE id = $1")
        .bind(user.user_id)
        .bind(Json(&payload.cart_items))
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "cart_sync",
        Some("users"),
        Some(serde_json::json!({ "lines": payload.cart_items.len() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Cart saved",
        CartSnapshot {
            items: payload.cart_items,
        },
        Some(Meta::empty()),
    ))
}
