use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::wishlist::{AddWishlistRequest, WishlistSnapshot},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
};

async fn load_wishlist(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<i64>> {
    let row: Option<(Json<Vec<i64>>,)> =
        sqlx::query_as("SELECT wishlist FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    match row {
        Some((wishlist,)) => Ok(wishlist.0),
        None => Err(AppError::NotFound),
    }
}

async fn store_wishlist(pool: &DbPool, user_id: Uuid, wishlist: &[i64]) -> AppResult<()> {
    sqlx::query("UPDATE users SET wishlist = $2 WHERE id = $1")
        .bind(user_id)
        .bind(Json(wishlist))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_wishlist(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<WishlistSnapshot>> {
    let items = load_wishlist(pool, user.user_id).await?;
    Ok(ApiResponse::success(
        "OK",
        WishlistSnapshot { items },
        Some(Meta::empty()),
    ))
}

/// Duplicate adds are a conflict, not a silent no-op; the entry is present
/// either way, but the caller can tell the two outcomes apart.
pub async fn add_to_wishlist(
    pool: &DbPool,
    user: &AuthUser,
    payload: AddWishlistRequest,
) -> AppResult<ApiResponse<WishlistSnapshot>> {
    let mut wishlist = load_wishlist(pool, user.user_id).await?;

    if wishlist.contains(&payload.product_id) {
        return Err(AppError::Conflict(
            "Product is already in your wishlist".to_string(),
        ));
    }

    wishlist.push(payload.product_id);
    store_wishlist(pool, user.user_id, &wishlist).await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "wishlist_add",
        Some("users"),
        Some(serde_json::json!({ "product_id": payload.product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Added to wishlist",
        WishlistSnapshot { items: wishlist },
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_wishlist(
    pool: &DbPool,
    user: &AuthUser,
    product_id: i64,
) -> AppResult<ApiResponse<WishlistSnapshot>> {
    let mut wishlist = load_wishlist(pool, user.user_id).await?;

    if !wishlist.contains(&product_id) {
        return Err(AppError::NotFound);
    }

    wishlist.retain(|id| *id != product_id);
    store_wishlist(pool, user.user_id, &wishlist).await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "wishlist_remove",
        Some("users"),
        Some(serde_json::json!({ "product_id": product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from wishlist",
        WishlistSnapshot { items: wishlist },
        Some(Meta::empty()),
    ))
}
