use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, OrderList},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, PaymentStatus},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .order_by_desc(OrderCol::OrderDate);

    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(order_from_entity(model)?);
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("OK", OrderList { items }, Some(meta)))
}

/// Append-only order creation. Historical orders expose no update or delete
/// operations; the payment status submitted here is the only transition the
/// record ever sees.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "Items and total amount are required".to_string(),
        ));
    }
    if payload.items.iter().any(|item| item.quantity == 0) {
        return Err(AppError::BadRequest(
            "order item quantity must be at least 1".to_string(),
        ));
    }
    if !payload.total_amount.is_finite() || payload.total_amount <= 0.0 {
        return Err(AppError::BadRequest(
            "total amount must be a positive number".to_string(),
        ));
    }

    let payment_status = payload.payment_status.unwrap_or(PaymentStatus::Pending);

    let items = serde_json::to_value(&payload.items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    let shipping_address = payload
        .shipping_address
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        order_date: NotSet,
        items: Set(items),
        total_amount: Set(payload.total_amount),
        shipping_address: Set(shipping_address),
        payment_status: Set(payment_status.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "payment_status": payment_status.as_str(),
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let items = serde_json::from_value(model.items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    let shipping_address = model
        .shipping_address
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        order_date: model.order_date.with_timezone(&Utc),
        items,
        total_amount: model.total_amount,
        shipping_address,
        payment_status: PaymentStatus::parse(&model.payment_status)
            .unwrap_or(PaymentStatus::Pending),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
