use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::checkout::{CheckoutRequest, CheckoutResponse},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartLine, ShippingAddress},
    payments::CreatePaymentIntent,
    response::{ApiResponse, Meta},
    services::cart_service,
    state::AppState,
};

/// Authoritative total: always recomputed from the persisted cart, never
/// taken from client input.
pub fn compute_total(lines: &[CartLine]) -> f64 {
    lines
        .iter()
        .map(|line| line.price * f64::from(line.quantity))
        .sum()
}

/// Convert a major-unit total into the minor units the provider expects.
pub fn to_minor_units(total: f64) -> i64 {
    (total * 100.0).round() as i64
}

pub fn validate_shipping_address(address: &ShippingAddress) -> AppResult<()> {
    let mut missing = Vec::new();
    if address.first_name.trim().is_empty() {
        missing.push("first_name");
    }
    if address.last_name.trim().is_empty() {
        missing.push("last_name");
    }
    if address.email.trim().is_empty() {
        missing.push("email");
    }
    if address.street.trim().is_empty() {
        missing.push("street");
    }
    if address.city.trim().is_empty() {
        missing.push("city");
    }
    if address.province.trim().is_empty() {
        missing.push("province");
    }
    if address.postal_code.trim().is_empty() {
        missing.push("postal_code");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "missing required shipping fields: {}",
            missing.join(", ")
        )))
    }
}

/// Assemble a checkout attempt: validate, recompute the total from the
/// persisted cart, create the provider intent, then dispatch the
/// confirmation email off the response path.
pub async fn begin_checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    validate_shipping_address(&payload.shipping_address)?;

    let cart = cart_service::load_cart(&state.pool, user.user_id).await?;
    if cart.is_empty() {
        return Err(AppError::InvalidState(
            "Your cart is empty. Please add items to proceed.".to_string(),
        ));
    }

    let total = compute_total(&cart);
    let amount = to_minor_units(total);
    let transaction_id = Uuid::new_v4().simple().to_string();

    // Cart line snapshot rides along in the provider metadata so a settled
    // transaction can be reconciled against what was actually in the cart.
    let line_snapshot: Vec<serde_json::Value> = cart
        .iter()
        .map(|line| serde_json::json!({ "id": line.product_id, "quantity": line.quantity }))
        .collect();
    let metadata = vec![
        (
            "firstName".to_string(),
            payload.shipping_address.first_name.clone(),
        ),
        (
            "lastName".to_string(),
            payload.shipping_address.last_name.clone(),
        ),
        ("email".to_string(), payload.shipping_address.email.clone()),
        ("transactionId".to_string(), transaction_id.clone()),
        (
            "cartItems".to_string(),
            serde_json::Value::Array(line_snapshot).to_string(),
        ),
    ];

    let description = format!("Storefront order | TX ID: {transaction_id}");
    let intent = state
        .payments
        .create_payment_intent(CreatePaymentIntent {
            amount,
            currency: &state.config.checkout_currency,
            description: &description,
            metadata: &metadata,
        })
        .await
        .map_err(|err| AppError::Upstream(err.to_string()))?;

    // Best-effort notification: runs detached, failure is logged and never
    // reaches the checkout response.
    if let Some(mailer) = state.mailer.clone() {
        let to = payload.shipping_address.email.clone();
        let tx = transaction_id.clone();
        let currency = state.config.checkout_currency.clone();
        tokio::spawn(async move {
            if let Err(err) = mailer.send_order_confirmation(&to, &tx, total, &currency).await {
                tracing::warn!(error = %err, transaction_id = %tx, "failed to send confirmation email");
            }
        });
    } else {
        tracing::debug!("mail transport not configured; skipping order confirmation email");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "checkout_intent",
        Some("orders"),
        Some(serde_json::json!({
            "transaction_id": transaction_id,
            "amount": amount,
            "intent_id": intent.id,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment intent created",
        CheckoutResponse {
            client_secret: intent.client_secret,
            transaction_id,
        },
        Some(Meta::empty()),
    ))
}
