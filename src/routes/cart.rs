use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::cart::{CartSnapshot, SaveCartRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_cart).post(save_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Persisted cart for the current user", body = ApiResponse<CartSnapshot>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartSnapshot>>> {
    let resp = cart_service::get_cart(&state.pool, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = SaveCartRequest,
    responses(
        (status = 200, description = "Cart snapshot replaced", body = ApiResponse<CartSnapshot>),
        (status = 400, description = "Zero quantity or duplicate line"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn save_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SaveCartRequest>,
) -> AppResult<Json<ApiResponse<CartSnapshot>>> {
    let resp = cart_service::save_cart(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}
