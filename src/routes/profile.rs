use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get},
};

use crate::{
    dto::profile::{ProfileResponse, UpdateProfileRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::profile_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/deactivate", delete(deactivate_account))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile for the current user", body = ApiResponse<ProfileResponse>),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProfileResponse>>> {
    let resp = profile_service::get_profile(&state.pool, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid email or email taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<ProfileResponse>>> {
    let resp = profile_service::update_profile(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/profile/deactivate",
    responses(
        (status = 200, description = "Account deactivated", body = ApiResponse<serde_json::Value>),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn deactivate_account(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = profile_service::deactivate_account(&state.pool, &user).await?;
    Ok(Json(resp))
}
