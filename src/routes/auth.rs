use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    dto::auth::{GoogleCallbackQuery, SigninRequest, SignupRequest, TokenResponse},
    dto::profile::ProfileResponse,
    error::{AppError, AppResult},
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/google", get(google))
        .route("/google/callback", get(google_callback))
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid input or email taken")
    ),
    tag = "Auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProfileResponse>>)> {
    let resp = auth_service::signup(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials or deactivated account")
    ),
    tag = "Auth"
)]
pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let resp = auth_service::signin(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/auth/google",
    responses(
        (status = 303, description = "Redirect to the federated login consent screen"),
        (status = 502, description = "Federated login not configured")
    ),
    tag = "Auth"
)]
pub async fn google(State(state): State<AppState>) -> AppResult<Redirect> {
    let config = state
        .config
        .google
        .as_ref()
        .ok_or_else(|| AppError::Upstream("Federated login is not configured".to_string()))?;
    let url = auth_service::google_authorize_url(config)?;
    Ok(Redirect::to(&url))
}

#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    params(
        ("code" = String, Query, description = "Authorization code from the provider")
    ),
    responses(
        (status = 303, description = "Redirect back to the frontend with a session token"),
        (status = 502, description = "Provider exchange failed")
    ),
    tag = "Auth"
)]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
) -> AppResult<Redirect> {
    let config = state
        .config
        .google
        .as_ref()
        .ok_or_else(|| AppError::Upstream("Federated login is not configured".to_string()))?;

    let (token, user) =
        auth_service::google_signin(&state.pool, &state.http, config, &query.code).await?;

    let url = reqwest::Url::parse_with_params(
        &state.config.frontend_origin,
        &[
            ("token", token.as_str()),
            ("firstName", user.first_name.as_deref().unwrap_or_default()),
            ("email", user.email.as_str()),
        ],
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    Ok(Redirect::to(url.as_str()))
}
