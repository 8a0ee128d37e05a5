use crate::{
    audit::log_audit,
    db::DbPool,
    dto::profile::{ProfileResponse, UpdateProfileRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
};

pub async fn get_profile(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let found: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(pool)
        .await?;

    let found = found.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "OK",
        ProfileResponse::from(found),
        Some(Meta::empty()),
    ))
}

pub async fn update_profile(
    pool: &DbPool,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<ProfileResponse>> {
    if let Some(email) = payload.email.as_deref() {
        if !email.contains('@') {
            return Err(AppError::BadRequest("invalid email address".to_string()));
        }
        let taken: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = $1 AND id <> $2")
                .bind(email)
                .bind(user.user_id)
                .fetch_optional(pool)
                .await?;
        if taken.is_some() {
            return Err(AppError::BadRequest("Email is already taken".to_string()));
        }
    }

    let updated: Option<User> = sqlx::query_as(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            email = COALESCE($4, email)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(payload.first_name)
    .bind(payload.last_name)
    .bind(payload.email)
    .fetch_optional(pool)
    .await?;

    let updated = updated.ok_or(AppError::NotFound)?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "profile_update",
        Some("users"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Profile updated",
        ProfileResponse::from(updated),
        Some(Meta::empty()),
    ))
}

/// Flips `is_active` off and keeps the row; safer than deleting the record,
/// and signin rejects deactivated accounts.
pub async fn deactivate_account(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        "profile_deactivate",
        Some("users"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Account deactivated",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
