use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    config::GoogleOAuthConfig,
    db::DbPool,
    dto::auth::{Claims, SigninRequest, SignupRequest, TokenResponse},
    dto::profile::ProfileResponse,
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

pub async fn signup(
    pool: &DbPool,
    payload: SignupRequest,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let SignupRequest {
        first_name,
        last_name,
        email,
        password,
    } = payload;

    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "first name and last name are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("invalid email address".to_string()));
    }
    if password.len() < 8 {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, first_name, last_name, email, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(first_name.trim())
    .bind(last_name.trim())
    .bind(email.as_str())
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_signup",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "User created",
        ProfileResponse::from(user),
        None,
    ))
}

pub async fn signin(
    pool: &DbPool,
    payload: SigninRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let SigninRequest { email, password } = payload;
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Invalid email or password".into())),
    };

    if !user.is_active {
        return Err(AppError::Unauthorized("Account is deactivated".into()));
    }

    // Accounts created through federated login carry no password hash.
    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    let token = issue_token(user.id)?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_signin",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged in",
        TokenResponse { token },
        Some(Meta::empty()),
    ))
}

pub fn issue_token(user_id: Uuid) -> AppResult<String> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::days(7))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn google_authorize_url(config: &GoogleOAuthConfig) -> AppResult<String> {
    let url = reqwest::Url::parse_with_params(
        GOOGLE_AUTH_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "openid email profile"),
        ],
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    Ok(url.to_string())
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: String,
    given_name: Option<String>,
    family_name: Option<String>,
}

/// Exchange an authorization code, then find-or-create the matching user:
/// first by federated id, then by email (linking the federated id), finally
/// creating a fresh account.
pub async fn google_signin(
    pool: &DbPool,
    http: &reqwest::Client,
    config: &GoogleOAuthConfig,
    code: &str,
) -> AppResult<(String, User)> {
    let token: GoogleTokenResponse = http
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Google token exchange failed: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::Upstream(format!("Google token exchange rejected: {e}")))?
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Google token response malformed: {e}")))?;

    let info: GoogleUserInfo = http
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(&token.access_token)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Google userinfo fetch failed: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::Upstream(format!("Google userinfo fetch rejected: {e}")))?
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("Google userinfo malformed: {e}")))?;

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE google_id = $1")
        .bind(info.id.as_str())
        .fetch_optional(pool)
        .await?;

    let user = match existing {
        Some(user) => user,
        None => {
            let by_email: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
                .bind(info.email.as_str())
                .fetch_optional(pool)
                .await?;

            match by_email {
                Some(user) => {
                    sqlx::query_as("UPDATE users SET google_id = $2 WHERE id = $1 RETURNING *")
                        .bind(user.id)
                        .bind(info.id.as_str())
                        .fetch_one(pool)
                        .await?
                }
                None => {
                    sqlx::query_as(
                        r#"
                        INSERT INTO users (id, first_name, last_name, email, google_id)
                        VALUES ($1, $2, $3, $4, $5)
                        RETURNING *
                        "#,
                    )
                    .bind(Uuid::new_v4())
                    .bind(info.given_name.as_deref())
                    .bind(info.family_name.as_deref())
                    .bind(info.email.as_str())
                    .bind(info.id.as_str())
                    .fetch_one(pool)
                    .await?
                }
            }
        }
    };

    if !user.is_active {
        return Err(AppError::Unauthorized("Account is deactivated".into()));
    }

    let jwt = issue_token(user.id)?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_signin_google",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok((jwt, user))
}
