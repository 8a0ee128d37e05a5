use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    dto::auth::{SigninRequest, SignupRequest, TokenResponse},
    dto::cart::{CartSnapshot, SaveCartRequest},
    dto::checkout::{CheckoutRequest, CheckoutResponse},
    dto::orders::{CreateOrderRequest, OrderList},
    dto::profile::{ProfileResponse, UpdateProfileRequest},
    dto::wishlist::{AddWishlistRequest, WishlistSnapshot},
    models::{CartLine, Order, ShippingAddress},
    response::ApiResponse,
};

/// Client-side mirror of the server error taxonomy, recovered from response
/// status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Typed client for the inbound REST surface.
pub struct StorefrontApi {
    base_url: String,
    http: Client,
    token: Option<String>,
}

impl std::fmt::Debug for StorefrontApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontApi")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl StorefrontApi {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            http,
            token: None,
        })
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ApiError::Unauthorized("no session token held".to_string()))?;
        Ok(builder.bearer_auth(token))
    }

    async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            let envelope: ApiResponse<T> = response
                .json()
                .await
                .map_err(|e| ApiError::Malformed(e.to_string()))?;
            envelope
                .data
                .ok_or_else(|| ApiError::Malformed("response envelope carried no data".into()))
        } else {
            let message = response
                .json::<ApiResponse<serde_json::Value>>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| status.to_string());
            Err(match status {
                StatusCode::BAD_REQUEST => ApiError::InvalidInput(message),
                StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                StatusCode::CONFLICT => ApiError::Conflict(message),
                StatusCode::BAD_GATEWAY => ApiError::Upstream(message),
                _ => ApiError::Server(message),
            })
        }
    }

    pub async fn signup(&self, payload: &SignupRequest) -> Result<ProfileResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/api/auth/signup"))
            .json(payload)
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Sign in and keep the returned token for subsequent calls.
    pub async fn signin(&mut self, email: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.url("/api/auth/signin"))
            .json(&SigninRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let token: TokenResponse = Self::handle(response).await?;
        self.token = Some(token.token.clone());
        Ok(token.token)
    }

    pub async fn fetch_cart(&self) -> Result<Vec<CartLine>, ApiError> {
        let response = self
            .authorized(self.http.get(self.url("/api/cart")))?
            .send()
            .await?;
        let snapshot: CartSnapshot = Self::handle(response).await?;
        Ok(snapshot.items)
    }

    /// Push the full cart snapshot; last write wins at cart granularity.
    pub async fn push_cart(&self, lines: &[CartLine]) -> Result<(), ApiError> {
        let response = self
            .authorized(self.http.post(self.url("/api/cart")))?
            .json(&SaveCartRequest {
                cart_items: lines.to_vec(),
            })
            .send()
            .await?;
        let _: CartSnapshot = Self::handle(response).await?;
        Ok(())
    }

    pub async fn fetch_wishlist(&self) -> Result<Vec<i64>, ApiError> {
        let response = self
            .authorized(self.http.get(self.url("/api/wishlist")))?
            .send()
            .await?;
        let snapshot: WishlistSnapshot = Self::handle(response).await?;
        Ok(snapshot.items)
    }

    pub async fn add_to_wishlist(&self, product_id: i64) -> Result<Vec<i64>, ApiError> {
        let response = self
            .authorized(self.http.post(self.url("/api/wishlist")))?
            .json(&AddWishlistRequest { product_id })
            .send()
            .await?;
        let snapshot: WishlistSnapshot = Self::handle(response).await?;
        Ok(snapshot.items)
    }

    pub async fn remove_from_wishlist(&self, product_id: i64) -> Result<Vec<i64>, ApiError> {
        let response = self
            .authorized(
                self.http
                    .delete(self.url(&format!("/api/wishlist/{product_id}"))),
            )?
            .send()
            .await?;
        let snapshot: WishlistSnapshot = Self::handle(response).await?;
        Ok(snapshot.items)
    }

    pub async fn fetch_profile(&self) -> Result<ProfileResponse, ApiError> {
        let response = self
            .authorized(self.http.get(self.url("/api/profile")))?
            .send()
            .await?;
        Self::handle(response).await
    }

    pub async fn update_profile(
        &self,
        payload: &UpdateProfileRequest,
    ) -> Result<ProfileResponse, ApiError> {
        let response = self
            .authorized(self.http.put(self.url("/api/profile")))?
            .json(payload)
            .send()
            .await?;
        Self::handle(response).await
    }

    pub async fn begin_checkout(
        &self,
        shipping_address: &ShippingAddress,
    ) -> Result<CheckoutResponse, ApiError> {
        let response = self
            .authorized(self.http.post(self.url("/api/checkout")))?
            .json(&CheckoutRequest {
                shipping_address: shipping_address.clone(),
            })
            .send()
            .await?;
        Self::handle(response).await
    }

    pub async fn place_order(&self, payload: &CreateOrderRequest) -> Result<Order, ApiError> {
        let response = self
            .authorized(self.http.post(self.url("/api/orders")))?
            .json(payload)
            .send()
            .await?;
        Self::handle(response).await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let response = self
            .authorized(self.http.get(self.url("/api/orders")))?
            .send()
            .await?;
        let list: OrderList = Self::handle(response).await?;
        Ok(list.items)
    }
}
