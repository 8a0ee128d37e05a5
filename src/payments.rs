use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment provider credentials are not configured")]
    NotConfigured,

    #[error("payment provider request failed: {0}")]
    Request(String),

    #[error("payment provider rejected the request: {0}")]
    Api(String),
}

/// The slice of a provider payment intent this service holds on to. The
/// authoritative state of the transaction stays with the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

#[derive(Debug)]
pub struct CreatePaymentIntent<'a> {
    /// Amount in minor units (cents).
    pub amount: i64,
    pub currency: &'a str,
    pub description: &'a str,
    pub metadata: &'a [(String, String)],
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    secret_key: Option<String>,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("secret_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    /// Build the client. A missing secret key still yields a client; intent
    /// creation then fails with [`PaymentError::NotConfigured`].
    pub fn new(secret_key: Option<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, secret_key })
    }

    pub async fn create_payment_intent(
        &self,
        params: CreatePaymentIntent<'_>,
    ) -> Result<PaymentIntent, PaymentError> {
        let secret = self
            .secret_key
            .as_deref()
            .ok_or(PaymentError::NotConfigured)?;

        let mut form: Vec<(String, String)> = vec![
            ("amount".to_string(), params.amount.to_string()),
            ("currency".to_string(), params.currency.to_string()),
            ("description".to_string(), params.description.to_string()),
        ];
        for (key, value) in params.metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }

        let response = self
            .http
            .post(format!("{STRIPE_API_BASE}/payment_intents"))
            .bearer_auth(secret)
            .form(&form)
            .send()
            .await
            .map_err(|err| PaymentError::Request(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<PaymentIntent>()
                .await
                .map_err(|err| PaymentError::Request(err.to_string()))
        } else {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| format!("provider returned status {status}"));
            Err(PaymentError::Api(message))
        }
    }
}
