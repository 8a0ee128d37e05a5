use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use thiserror::Error;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),
}

/// Async SMTP sender for the best-effort order confirmation notification.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("from_address", &self.from_address)
            .finish_non_exhaustive()
    }
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .credentials(credentials)
            .build();
        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    pub async fn send_order_confirmation(
        &self,
        to: &str,
        transaction_id: &str,
        total: f64,
        currency: &str,
    ) -> Result<(), MailError> {
        let html = format!(
            "<h1>Thank you for your purchase!</h1>\
             <p>Your order is being processed. You will be redirected to the payment page shortly.</p>\
             <p>Total amount: {} {total:.2}</p>\
             <p>Please use this reference number for any inquiries: {transaction_id}</p>",
            currency.to_uppercase(),
        );

        let message = Message::builder()
            .from(self.from_address.parse()?)
            .to(to.parse()?)
            .subject(format!("Order Confirmation #{transaction_id}"))
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        self.transport.send(message).await?;
        Ok(())
    }
}
