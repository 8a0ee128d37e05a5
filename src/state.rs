use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
    mailer::Mailer,
    payments::StripeClient,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: AppConfig,
    pub payments: StripeClient,
    pub mailer: Option<Mailer>,
    pub http: reqwest::Client,
}
