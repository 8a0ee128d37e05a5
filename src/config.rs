use std::env;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_origin: String,
    pub checkout_currency: String,
    pub stripe_secret_key: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub google: Option<GoogleOAuthConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let frontend_origin =
            env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let checkout_currency =
            env::var("CHECKOUT_CURRENCY").unwrap_or_else(|_| "zar".to_string());
        let stripe_secret_key = env::var("STRIPE_SECRET_KEY").ok().filter(|k| !k.is_empty());

        // An incomplete SMTP or Google block disables that integration instead of
        // failing startup; checkout and password login keep working without them.
        let smtp = match (
            env::var("SMTP_HOST"),
            env::var("SMTP_USERNAME"),
            env::var("SMTP_PASSWORD"),
            env::var("SMTP_FROM"),
        ) {
            (Ok(host), Ok(username), Ok(password), Ok(from_address)) => Some(SmtpConfig {
                host,
                username,
                password,
                from_address,
            }),
            _ => None,
        };

        let google = match (
            env::var("GOOGLE_CLIENT_ID"),
            env::var("GOOGLE_CLIENT_SECRET"),
            env::var("GOOGLE_REDIRECT_URI"),
        ) {
            (Ok(client_id), Ok(client_secret), Ok(redirect_uri)) => Some(GoogleOAuthConfig {
                client_id,
                client_secret,
                redirect_uri,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            frontend_origin,
            checkout_currency,
            stripe_secret_key,
            smtp,
            google,
        })
    }
}
