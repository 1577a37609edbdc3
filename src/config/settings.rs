use std::env;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(String),

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Application settings loaded once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// `DATABASE_URL` defaults to a local sqlite file, `BIND_ADDR` to
    /// `0.0.0.0:3000`. `JWT_SECRET` is required and must be at least 32
    /// bytes.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://storefront.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVariable("JWT_SECRET".to_string()))?;
        if jwt_secret.len() < 32 {
            return Err(ConfigError::InvalidValue {
                name: "JWT_SECRET".to_string(),
                message: "must be at least 32 characters".to_string(),
            });
        }

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
        })
    }
}
