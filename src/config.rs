use std::{env, fmt::Display, str::FromStr};

use anyhow::Context;
use tracing::info;

pub const DEFAULT_API_URL: &str = "https://developers.zomato.com/api/v2.1";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    /// Every search and listing is scoped to this city.
    pub city_id: u32,
    pub database_url: String,
    pub bind_addr: String,
    pub port: u16,
    pub cors_origin: String,
}

impl Config {
    /// Read the configuration from the environment. Call `dotenvy::dotenv()`
    /// beforehand to pick up a local `.env` file.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_key: env::var("ZOMATO_KEY").context("ZOMATO_KEY env not found")?,
            api_url: try_load("ZOMATO_URL", DEFAULT_API_URL)?,
            city_id: try_load("ZOMATO_CITY_ID", "4")?,
            database_url: try_load("DATABASE_URL", "sqlite:review.db?mode=rwc")?,
            bind_addr: try_load("BIND_ADDR", "127.0.0.1")?,
            port: try_load("PORT", "8080")?,
            cors_origin: try_load("CORS_ORIGIN", "http://localhost:3000")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("invalid {key} value '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_falls_back_to_default() {
        let port: u16 = try_load("RESTAURANT_REVIEW_TEST_UNSET_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_try_load_rejects_garbage() {
        env::set_var("RESTAURANT_REVIEW_TEST_BAD_CITY", "four");
        let city: anyhow::Result<u32> = try_load("RESTAURANT_REVIEW_TEST_BAD_CITY", "4");
        let err = city.unwrap_err().to_string();
        assert!(err.contains("RESTAURANT_REVIEW_TEST_BAD_CITY"), "{err}");
    }
}
