use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub database_url: String,

    pub weather_api_key: String,
    /// Current-weather endpoint of the provider
    pub weather_api_url: String,
    /// Unit system passed to the provider ("metric" gives °C and m/s)
    pub weather_units: String,
    /// Upper bound for a single provider request, in seconds
    pub weather_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN")?,
            database_url: std::env::var("DATABASE_URL")?,
            weather_api_key: std::env::var("WEATHER_API_KEY")?,
            weather_api_url: std::env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| DEFAULT_WEATHER_API_URL.to_string()),
            weather_units: std::env::var("WEATHER_UNITS")
                .unwrap_or_else(|_| "metric".to_string()),
            weather_timeout_secs: std::env::var("WEATHER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        })
    }

    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather_timeout_secs)
    }
}
