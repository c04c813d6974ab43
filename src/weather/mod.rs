pub mod api;
pub mod client;

use std::fmt;

use async_trait::async_trait;

use crate::db::models::Coordinates;

pub use client::OpenWeatherClient;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("weather provider unreachable: {0}")]
    Unreachable(String),
    #[error("malformed weather response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait WeatherGateway: Send + Sync {
    /// One outbound request per call, no retries.
    async fn fetch_forecast(
        &self,
        location: Coordinates,
    ) -> Result<ForecastSnapshot, GatewayError>;
}

/// Current conditions at a location, in metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    pub condition: String,
    pub temp: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

impl ForecastSnapshot {
    /// Parse a provider body, requiring every field the reply shows.
    pub fn from_json(body: &str) -> Result<Self, GatewayError> {
        let response: api::WeatherResponse = serde_json::from_str(body)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        Self::from_response(response)
    }

    pub fn from_response(response: api::WeatherResponse) -> Result<Self, GatewayError> {
        let condition = response
            .weather
            .into_iter()
            .next()
            .map(|c| c.main)
            .ok_or_else(|| GatewayError::MalformedResponse("empty weather list".to_string()))?;

        Ok(Self {
            condition,
            temp: response.main.temp,
            temp_max: response.main.temp_max,
            temp_min: response.main.temp_min,
            humidity: response.main.humidity,
            wind_speed: response.wind.speed,
        })
    }
}

impl fmt::Display for ForecastSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n\n\
             Temp: {:?}°C\n\
             Max temp: {:?}°C\n\
             Min temp: {:?}°C\n\
             Humidity: {}%\n\
             Wind speed: {:?} m/s",
            self.condition,
            self.temp,
            self.temp_max,
            self.temp_min,
            self.humidity,
            self.wind_speed,
        )
    }
}
