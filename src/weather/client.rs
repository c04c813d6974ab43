use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{ForecastSnapshot, GatewayError, WeatherGateway};
use crate::config::AppConfig;
use crate::db::models::Coordinates;

/// Current-weather client for the OpenWeatherMap HTTP API.
pub struct OpenWeatherClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.weather_timeout())
            .build()?;
        let endpoint = Url::parse(&config.weather_api_url).map_err(|e| {
            anyhow::anyhow!("Invalid WEATHER_API_URL '{}': {}", config.weather_api_url, e)
        })?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.weather_api_key.clone(),
            units: config.weather_units.clone(),
        })
    }

    fn request_url(&self, location: Coordinates) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &location.latitude.to_string())
            .append_pair("lon", &location.longitude.to_string())
            .append_pair("appid", &self.api_key)
            .append_pair("units", &self.units);
        url
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherClient {
    async fn fetch_forecast(
        &self,
        location: Coordinates,
    ) -> Result<ForecastSnapshot, GatewayError> {
        let resp = self
            .client
            .get(self.request_url(location))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GatewayError::Unreachable(format!(
                "provider answered {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        ForecastSnapshot::from_json(&body)
    }
}
