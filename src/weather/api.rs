use serde::Deserialize;

/// The subset of the provider's current-weather payload the bot reads.
#[derive(Debug, Deserialize, Clone)]
pub struct WeatherResponse {
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    pub wind: Wind,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Condition {
    pub main: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MainReadings {
    pub temp: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Wind {
    pub speed: f64,
}
