use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{get_json, http_client, LookupError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Degrees Celsius.
    pub temperature: f64,
    /// km/h.
    pub windspeed: f64,
}

#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn current(&self, city: &str) -> Result<CurrentWeather, LookupError>;
}

/// Two-step lookup: geocode the city, then fetch current conditions there.
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    geocoding_url: String,
    forecast_url: String,
}

#[derive(Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Deserialize)]
struct Place {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

impl OpenMeteoClient {
    pub fn new(geocoding_url: impl Into<String>, forecast_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
        }
    }

    async fn locate(&self, city: &str) -> Result<Place, LookupError> {
        let request = self
            .client
            .get(&self.geocoding_url)
            .query(&[("name", city), ("count", "1")]);
        let response: GeocodingResponse = get_json(request).await?;
        response.results.into_iter().next().ok_or(LookupError::NoMatch)
    }
}

#[async_trait]
impl WeatherService for OpenMeteoClient {
    async fn current(&self, city: &str) -> Result<CurrentWeather, LookupError> {
        let place = self.locate(city).await?;
        debug!("Geocoded '{}' to ({}, {})", city, place.latitude, place.longitude);

        let request = self.client.get(&self.forecast_url).query(&[
            ("latitude", place.latitude.to_string()),
            ("longitude", place.longitude.to_string()),
            ("current_weather", "true".to_string()),
        ]);
        let response: ForecastResponse = get_json(request).await?;
        Ok(response.current_weather)
    }
}
