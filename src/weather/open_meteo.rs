//! `OpenMeteo` current-weather client and response structures

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::CurrentConditions;
use crate::GriffinError;

pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

/// Forecast response from `OpenMeteo`, reduced to the current weather block
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub current_weather: Option<CurrentWeather>,
}

/// `current_weather=true` block
#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
}

impl From<ForecastResponse> for CurrentConditions {
    fn from(response: ForecastResponse) -> Self {
        response
            .current_weather
            .map(|current| CurrentConditions {
                temperature: current.temperature,
                windspeed: current.windspeed,
            })
            .unwrap_or_default()
    }
}

impl OpenMeteoClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, GriffinError> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current_weather=true",
            self.base_url, latitude, longitude
        );
        debug!("Calling Open-Meteo: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GriffinError::status(response.status().as_u16()));
        }

        let forecast: ForecastResponse = response.json().await?;
        Ok(forecast.into())
    }
}
