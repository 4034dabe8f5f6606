use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{instrument, warn};

use crate::GriffinError;
use crate::models::answer::title_case;
use crate::models::{Location, Panel, PanelKind};
use crate::oracle::PanelSource;

pub mod open_meteo;

/// Snapshot of the weather at a coordinate
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Wind speed in km/h
    pub windspeed: Option<f64>,
}

impl CurrentConditions {
    /// Format temperature without unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format_reading(self.temperature)
    }

    /// Format wind speed without unit
    #[must_use]
    pub fn format_windspeed(&self) -> String {
        format_reading(self.windspeed)
    }
}

impl Display for CurrentConditions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Temperature: {}°C, Windspeed: {} km/h",
            self.format_temperature(),
            self.format_windspeed()
        )
    }
}

/// Whole numbers keep one decimal, missing readings show as N/A
fn format_reading(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
        Some(v) => format!("{v}"),
        None => "N/A".to_string(),
    }
}

/// Weather panel for queries naming one of the known places
pub struct WeatherSource {
    client: open_meteo::OpenMeteoClient,
}

impl WeatherSource {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client: open_meteo::OpenMeteoClient::new(client, base_url),
        }
    }

    /// Current weather sentence for a coordinate, or a message saying why there is none
    #[instrument(skip(self))]
    pub async fn current_weather(&self, latitude: f64, longitude: f64) -> String {
        match self.client.current_weather(latitude, longitude).await {
            Ok(conditions) => conditions.to_string(),
            Err(e) => {
                warn!("Open-Meteo lookup failed: {}", e);
                error_text(&e)
            }
        }
    }
}

#[async_trait]
impl PanelSource for WeatherSource {
    fn name(&self) -> &'static str {
        "open-meteo"
    }

    async fn panel(&self, query: &str) -> Option<Panel> {
        let location = Location::lookup(query)?;
        let body = self
            .current_weather(location.latitude, location.longitude)
            .await;
        Some(weather_panel(query, body))
    }

    fn error_panel(&self, query: &str, error: &GriffinError) -> Option<Panel> {
        Location::lookup(query).map(|_| weather_panel(query, error_text(error)))
    }
}

fn weather_panel(query: &str, body: String) -> Panel {
    Panel::new(
        PanelKind::Weather,
        format!("Weather in {}:", title_case(query)),
        body,
    )
}

fn error_text(error: &GriffinError) -> String {
    format!("Weather error: {error}")
}
