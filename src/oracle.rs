//! Fans one query out to every panel source and collects the answer.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use tracing::{info, instrument, warn};

use crate::config::GriffinConfig;
use crate::models::{Answer, Panel};
use crate::search::{DuckDuckGoSource, WikipediaSource};
use crate::weather::WeatherSource;
use crate::{GriffinError, VERSION};

/// A service that can contribute one panel to an answer.
///
/// Implementations convert every upstream failure into the panel body, so
/// `panel` has no error path. `None` means the source does not apply to the
/// query and no panel is shown.
#[async_trait]
pub trait PanelSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn panel(&self, query: &str) -> Option<Panel>;

    /// The panel shown when the lookup could not finish, e.g. it ran past
    /// the oracle's deadline
    fn error_panel(&self, query: &str, error: &GriffinError) -> Option<Panel>;
}

/// Builds the HTTP client shared by all sources
pub fn build_http_client(config: &GriffinConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.lookup.timeout())
        .user_agent(format!("griffin/{VERSION}"))
        .build()
        .with_context(|| "Failed to create HTTP client")
}

/// Runs the configured sources for a query, in render order
pub struct Oracle {
    sources: Vec<Arc<dyn PanelSource>>,
    /// Upper bound for each source's panel
    deadline: Duration,
}

impl Oracle {
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn PanelSource>>, deadline: Duration) -> Self {
        Self { sources, deadline }
    }

    /// Wikipedia, then DuckDuckGo, then weather
    pub fn from_config(config: &GriffinConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        let sources: Vec<Arc<dyn PanelSource>> = vec![
            Arc::new(WikipediaSource::new(
                client.clone(),
                &config.endpoints.wikipedia_base_url,
                &config.lookup,
            )),
            Arc::new(DuckDuckGoSource::new(
                client.clone(),
                &config.endpoints.duckduckgo_base_url,
                &config.lookup,
            )),
            Arc::new(WeatherSource::new(
                client,
                &config.endpoints.open_meteo_base_url,
            )),
        ];
        Ok(Self::new(sources, config.lookup.deadline()))
    }

    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Answer a query. Sources run concurrently; panels keep source order.
    #[instrument(skip(self))]
    pub async fn ask(&self, query: &str) -> Result<Answer, GriffinError> {
        if query.trim().is_empty() {
            return Err(GriffinError::validation("Query cannot be empty"));
        }

        let panels: Vec<Panel> = join_all(
            self.sources
                .iter()
                .map(|source| self.panel_within_deadline(source.as_ref(), query)),
        )
        .await
        .into_iter()
        .flatten()
        .collect();

        info!(panels = panels.len(), "Answered query");
        Ok(Answer::new(query.to_string(), panels))
    }

    async fn panel_within_deadline(&self, source: &dyn PanelSource, query: &str) -> Option<Panel> {
        match tokio::time::timeout(self.deadline, source.panel(query)).await {
            Ok(panel) => panel,
            Err(_) => {
                warn!(source = source.name(), "Lookup missed its deadline");
                let error = GriffinError::transport(format!(
                    "no answer within {}s",
                    self.deadline.as_secs_f64()
                ));
                source.error_panel(query, &error)
            }
        }
    }
}
