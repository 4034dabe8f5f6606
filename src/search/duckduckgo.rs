//! DuckDuckGo instant-answer lookup.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::GriffinError;
use crate::config::LookupConfig;
use crate::models::{Panel, PanelKind};
use crate::oracle::PanelSource;

pub const NO_SUMMARY: &str = "DuckDuckGo found no summary for this query.";

/// Instant answer payload, reduced to the fields we read
#[derive(Debug, Default, Deserialize)]
pub struct InstantAnswer {
    #[serde(rename = "Abstract", default)]
    pub abstract_text: Option<String>,
    #[serde(rename = "RelatedTopics", default)]
    pub related_topics: Vec<Value>,
}

impl InstantAnswer {
    /// The abstract, else the first related topic with text
    #[must_use]
    pub fn best_text(&self) -> Option<&str> {
        self.abstract_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| {
                self.related_topics
                    .iter()
                    .filter_map(|topic| topic.get("Text").and_then(Value::as_str))
                    .find(|text| !text.is_empty())
            })
    }
}

pub struct DuckDuckGoSource {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl DuckDuckGoSource {
    pub fn new(client: Client, base_url: &str, lookup: &LookupConfig) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: lookup.user_agent.clone(),
        }
    }

    /// Instant answer text for the query, or a message saying why there is none
    #[instrument(skip(self))]
    pub async fn instant_answer(&self, query: &str) -> String {
        match self.fetch(query).await {
            Ok(answer) => answer.best_text().unwrap_or(NO_SUMMARY).to_string(),
            Err(e) => {
                warn!("DuckDuckGo lookup failed: {}", e);
                error_text(&e)
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<InstantAnswer, GriffinError> {
        let url = format!(
            "{}/?q={}&format=json&no_redirect=1&no_html=1&skip_disambig=1",
            self.base_url,
            urlencoding::encode(query)
        );
        debug!("Calling DuckDuckGo: {}", url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GriffinError::status(response.status().as_u16()));
        }

        // Served as application/x-javascript, so decode from the raw body
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl PanelSource for DuckDuckGoSource {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn panel(&self, query: &str) -> Option<Panel> {
        Some(web_answer_panel(self.instant_answer(query).await))
    }

    fn error_panel(&self, _query: &str, error: &GriffinError) -> Option<Panel> {
        Some(web_answer_panel(error_text(error)))
    }
}

fn web_answer_panel(body: String) -> Panel {
    Panel::new(PanelKind::WebAnswer, "DuckDuckGo says:", body)
}

fn error_text(error: &GriffinError) -> String {
    format!("DuckDuckGo error: {error}")
}
