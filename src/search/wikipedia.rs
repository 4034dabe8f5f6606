use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::GriffinError;
use crate::config::LookupConfig;
use crate::models::{Panel, PanelKind};
use crate::oracle::PanelSource;

pub const NO_MATCHES: &str = "Wikipedia found no matching pages.";
pub const AMBIGUOUS: &str = "Wikipedia: topic is ambiguous. Try a more specific query.";
pub const PAGE_NOT_FOUND: &str = "Wikipedia: page not found for the matched title.";

const QUESTION_PREFIXES: &[&str] = &["what is", "who is"];

/// Lowercase the query and drop leading "what is" / "who is" phrases
#[must_use]
pub fn clean_query(query: &str) -> String {
    let mut cleaned = query.trim().to_lowercase();
    loop {
        let Some(rest) = QUESTION_PREFIXES.iter().find_map(|prefix| {
            cleaned
                .strip_prefix(prefix)
                .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        }) else {
            return cleaned;
        };
        cleaned = rest.trim_start().to_string();
    }
}

/// What the search step found for a query
#[derive(Debug)]
pub enum SummaryOutcome {
    Found(String),
    NoMatches,
    Ambiguous(Vec<String>),
    NotFound,
    Error(GriffinError),
}

/// How a title resolved on the wiki
#[derive(Debug, PartialEq)]
enum Resolution {
    Article(String),
    Disambiguation(String),
    Missing,
}

/// MediaWiki action API client for en.wikipedia.org
pub struct WikipediaSource {
    client: Client,
    base_url: String,
    search_results: u8,
    summary_sentences: u8,
    fallback_sentences: u8,
}

impl WikipediaSource {
    pub fn new(client: Client, base_url: &str, lookup: &LookupConfig) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            search_results: lookup.search_results,
            summary_sentences: lookup.summary_sentences,
            fallback_sentences: lookup.fallback_sentences,
        }
    }

    /// Summary text for the query, or a message saying why there is none
    #[instrument(skip(self))]
    pub async fn summarize(&self, query: &str) -> String {
        match self.search_summary(query).await {
            SummaryOutcome::Found(text) => text,
            SummaryOutcome::NoMatches => NO_MATCHES.to_string(),
            SummaryOutcome::NotFound => PAGE_NOT_FOUND.to_string(),
            SummaryOutcome::Ambiguous(options) => {
                match self.fallback_summary(&options).await {
                    Ok(text) => text,
                    Err(e) => {
                        debug!("Fallback summary failed: {}", e);
                        AMBIGUOUS.to_string()
                    }
                }
            }
            SummaryOutcome::Error(e) => {
                warn!("Wikipedia lookup failed: {}", e);
                error_text(&e)
            }
        }
    }

    /// Search for the query and summarize the top hit
    pub async fn search_summary(&self, query: &str) -> SummaryOutcome {
        let cleaned = clean_query(query);
        if cleaned.is_empty() {
            return SummaryOutcome::NoMatches;
        }

        let titles = match self.search(&cleaned).await {
            Ok(titles) => titles,
            Err(e) => return SummaryOutcome::Error(e),
        };
        let Some(top) = titles.first() else {
            return SummaryOutcome::NoMatches;
        };

        match self.summary(top, self.summary_sentences).await {
            Ok(text) => SummaryOutcome::Found(text),
            Err(GriffinError::Ambiguous { options }) => SummaryOutcome::Ambiguous(options),
            Err(GriffinError::NotFound { .. }) => SummaryOutcome::NotFound,
            Err(e) => SummaryOutcome::Error(e),
        }
    }

    /// Shorter summary of the first disambiguation option
    async fn fallback_summary(&self, options: &[String]) -> Result<String, GriffinError> {
        let choice = options
            .first()
            .ok_or_else(|| GriffinError::Ambiguous { options: vec![] })?;
        self.summary(choice, self.fallback_sentences).await
    }

    /// Titles matching the text, best first
    pub async fn search(&self, text: &str) -> Result<Vec<String>, GriffinError> {
        let limit = self.search_results.to_string();
        let result: SearchQuery = self
            .call(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", text),
                ("srlimit", limit.as_str()),
                ("srprop", ""),
            ])
            .await?;
        Ok(result.search.into_iter().map(|hit| hit.title).collect())
    }

    /// First `sentences` sentences of the page behind `title`
    pub async fn summary(&self, title: &str, sentences: u8) -> Result<String, GriffinError> {
        let page = match self.resolve(title).await? {
            Resolution::Article(page) => page,
            Resolution::Disambiguation(page) => {
                let options = self.disambiguation_options(&page).await?;
                return Err(GriffinError::Ambiguous { options });
            }
            Resolution::Missing => return Err(GriffinError::not_found(title)),
        };

        let sentences = sentences.to_string();
        let result: PagesQuery = self
            .call(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("exsentences", sentences.as_str()),
                ("redirects", "1"),
                ("titles", page.as_str()),
            ])
            .await?;

        result
            .pages
            .into_iter()
            .next()
            .and_then(|entry| entry.extract)
            .filter(|extract| !extract.is_empty())
            .ok_or_else(|| GriffinError::parse(format!("no extract for '{page}'")))
    }

    async fn resolve(&self, title: &str) -> Result<Resolution, GriffinError> {
        let result: PagesQuery = self
            .call(&[
                ("action", "query"),
                ("prop", "info|pageprops"),
                ("ppprop", "disambiguation"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;

        let entry = result
            .pages
            .into_iter()
            .next()
            .ok_or_else(|| GriffinError::parse(format!("no page entry for '{title}'")))?;
        Ok(entry.resolution())
    }

    /// Linked article titles on a disambiguation page, in API order
    async fn disambiguation_options(&self, title: &str) -> Result<Vec<String>, GriffinError> {
        let result: PagesQuery = self
            .call(&[
                ("action", "query"),
                ("prop", "links"),
                ("plnamespace", "0"),
                ("pllimit", "max"),
                ("titles", title),
            ])
            .await?;
        Ok(result
            .pages
            .into_iter()
            .flat_map(|entry| entry.links)
            .map(|link| link.title)
            .collect())
    }

    async fn call<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, GriffinError> {
        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!(
            "{}/w/api.php?format=json&formatversion=2&{query}",
            self.base_url
        );
        debug!("Calling Wikipedia: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GriffinError::status(response.status().as_u16()));
        }

        let body: ApiResponse<T> = response.json().await?;
        if let Some(error) = body.error {
            return Err(GriffinError::parse(format!("{}: {}", error.code, error.info)));
        }
        body.query
            .ok_or_else(|| GriffinError::parse("response has no query object"))
    }
}

#[async_trait]
impl PanelSource for WikipediaSource {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    async fn panel(&self, query: &str) -> Option<Panel> {
        Some(encyclopedia_panel(self.summarize(query).await))
    }

    fn error_panel(&self, _query: &str, error: &GriffinError) -> Option<Panel> {
        Some(encyclopedia_panel(error_text(error)))
    }
}

fn encyclopedia_panel(body: String) -> Panel {
    Panel::new(PanelKind::Encyclopedia, "Wikipedia says:", body)
}

fn error_text(error: &GriffinError) -> String {
    format!("Wikipedia error: {error}")
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    query: Option<T>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<PageEntry>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    pageprops: Option<PageProps>,
    #[serde(default)]
    links: Vec<Link>,
    extract: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Link {
    title: String,
}

impl PageEntry {
    fn resolution(self) -> Resolution {
        if self.missing || self.invalid {
            return Resolution::Missing;
        }
        let disambiguation = self
            .pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some());
        if disambiguation {
            Resolution::Disambiguation(self.title)
        } else {
            Resolution::Article(self.title)
        }
    }
}
