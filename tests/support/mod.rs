//! Local stand-in for Wikipedia, DuckDuckGo and Open-Meteo

// Each test binary uses a different part of this module
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::{IntoResponse, Response},
    routing::get,
};
use griffin::config::LookupConfig;
use griffin::{DuckDuckGoSource, Oracle, WeatherSource, WikipediaSource};
use reqwest::Client;
use serde_json::{Value, json};

/// Longer than any client timeout used in the tests
pub const SLOW: Duration = Duration::from_secs(3);

/// Per-source deadline for oracles built by `oracle`
pub const DEADLINE: Duration = Duration::from_secs(5);

#[derive(Default)]
pub struct Upstream {
    pub weather_calls: Mutex<Vec<(f64, f64)>>,
    pub weather_status: Option<StatusCode>,
    pub slow_weather: bool,
    /// Added to every Wikipedia call
    pub wikipedia_delay: Option<Duration>,
    /// (service, User-Agent) for every request received
    pub user_agents: Mutex<Vec<(&'static str, String)>>,
}

pub struct FakeUpstream {
    pub base_url: String,
    pub state: Arc<Upstream>,
}

impl FakeUpstream {
    pub fn weather_calls(&self) -> Vec<(f64, f64)> {
        self.state.weather_calls.lock().unwrap().clone()
    }

    pub fn user_agents(&self, service: &str) -> Vec<String> {
        self.state
            .user_agents
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| *name == service)
            .map(|(_, agent)| agent.clone())
            .collect()
    }
}

impl Upstream {
    fn record_agent(&self, service: &'static str, headers: &HeaderMap) {
        let agent = headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.user_agents.lock().unwrap().push((service, agent));
    }
}

pub async fn spawn(upstream: Upstream) -> FakeUpstream {
    let state = Arc::new(upstream);
    let app = Router::new()
        .route("/", get(duckduckgo))
        .route("/w/api.php", get(wikipedia))
        .route("/v1/forecast", get(forecast))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeUpstream {
        base_url: format!("http://{addr}"),
        state,
    }
}

pub fn client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(format!("griffin/{}", griffin::VERSION))
        .no_proxy()
        .build()
        .unwrap()
}

pub fn wikipedia_source(upstream: &FakeUpstream, client: Client) -> WikipediaSource {
    WikipediaSource::new(client, &upstream.base_url, &LookupConfig::default())
}

pub fn duckduckgo_source(upstream: &FakeUpstream, client: Client) -> DuckDuckGoSource {
    DuckDuckGoSource::new(client, &upstream.base_url, &LookupConfig::default())
}

pub fn oracle(upstream: &FakeUpstream, timeout: Duration) -> Oracle {
    oracle_with_deadline(upstream, timeout, DEADLINE)
}

pub fn oracle_with_deadline(
    upstream: &FakeUpstream,
    timeout: Duration,
    deadline: Duration,
) -> Oracle {
    let client = client(timeout);
    Oracle::new(
        vec![
            Arc::new(wikipedia_source(upstream, client.clone())),
            Arc::new(duckduckgo_source(upstream, client.clone())),
            Arc::new(WeatherSource::new(client, &upstream.base_url)),
        ],
        deadline,
    )
}

type Params = Query<HashMap<String, String>>;

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> &'a str {
    params.get(key).map(String::as_str).unwrap_or("")
}

async fn duckduckgo(
    State(state): State<Arc<Upstream>>,
    headers: HeaderMap,
    Query(params): Params,
) -> Response {
    state.record_agent("duckduckgo", &headers);
    assert_eq!(param(&params, "format"), "json");
    assert_eq!(param(&params, "no_redirect"), "1");
    assert_eq!(param(&params, "no_html"), "1");
    assert_eq!(param(&params, "skip_disambig"), "1");

    let query = param(&params, "q").to_lowercase();
    let body = match query.as_str() {
        "slow" => {
            tokio::time::sleep(SLOW).await;
            json!({"Abstract": "too late"})
        }
        "teapot" => return StatusCode::IM_A_TEAPOT.into_response(),
        "garbled" => return (StatusCode::OK, "<html>not json</html>").into_response(),
        "nothing" => json!({"Abstract": "", "RelatedTopics": []}),
        "london" => json!({
            "Abstract": "",
            "RelatedTopics": [
                {"Name": "Places", "Topics": [{"Text": "nested"}]},
                {"Text": "London, the capital of England", "FirstURL": "https://duckduckgo.com/London"}
            ]
        }),
        other => json!({"Abstract": format!("Abstract about {other}"), "RelatedTopics": []}),
    };
    // The real service labels its JSON as javascript
    (
        [("content-type", "application/x-javascript")],
        body.to_string(),
    )
        .into_response()
}

async fn wikipedia(
    State(state): State<Arc<Upstream>>,
    headers: HeaderMap,
    Query(params): Params,
) -> Response {
    state.record_agent("wikipedia", &headers);
    if let Some(delay) = state.wikipedia_delay {
        tokio::time::sleep(delay).await;
    }
    assert_eq!(param(&params, "format"), "json");

    if param(&params, "list") == "search" {
        let titles: Vec<&str> = match param(&params, "srsearch") {
            "slow" => {
                tokio::time::sleep(SLOW).await;
                vec![]
            }
            "broken" => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            "qwxz" | "nowhereland" => vec![],
            "rust" => vec!["Rust (programming language)", "Rust"],
            "mercury" => vec!["Mercury"],
            "gemini" => vec!["Gemini"],
            "ghost" => vec!["Ghost Page"],
            "london" => vec!["London"],
            "pithoragarh" => vec!["Pithoragarh"],
            other => vec![other],
        };
        let hits: Vec<Value> = titles
            .iter()
            .map(|title| json!({"ns": 0, "title": title, "pageid": 1}))
            .collect();
        return Json(json!({"batchcomplete": true, "query": {"search": hits}})).into_response();
    }

    let title = param(&params, "titles");
    let page = match param(&params, "prop") {
        "info|pageprops" => match title {
            "Ghost Page" | "Ghost Option" => json!({"ns": 0, "title": title, "missing": true}),
            "Mercury" | "Gemini" => {
                json!({"pageid": 2, "ns": 0, "title": title, "pageprops": {"disambiguation": ""}})
            }
            _ => json!({"pageid": 1, "ns": 0, "title": title}),
        },
        "links" => {
            let links: Vec<&str> = match title {
                "Mercury" => vec!["Mercury (planet)", "Mercury (element)"],
                "Gemini" => vec!["Ghost Option"],
                _ => vec![],
            };
            let links: Vec<Value> = links
                .iter()
                .map(|link| json!({"ns": 0, "title": link}))
                .collect();
            json!({"pageid": 2, "ns": 0, "title": title, "links": links})
        }
        "extracts" => json!({
            "pageid": 1,
            "ns": 0,
            "title": title,
            "extract": format!("{title} in {} sentences.", param(&params, "exsentences"))
        }),
        other => {
            return Json(json!({"error": {"code": "badvalue", "info": format!("prop {other}")}}))
                .into_response();
        }
    };
    Json(json!({"batchcomplete": true, "query": {"pages": [page]}})).into_response()
}

async fn forecast(
    State(state): State<Arc<Upstream>>,
    headers: HeaderMap,
    Query(params): Params,
) -> Response {
    state.record_agent("open-meteo", &headers);
    assert_eq!(param(&params, "current_weather"), "true");
    let latitude: f64 = param(&params, "latitude").parse().unwrap();
    let longitude: f64 = param(&params, "longitude").parse().unwrap();
    state
        .weather_calls
        .lock()
        .unwrap()
        .push((latitude, longitude));

    if state.slow_weather {
        tokio::time::sleep(SLOW).await;
    }
    if let Some(status) = state.weather_status {
        return (status, Json(json!({"error": true, "reason": "unavailable"}))).into_response();
    }
    Json(json!({
        "latitude": latitude,
        "longitude": longitude,
        "current_weather": {"time": "2026-10-16T09:00", "temperature": 21.0, "windspeed": 5.4}
    }))
    .into_response()
}
