//! Griffin - one question, three answers
//!
//! This library fans a free-text query out to Wikipedia, DuckDuckGo and,
//! for a few known places, Open-Meteo, and collects one display panel per
//! service. The web module serves the single-page UI on top of it.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod oracle;
pub mod search;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::GriffinConfig;
pub use error::GriffinError;
pub use models::{Answer, Location, Panel, PanelKind};
pub use oracle::{Oracle, PanelSource};
pub use search::{DuckDuckGoSource, WikipediaSource};
pub use weather::{CurrentConditions, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GriffinError>;
