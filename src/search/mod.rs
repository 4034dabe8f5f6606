//! Text answer sources
//!
//! - Wikipedia: short encyclopedia summaries with disambiguation fallback
//! - DuckDuckGo: instant-answer abstracts and related topics

pub mod duckduckgo;
pub mod wikipedia;

pub use duckduckgo::{DuckDuckGoSource, InstantAnswer};
pub use wikipedia::{SummaryOutcome, WikipediaSource, clean_query};
