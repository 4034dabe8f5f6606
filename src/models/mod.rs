//! Data models for Griffin
//!
//! This module contains the per-request domain models organized by concern:
//! - Location: the fixed table of places that get a weather panel
//! - Answer: the panels rendered for one query

pub mod answer;
pub mod location;

// Re-export all public types for convenient access
pub use answer::{Answer, Panel, PanelKind};
pub use location::{LOCATIONS, Location};
