//! Panels rendered for one query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which service produced a panel
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Encyclopedia,
    WebAnswer,
    Weather,
}

/// One styled text block on the page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    /// Heading, e.g. "Wikipedia says:"
    pub title: String,
    /// Display string produced by the lookup
    pub body: String,
}

impl Panel {
    pub fn new(kind: PanelKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Everything shown for one submitted query, in render order
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Answer {
    pub query: String,
    pub panels: Vec<Panel>,
    pub answered_at: DateTime<Utc>,
}

impl Answer {
    #[must_use]
    pub fn new(query: String, panels: Vec<Panel>) -> Self {
        Self {
            query,
            panels,
            answered_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.kind == kind)
    }
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alphabetic = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_alphabetic {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            out.push(c);
            previous_alphabetic = false;
        }
    }
    out
}
