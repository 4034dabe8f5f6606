//! Location model and the static table of places with weather

use serde::Serialize;

/// A named point on the map
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Lowercase lookup key
    pub name: &'static str,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Places whose name, typed as the whole query, adds a weather panel.
/// Keys are unique and lowercase.
pub const LOCATIONS: &[Location] = &[
    Location {
        name: "pithoragarh",
        latitude: 29.58,
        longitude: 80.22,
    },
    Location {
        name: "delhi",
        latitude: 28.61,
        longitude: 77.23,
    },
    Location {
        name: "london",
        latitude: 51.51,
        longitude: -0.13,
    },
    Location {
        name: "new york",
        latitude: 40.71,
        longitude: -74.01,
    },
];

impl Location {
    /// Case-insensitive exact match of the whole query against the table
    #[must_use]
    pub fn lookup(query: &str) -> Option<&'static Location> {
        let key = query.to_lowercase();
        LOCATIONS.iter().find(|location| location.name == key)
    }
}
