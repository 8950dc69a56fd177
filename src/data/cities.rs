//! City directory: a static reference set of major Indian cities merged with
//! remote name-search results. Remote failure silently degrades to the
//! static matches only.

use crate::{
    data::geocode::GeocodeClient,
    domain::aqi::{CityCandidate, Location},
};

const MAX_RESULTS: usize = 10;
const REMOTE_LIMIT: usize = 5;

const REFERENCE_CITIES: &[(&str, &str, f64, f64)] = &[
    ("Jabalpur", "Madhya Pradesh", 23.1815, 79.9864),
    ("Mumbai", "Maharashtra", 19.0760, 72.8777),
    ("Delhi", "Delhi", 28.6139, 77.2090),
    ("Bangalore", "Karnataka", 12.9716, 77.5946),
    ("Chennai", "Tamil Nadu", 13.0827, 80.2707),
    ("Kolkata", "West Bengal", 22.5726, 88.3639),
    ("Hyderabad", "Telangana", 17.3850, 78.4867),
    ("Pune", "Maharashtra", 18.5204, 73.8567),
    ("Ahmedabad", "Gujarat", 23.0225, 72.5714),
    ("Jaipur", "Rajasthan", 26.9124, 75.7873),
    ("Lucknow", "Uttar Pradesh", 26.8467, 80.9462),
    ("Bhopal", "Madhya Pradesh", 23.2599, 77.4126),
    ("Indore", "Madhya Pradesh", 22.7196, 75.8577),
    ("Pithampur", "Madhya Pradesh", 22.6193, 75.6935),
];

pub struct CityDirectory {
    geocoder: GeocodeClient,
}

impl CityDirectory {
    pub fn new(geocoder: GeocodeClient) -> Self {
        Self { geocoder }
    }

    /// Case-insensitive substring match over the built-in list, against
    /// city name and state.
    #[must_use]
    pub fn static_matches(query: &str) -> Vec<CityCandidate> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        REFERENCE_CITIES
            .iter()
            .filter(|(name, state, _, _)| {
                name.to_lowercase().contains(&needle) || state.to_lowercase().contains(&needle)
            })
            .map(|&(name, state, lat, lon)| CityCandidate {
                name: name.to_string(),
                state: state.to_string(),
                country: "India".to_string(),
                lat,
                lon,
            })
            .collect()
    }

    /// Static matches merged with remote matches, deduplicated by
    /// (name, state), capped to ten. An empty query issues no remote call.
    pub async fn search(&self, query: &str) -> Vec<CityCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut merged = Self::static_matches(query);
        if let Ok(remote) = self.geocoder.search(query, REMOTE_LIMIT).await {
            merged.extend(remote);
        }

        dedupe(&mut merged);
        merged.truncate(MAX_RESULTS);
        merged
    }

    #[must_use]
    pub fn select(candidate: &CityCandidate) -> Location {
        candidate.to_location()
    }
}

fn dedupe(candidates: &mut Vec<CityCandidate>) {
    let mut seen: Vec<(String, String)> = Vec::new();
    candidates.retain(|candidate| {
        let key = (
            candidate.name.to_lowercase(),
            candidate.state.to_lowercase(),
        );
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });
}
