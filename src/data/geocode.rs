use reqwest::Client;
use serde::Deserialize;

use crate::{data::ProviderError, domain::aqi::CityCandidate};

/// OpenWeather geocoding: reverse (coordinate -> place) and forward
/// (free text -> place matches) lookups share one client.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceLabels {
    pub city: String,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl GeocodeClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(8))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<PlaceLabels, ProviderError> {
        let entries: Vec<GeoEntry> = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("limit", "5".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;

        let Some(entry) = entries.into_iter().next() else {
            return Err(ProviderError::NoData);
        };

        Ok(PlaceLabels {
            city: entry.name,
            state: entry.state.or_else(|| entry.country.clone()),
            country: entry.country,
        })
    }

    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CityCandidate>, ProviderError> {
        let entries: Vec<GeoEntry> = self
            .client
            .get(format!("{}/direct", self.base_url))
            .query(&[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;

        Ok(entries.into_iter().map(GeoEntry::into_candidate).collect())
    }
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    state: Option<String>,
    country: Option<String>,
}

impl GeoEntry {
    fn into_candidate(self) -> CityCandidate {
        let country = self.country.unwrap_or_default();
        CityCandidate {
            state: self.state.unwrap_or_else(|| country.clone()),
            name: self.name,
            country,
            lat: self.lat,
            lon: self.lon,
        }
    }
}
