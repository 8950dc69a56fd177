//! Location resolution: an ordered chain of strategies, first success wins.
//! The chain never fails as a whole; when every strategy is exhausted the
//! fixed default location is returned.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{
    data::{ProviderError, geocode::GeocodeClient},
    domain::aqi::{Location, LocationTier, ResolvedLocation, default_location},
};

const DEVICE_FIX_WAIT: Duration = Duration::from_secs(15);

const IP_ENDPOINTS: &[&str] = &[
    "https://ipapi.co/json/",
    "https://extreme-ip-lookup.com/json/",
];

/// One rung of the resolution ladder.
#[async_trait]
pub trait LocateStrategy: Send + Sync {
    async fn attempt(&self) -> Result<ResolvedLocation, ProviderError>;
}

/// Supplies a raw device coordinate, or fails with `Unavailable`.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_fix(&self) -> Result<(f64, f64), ProviderError>;
}

/// Production position source: an explicit `--lat`/`--lon` pair acts as the
/// device fix; absent coordinates behave like a denied permission.
pub struct CliFix(pub Option<(f64, f64)>);

#[async_trait]
impl PositionSource for CliFix {
    async fn current_fix(&self) -> Result<(f64, f64), ProviderError> {
        self.0
            .ok_or_else(|| ProviderError::Unavailable("no device fix configured".to_string()))
    }
}

pub struct DeviceStrategy {
    source: Box<dyn PositionSource>,
    geocoder: GeocodeClient,
    wait: Duration,
}

impl DeviceStrategy {
    pub fn new(source: Box<dyn PositionSource>, geocoder: GeocodeClient) -> Self {
        Self {
            source,
            geocoder,
            wait: DEVICE_FIX_WAIT,
        }
    }

    #[must_use]
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }
}

#[async_trait]
impl LocateStrategy for DeviceStrategy {
    async fn attempt(&self) -> Result<ResolvedLocation, ProviderError> {
        let (lat, lon) = tokio::time::timeout(self.wait, self.source.current_fix())
            .await
            .map_err(|_| ProviderError::Unavailable("device fix timed out".to_string()))??;

        let mut location = Location::from_coords(lat, lon);
        // Reverse geocoding is best-effort; a bare coordinate still counts
        // as a precise fix.
        if let Ok(labels) = self.geocoder.reverse(lat, lon).await {
            location.city = Some(labels.city);
            location.state = labels.state;
            location.country = labels.country;
        }

        Ok(ResolvedLocation {
            location,
            tier: LocationTier::Precise,
        })
    }
}

/// Queries independent IP-geolocation endpoints in order and accepts the
/// first payload carrying both coordinates.
pub struct IpStrategy {
    client: Client,
    endpoints: Vec<String>,
}

impl Default for IpStrategy {
    fn default() -> Self {
        Self::with_endpoints(IP_ENDPOINTS.iter().map(ToString::to_string).collect())
    }
}

impl IpStrategy {
    pub fn with_endpoints(endpoints: Vec<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("reqwest client"),
            endpoints,
        }
    }

    async fn probe(&self, endpoint: &str) -> Result<Location, ProviderError> {
        let payload: Value = self
            .client
            .get(endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;

        parse_ip_payload(&payload).ok_or(ProviderError::NoData)
    }
}

#[async_trait]
impl LocateStrategy for IpStrategy {
    async fn attempt(&self) -> Result<ResolvedLocation, ProviderError> {
        for endpoint in &self.endpoints {
            if let Ok(location) = self.probe(endpoint).await {
                return Ok(ResolvedLocation {
                    location,
                    tier: LocationTier::Network,
                });
            }
        }
        Err(ProviderError::Unavailable(
            "all IP geolocation endpoints failed".to_string(),
        ))
    }
}

/// Endpoints disagree on field names and some return coordinates as strings;
/// accept the common spellings and both encodings.
fn parse_ip_payload(payload: &Value) -> Option<Location> {
    let latitude = numeric_field(payload, &["latitude", "lat"])?;
    let longitude = numeric_field(payload, &["longitude", "lon"])?;

    Some(Location {
        latitude,
        longitude,
        city: text_field(payload, &["city"]),
        state: text_field(payload, &["region", "regionName", "state"]),
        country: text_field(payload, &["country_name", "country"]),
    })
}

fn numeric_field(payload: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| {
        let value = payload.get(key)?;
        value
            .as_f64()
            .or_else(|| value.as_str()?.trim().parse().ok())
    })
}

fn text_field(payload: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    })
}

pub struct LocationResolver {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl LocationResolver {
    pub fn new(strategies: Vec<Box<dyn LocateStrategy>>) -> Self {
        Self { strategies }
    }

    /// Never fails: degrades through the chain and finally to the fixed
    /// default location.
    pub async fn resolve(&self) -> ResolvedLocation {
        for strategy in &self.strategies {
            if let Ok(resolved) = strategy.attempt().await {
                return resolved;
            }
        }
        default_location()
    }
}
