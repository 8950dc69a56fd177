//! Current-AQI acquisition: ordered providers behind a common trait, with a
//! terminal synthetic reading so the fetch can never fail.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    data::ProviderError,
    domain::aqi::{
        AirQualityReading, Location, Pollutants, ReadingSource, aqi_from_pm25, clamp_aqi,
    },
};

#[async_trait]
pub trait AqiProvider: Send + Sync {
    async fn attempt(&self, location: &Location) -> Result<AirQualityReading, ProviderError>;
}

pub struct AirQualityFetcher {
    providers: Vec<Box<dyn AqiProvider>>,
}

impl AirQualityFetcher {
    pub fn new(providers: Vec<Box<dyn AqiProvider>>) -> Self {
        Self { providers }
    }

    /// Tries each provider in priority order; a total miss yields the fixed
    /// sample reading. Never fails, never leaves the reading unset.
    pub async fn fetch_current(&self, location: &Location) -> AirQualityReading {
        for provider in &self.providers {
            if let Ok(reading) = provider.attempt(location).await {
                return reading;
            }
        }
        sample_reading(location)
    }
}

/// Fixed illustrative reading substituted when every provider fails.
#[must_use]
pub fn sample_reading(location: &Location) -> AirQualityReading {
    let city = location
        .city
        .clone()
        .unwrap_or_else(|| "Jabalpur".to_string());
    let state = location
        .state
        .clone()
        .unwrap_or_else(|| "Madhya Pradesh".to_string());
    AirQualityReading {
        aqi: 67,
        location_label: format!("{city}, {state}"),
        city,
        state,
        country: location.country.clone().unwrap_or_else(|| "India".to_string()),
        observed_at: Utc::now(),
        pollutants: Pollutants {
            pm2_5: 18.4,
            pm10: 32.2,
            no2: 12.7,
            so2: 3.2,
            co: 0.6,
            o3: 28.1,
        },
        source: ReadingSource::Sample,
    }
}

/// WAQI: ships a pre-computed AQI plus per-pollutant sub-indices.
pub struct WaqiProvider {
    client: Client,
    base_url: String,
    token: String,
}

impl WaqiProvider {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl AqiProvider for WaqiProvider {
    async fn attempt(&self, location: &Location) -> Result<AirQualityReading, ProviderError> {
        let envelope: WaqiEnvelope = self
            .client
            .get(format!(
                "{}/feed/geo:{};{}/",
                self.base_url, location.latitude, location.longitude
            ))
            .query(&[("token", self.token.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;

        let data = envelope.into_data()?;
        reading_from_waqi(&data, location)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaqiEnvelope {
    status: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl WaqiEnvelope {
    /// The error envelope carries a plain string in `data`; only an "ok"
    /// status is worth decoding further.
    pub(crate) fn into_data<T: serde::de::DeserializeOwned>(self) -> Result<T, ProviderError> {
        if self.status != "ok" {
            return Err(ProviderError::NoData);
        }
        serde_json::from_value(self.data).map_err(|err| ProviderError::Malformed(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WaqiData {
    aqi: Option<f64>,
    city: Option<WaqiStation>,
    iaqi: Option<WaqiComponents>,
}

#[derive(Debug, Deserialize)]
struct WaqiStation {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WaqiComponents {
    pm25: Option<WaqiMetric>,
    pm10: Option<WaqiMetric>,
    no2: Option<WaqiMetric>,
    so2: Option<WaqiMetric>,
    co: Option<WaqiMetric>,
    o3: Option<WaqiMetric>,
}

#[derive(Debug, Deserialize)]
struct WaqiMetric {
    v: f64,
}

fn metric(value: &Option<WaqiMetric>) -> f64 {
    value.as_ref().map_or(0.0, |m| m.v)
}

fn reading_from_waqi(
    data: &WaqiData,
    location: &Location,
) -> Result<AirQualityReading, ProviderError> {
    let aqi = data.aqi.ok_or(ProviderError::NoData)?;
    let station = data
        .city
        .as_ref()
        .and_then(|c| c.name.clone())
        .filter(|name| !name.is_empty());

    let city = location
        .city
        .clone()
        .or_else(|| {
            station
                .as_deref()
                .and_then(|s| s.split(',').next())
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "Unknown".to_string());
    let state = location
        .state
        .clone()
        .or_else(|| {
            station
                .as_deref()
                .and_then(|s| s.split(',').nth(1))
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "Unknown".to_string());

    let components = data.iaqi.as_ref();
    let pollutants = Pollutants {
        pm2_5: components.map_or(0.0, |c| metric(&c.pm25)),
        pm10: components.map_or(0.0, |c| metric(&c.pm10)),
        no2: components.map_or(0.0, |c| metric(&c.no2)),
        so2: components.map_or(0.0, |c| metric(&c.so2)),
        co: components.map_or(0.0, |c| metric(&c.co)),
        o3: components.map_or(0.0, |c| metric(&c.o3)),
    }
    .clamped();

    Ok(AirQualityReading {
        aqi: clamp_aqi(aqi),
        location_label: station.unwrap_or_else(|| location.display_name()),
        city,
        state,
        country: location.country.clone().unwrap_or_else(|| "India".to_string()),
        observed_at: Utc::now(),
        pollutants,
        source: ReadingSource::Waqi,
    })
}

/// OpenWeather air pollution: raw concentrations only; the AQI is derived
/// from PM2.5 via the breakpoint table.
pub struct OpenWeatherAirProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherAirProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl AqiProvider for OpenWeatherAirProvider {
    async fn attempt(&self, location: &Location) -> Result<AirQualityReading, ProviderError> {
        let payload: OwAirResponse = self
            .client
            .get(format!("{}/air_pollution", self.base_url))
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;

        let Some(entry) = payload.list.into_iter().next() else {
            return Err(ProviderError::NoData);
        };
        Ok(reading_from_openweather(&entry.components, location))
    }
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    #[serde(default)]
    list: Vec<OwAirEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    #[serde(default)]
    components: OwComponents,
}

#[derive(Debug, Default, Deserialize)]
struct OwComponents {
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    no2: Option<f64>,
    so2: Option<f64>,
    co: Option<f64>,
    o3: Option<f64>,
}

fn reading_from_openweather(components: &OwComponents, location: &Location) -> AirQualityReading {
    let pollutants = Pollutants {
        pm2_5: components.pm2_5.unwrap_or(0.0),
        pm10: components.pm10.unwrap_or(0.0),
        no2: components.no2.unwrap_or(0.0),
        so2: components.so2.unwrap_or(0.0),
        co: components.co.unwrap_or(0.0),
        o3: components.o3.unwrap_or(0.0),
    }
    .clamped();

    let city = location
        .city
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());
    let state = location
        .state
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());

    AirQualityReading {
        aqi: aqi_from_pm25(pollutants.pm2_5),
        location_label: format!("{city}, {state}"),
        city,
        state,
        country: location.country.clone().unwrap_or_else(|| "India".to_string()),
        observed_at: Utc::now(),
        pollutants,
        source: ReadingSource::OpenWeather,
    }
}
