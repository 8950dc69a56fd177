//! 7-day AQI forecast: WAQI daily PM2.5 series, degrading to a synthetic
//! series seeded from the most recent reading. Always exactly seven points
//! with strictly increasing dates starting today.

use chrono::{Duration, Local, NaiveDate};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    data::{ProviderError, air_quality::WaqiEnvelope},
    domain::aqi::{ForecastPoint, Location, clamp_aqi},
};

const FORECAST_DAYS: usize = 7;
const FALLBACK_BASELINE: u16 = 65;
const MAX_PERTURBATION: f64 = 15.0;

pub struct ForecastFetcher {
    client: Client,
    base_url: String,
    token: String,
}

impl ForecastFetcher {
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

    /// Never fails: any provider shortfall falls back to the synthetic
    /// series.
    pub async fn fetch_forecast(
        &self,
        location: &Location,
        current_aqi: Option<u16>,
    ) -> Vec<ForecastPoint> {
        match self.provider_series(location).await {
            Ok(days) => days,
            Err(_) => synthetic_forecast(current_aqi),
        }
    }

    async fn provider_series(
        &self,
        location: &Location,
    ) -> Result<Vec<ForecastPoint>, ProviderError> {
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

        let data: WaqiForecastData = envelope.into_data()?;
        let days = data
            .forecast
            .and_then(|f| f.daily)
            .and_then(|d| d.pm25)
            .ok_or(ProviderError::NoData)?;

        points_from_days(&days, Local::now().date_naive()).ok_or(ProviderError::NoData)
    }
}

/// The provider series often starts in the past; entries before `today` are
/// dropped. Anything short of a full, strictly ordered week starting today
/// is treated as no data.
fn points_from_days(days: &[WaqiDay], today: NaiveDate) -> Option<Vec<ForecastPoint>> {
    let mut points: Vec<ForecastPoint> = days
        .iter()
        .filter_map(|day| {
            let date = NaiveDate::parse_from_str(&day.day, "%Y-%m-%d").ok()?;
            (date >= today).then(|| ForecastPoint {
                day_label: date.format("%a").to_string(),
                aqi: clamp_aqi(day.avg),
                date,
            })
        })
        .collect();

    points.truncate(FORECAST_DAYS);
    if points.len() < FORECAST_DAYS {
        return None;
    }
    if points[0].date != today {
        return None;
    }
    if points.windows(2).any(|pair| pair[1].date <= pair[0].date) {
        return None;
    }
    Some(points)
}

/// Seeded from the last known AQI (or a fixed baseline), each day perturbed
/// within a bounded band and clamped to [0, 300].
#[must_use]
pub fn synthetic_forecast(current_aqi: Option<u16>) -> Vec<ForecastPoint> {
    let baseline = f64::from(current_aqi.unwrap_or(FALLBACK_BASELINE));
    let today = Local::now().date_naive();
    let mut rng = rand::rng();

    (0..FORECAST_DAYS as i64)
        .map(|offset| {
            let date = today + Duration::days(offset);
            let variation = rng.random_range(-MAX_PERTURBATION..=MAX_PERTURBATION);
            ForecastPoint {
                day_label: date.format("%a").to_string(),
                aqi: (baseline + variation).round().clamp(0.0, 300.0) as u16,
                date,
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct WaqiForecastData {
    forecast: Option<WaqiForecast>,
}

#[derive(Debug, Deserialize)]
struct WaqiForecast {
    daily: Option<WaqiDaily>,
}

#[derive(Debug, Deserialize)]
struct WaqiDaily {
    pm25: Option<Vec<WaqiDay>>,
}

#[derive(Debug, Deserialize)]
struct WaqiDay {
    avg: f64,
    day: String,
}
