pub mod air_quality;
pub mod cities;
pub mod forecast;
pub mod geocode;
pub mod locate;

use thiserror::Error;

use crate::{
    cli::Cli,
    config::Credentials,
    data::{
        air_quality::{AirQualityFetcher, OpenWeatherAirProvider, WaqiProvider},
        cities::CityDirectory,
        forecast::ForecastFetcher,
        geocode::GeocodeClient,
        locate::{CliFix, DeviceStrategy, IpStrategy, LocationResolver},
    },
};

/// How a single provider attempt can fail. Every variant is non-fatal to the
/// pipeline; the caller moves to the next tier or the synthetic fallback.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Permission denied, no device fix, or a bounded wait elapsed.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("no data in response")]
    NoData,
}

const WAQI_URL: &str = "https://api.waqi.info";
const OPENWEATHER_URL: &str = "https://api.openweathermap.org";

/// The wired-up resolution and acquisition pipeline. Owned behind an `Arc`
/// by the orchestrator; background tasks borrow it per fetch.
pub struct Pipeline {
    pub resolver: LocationResolver,
    pub directory: CityDirectory,
    pub air: AirQualityFetcher,
    pub forecast: ForecastFetcher,
}

impl Pipeline {
    pub fn new(cli: &Cli, credentials: &Credentials) -> Self {
        let waqi_base = cli.waqi_url.clone().unwrap_or_else(|| WAQI_URL.to_string());
        let ow_base = cli
            .openweather_url
            .clone()
            .unwrap_or_else(|| OPENWEATHER_URL.to_string());

        let geocoder = GeocodeClient::new(
            format!("{ow_base}/geo/1.0"),
            credentials.openweather_key.clone(),
        );

        let device_fix = match (cli.lat, cli.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        let ip = if cli.ip_lookup_urls.is_empty() {
            IpStrategy::default()
        } else {
            IpStrategy::with_endpoints(cli.ip_lookup_urls.clone())
        };
        let resolver = LocationResolver::new(vec![
            Box::new(DeviceStrategy::new(
                Box::new(CliFix(device_fix)),
                geocoder.clone(),
            )),
            Box::new(ip),
        ]);

        let air = AirQualityFetcher::new(vec![
            Box::new(WaqiProvider::new(
                waqi_base.clone(),
                credentials.waqi_token.clone(),
            )),
            Box::new(OpenWeatherAirProvider::new(
                format!("{ow_base}/data/2.5"),
                credentials.openweather_key.clone(),
            )),
        ]);

        Self {
            resolver,
            directory: CityDirectory::new(geocoder),
            air,
            forecast: ForecastFetcher::new(waqi_base, credentials.waqi_token.clone()),
        }
    }
}
