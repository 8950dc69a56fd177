#![allow(dead_code)]

use clap::Parser;
use vayu_tui::{
    cli::Cli,
    domain::aqi::{Location, Pollutants},
};

/// CLI fixture with endpoints pointed at an unroutable port so background
/// fetches fail fast instead of reaching the public providers.
pub fn offline_cli() -> Cli {
    Cli::parse_from([
        "vayu-tui",
        "--waqi-url",
        "http://127.0.0.1:9",
        "--openweather-url",
        "http://127.0.0.1:9",
        "--ip-lookup-url",
        "http://127.0.0.1:9/json",
        "--dev-keys",
    ])
}

pub fn jabalpur() -> Location {
    Location {
        latitude: 23.1815,
        longitude: 79.9864,
        city: Some("Jabalpur".to_string()),
        state: Some("Madhya Pradesh".to_string()),
        country: Some("India".to_string()),
    }
}

pub fn fixture_pollutants() -> Pollutants {
    Pollutants {
        pm2_5: 31.0,
        pm10: 48.0,
        no2: 14.2,
        so2: 4.1,
        co: 0.7,
        o3: 22.3,
    }
}
